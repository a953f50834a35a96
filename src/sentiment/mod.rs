// src/sentiment/mod.rs
//! # Sentiment Engine
//! Turns up to three input modalities into one score in [0, 1]:
//!
//! - free text      → [`text`]     (−1..1, averaged sub-scorers)
//! - activity data  → [`behavior`] (0..1, additive adjustments)
//! - survey answers → [`survey`]   (0..1, mean of mapped answers)
//!
//! [`fusion`] merges whatever is present with fixed weights, [`interpret`]
//! buckets a score into bands and [`dispatch`] picks a method per request.
//!
//! Everything here is pure and never fails; degenerate input yields a
//! neutral default. The engine holds no mutable state, so one instance is
//! shared read-only by all requests.

pub mod behavior;
pub mod dispatch;
pub mod fusion;
pub mod interpret;
mod lexicon;
pub mod survey;
pub mod text;

use once_cell::sync::Lazy;

pub use behavior::{ActivityProfile, Level};
pub use dispatch::{MethodUsed, ScoreOutcome, ScoreRequest};
pub use fusion::{Modalities, BEHAVIOR_WEIGHT, SURVEY_WEIGHT, TEXT_WEIGHT};
pub use interpret::{Interpretation, SentimentLevel};
pub use survey::{Question, Step, SurveyResponses};
pub use text::{clean_text, SubScorer, TextScorer};

static SHARED: Lazy<SentimentEngine> = Lazy::new(SentimentEngine::default);

#[derive(Debug, Default)]
pub struct SentimentEngine {
    text: TextScorer,
}

impl SentimentEngine {
    pub fn new(compound_enabled: bool) -> Self {
        Self {
            text: TextScorer::new(compound_enabled),
        }
    }

    /// Process-wide default engine (all sub-scorers enabled).
    pub fn shared() -> &'static SentimentEngine {
        &SHARED
    }

    pub fn score_text(&self, text: Option<&str>) -> f64 {
        self.text.score(text)
    }

    pub fn score_behavior(&self, activities: &ActivityProfile) -> f64 {
        activities.score()
    }

    pub fn score_survey(&self, responses: &SurveyResponses) -> f64 {
        responses.score()
    }

    pub fn score_combined(&self, m: &Modalities<'_>) -> f64 {
        fusion::score_combined(&self.text, m)
    }

    pub fn interpret(&self, score: f64) -> Interpretation {
        interpret::interpret(score)
    }

    /// Score a request with the method its keys select.
    pub fn score(&self, req: &ScoreRequest) -> ScoreOutcome {
        dispatch::dispatch(self, req)
    }
}

/// Free text → [-1, 1] using the shared engine.
pub fn score_text(text: Option<&str>) -> f64 {
    SHARED.score_text(text)
}

pub fn score_behavior(activities: &ActivityProfile) -> f64 {
    SHARED.score_behavior(activities)
}

pub fn score_survey(responses: &SurveyResponses) -> f64 {
    SHARED.score_survey(responses)
}

pub fn score_combined(
    text: Option<&str>,
    activities: Option<&ActivityProfile>,
    survey: Option<&SurveyResponses>,
) -> f64 {
    SHARED.score_combined(&Modalities {
        text,
        activities,
        survey,
    })
}

pub fn interpret(score: f64) -> Interpretation {
    interpret::interpret(score)
}
