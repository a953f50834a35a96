// src/sentiment/dispatch.rs
//! Picks the scoring method from the keys present in a request.
//!
//! Priority: non-blank text → activities → survey → combined over whatever is
//! left. Callers sending several modalities get the first match, not a fusion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::behavior::ActivityProfile;
use super::fusion::Modalities;
use super::survey::SurveyResponses;
use super::SentimentEngine;

/// Raw request payload. Values stay untyped so malformed modalities degrade
/// to neutral defaults instead of failing deserialization. `null` = absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub activities: Option<Value>,
    #[serde(default)]
    pub survey: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodUsed {
    TextAnalysis,
    BehavioralAnalysis,
    SurveyAnalysis,
    CombinedAnalysis,
}

impl MethodUsed {
    pub fn as_str(self) -> &'static str {
        match self {
            MethodUsed::TextAnalysis => "text_analysis",
            MethodUsed::BehavioralAnalysis => "behavioral_analysis",
            MethodUsed::SurveyAnalysis => "survey_analysis",
            MethodUsed::CombinedAnalysis => "combined_analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub sentiment_score: f64,
    pub method_used: MethodUsed,
}

impl ScoreRequest {
    fn text_str(&self) -> Option<&str> {
        self.text.as_ref().and_then(Value::as_str)
    }
}

pub(crate) fn dispatch(engine: &SentimentEngine, req: &ScoreRequest) -> ScoreOutcome {
    if let Some(t) = req.text_str().filter(|t| !t.trim().is_empty()) {
        return ScoreOutcome {
            sentiment_score: engine.score_text(Some(t)),
            method_used: MethodUsed::TextAnalysis,
        };
    }
    if let Some(a) = req.activities.as_ref() {
        return ScoreOutcome {
            sentiment_score: engine.score_behavior(&ActivityProfile::from_json(a)),
            method_used: MethodUsed::BehavioralAnalysis,
        };
    }
    if let Some(s) = req.survey.as_ref() {
        return ScoreOutcome {
            sentiment_score: engine.score_survey(&SurveyResponses::from_json(s)),
            method_used: MethodUsed::SurveyAnalysis,
        };
    }

    // Any non-null activities/survey returned above; only text can remain.
    let m = Modalities {
        text: req.text_str(),
        ..Modalities::default()
    };
    ScoreOutcome {
        sentiment_score: engine.score_combined(&m),
        method_used: MethodUsed::CombinedAnalysis,
    }
}
