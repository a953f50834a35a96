// src/sentiment/fusion.rs
//! Weighted fusion of the modalities that are actually present.
//!
//! Text is remapped from [-1, 1] to [0, 1] first. The weighted sum is divided
//! by the sum of the weights that were used, so a lone modality comes back
//! unchanged.

use super::behavior::ActivityProfile;
use super::survey::SurveyResponses;
use super::text::TextScorer;

pub const TEXT_WEIGHT: f64 = 0.4;
pub const BEHAVIOR_WEIGHT: f64 = 0.3;
pub const SURVEY_WEIGHT: f64 = 0.3;

const NEUTRAL: f64 = 0.5;

/// Map a text score from [-1, 1] onto [0, 1].
#[inline]
pub fn normalize_text_score(s: f64) -> f64 {
    ((s + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Inputs to the fused score. `None` (and empty text) means "not supplied".
#[derive(Debug, Clone, Copy, Default)]
pub struct Modalities<'a> {
    pub text: Option<&'a str>,
    pub activities: Option<&'a ActivityProfile>,
    pub survey: Option<&'a SurveyResponses>,
}

impl Modalities<'_> {
    pub fn is_empty(&self) -> bool {
        self.text.map_or(true, str::is_empty) && self.activities.is_none() && self.survey.is_none()
    }
}

pub fn score_combined(text_scorer: &TextScorer, m: &Modalities<'_>) -> f64 {
    let mut parts: Vec<(f64, f64)> = Vec::with_capacity(3);

    if let Some(t) = m.text.filter(|t| !t.is_empty()) {
        parts.push((normalize_text_score(text_scorer.score(Some(t))), TEXT_WEIGHT));
    }
    if let Some(a) = m.activities {
        parts.push((a.score(), BEHAVIOR_WEIGHT));
    }
    if let Some(s) = m.survey {
        parts.push((s.score(), SURVEY_WEIGHT));
    }

    if parts.is_empty() {
        return NEUTRAL;
    }
    let weighted: f64 = parts.iter().map(|(s, w)| s * w).sum();
    let total: f64 = parts.iter().map(|(_, w)| w).sum();
    (weighted / total).clamp(0.0, 1.0)
}
