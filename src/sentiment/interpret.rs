// src/sentiment/interpret.rs
//! Qualitative bands for a [0, 1] sentiment score.
//!
//! `>= 0.7` positive, `<= 0.3` negative, anything strictly between is neutral.

use serde::{Deserialize, Serialize};

pub const POSITIVE_AT: f64 = 0.7;
pub const NEGATIVE_AT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLevel {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub level: SentimentLevel,
    pub description: String,
    pub recommendation: String,
    pub color: String,
}

impl SentimentLevel {
    pub fn for_score(score: f64) -> Self {
        if score >= POSITIVE_AT {
            SentimentLevel::Positive
        } else if score <= NEGATIVE_AT {
            SentimentLevel::Negative
        } else {
            SentimentLevel::Neutral
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SentimentLevel::Positive => "Positive sentiment - High mental health",
            SentimentLevel::Neutral => "Neutral sentiment - Moderate mental health",
            SentimentLevel::Negative => "Negative sentiment - Low mental health",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            SentimentLevel::Positive => {
                "Continue maintaining your positive outlook and healthy habits!"
            }
            SentimentLevel::Neutral => {
                "Monitor your mental health and consider self-care practices."
            }
            SentimentLevel::Negative => {
                "Consider reaching out to a mental health professional for support."
            }
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SentimentLevel::Positive => "green",
            SentimentLevel::Neutral => "blue",
            SentimentLevel::Negative => "red",
        }
    }
}

pub fn interpret(score: f64) -> Interpretation {
    let level = SentimentLevel::for_score(score);
    Interpretation {
        level,
        description: level.description().to_string(),
        recommendation: level.recommendation().to_string(),
        color: level.color().to_string(),
    }
}
