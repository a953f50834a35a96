// src/sentiment/survey.rs
//! Survey scorer: mean of the recognized answers on a 5-step scale in [0, 1].

use serde_json::Value;
use std::collections::BTreeMap;

const NEUTRAL: f64 = 0.5;

/// The recognized survey questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    MoodToday,
    EnergyLevel,
    StressLevel,
    SleepQuality,
    SocialSatisfaction,
}

/// Position on a five-step scale, worst → best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Worst,
    Poor,
    Middle,
    Good,
    Best,
}

impl Step {
    pub fn value(self) -> f64 {
        match self {
            Step::Worst => 0.0,
            Step::Poor => 0.25,
            Step::Middle => 0.5,
            Step::Good => 0.75,
            Step::Best => 1.0,
        }
    }
}

impl Question {
    pub fn parse(key: &str) -> Option<Self> {
        Some(match key {
            "mood_today" => Question::MoodToday,
            "energy_level" => Question::EnergyLevel,
            "stress_level" => Question::StressLevel,
            "sleep_quality" => Question::SleepQuality,
            "social_satisfaction" => Question::SocialSatisfaction,
            _ => return None,
        })
    }

    /// Map an answer label onto the scale; `None` for labels this question
    /// does not know.
    pub fn answer(self, label: &str) -> Option<Step> {
        use Step::*;
        let step = match self {
            Question::MoodToday | Question::SleepQuality => match label {
                "very_poor" => Worst,
                "poor" => Poor,
                "fair" => Middle,
                "good" => Good,
                "excellent" => Best,
                _ => return None,
            },
            Question::EnergyLevel => match label {
                "very_low" => Worst,
                "low" => Poor,
                "moderate" => Middle,
                "high" => Good,
                "very_high" => Best,
                _ => return None,
            },
            // Inverted: less stress scores higher.
            Question::StressLevel => match label {
                "very_high" => Worst,
                "high" => Poor,
                "moderate" => Middle,
                "low" => Good,
                "very_low" => Best,
                _ => return None,
            },
            Question::SocialSatisfaction => match label {
                "very_dissatisfied" => Worst,
                "dissatisfied" => Poor,
                "neutral" => Middle,
                "satisfied" => Good,
                "very_satisfied" => Best,
                _ => return None,
            },
        };
        Some(step)
    }
}

/// Raw question → answer pairs as submitted. Unknown keys and labels are kept
/// here and ignored at scoring time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyResponses {
    answers: BTreeMap<String, String>,
}

impl SurveyResponses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question: &str, answer: &str) -> Self {
        self.answers.insert(question.to_string(), answer.to_string());
        self
    }

    /// Lenient read of a JSON survey map; non-string answers are dropped.
    pub fn from_json(v: &Value) -> Self {
        let answers = v
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();
        Self { answers }
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Recognized `(question, step)` pairs.
    pub fn recognized(&self) -> impl Iterator<Item = (Question, Step)> + '_ {
        self.answers
            .iter()
            .filter_map(|(k, a)| Question::parse(k).and_then(|q| q.answer(a).map(|s| (q, s))))
    }

    /// Mean of recognized answers, or 0.5 when nothing was recognized.
    pub fn score(&self) -> f64 {
        let (total, count) = self
            .recognized()
            .fold((0.0, 0usize), |(t, n), (_, s)| (t + s.value(), n + 1));
        if count == 0 {
            return NEUTRAL;
        }
        (total / count as f64).clamp(0.0, 1.0)
    }
}
