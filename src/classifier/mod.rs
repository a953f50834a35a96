// src/classifier/mod.rs
//! Model boundary: a pre-trained classifier consumed as a black box.
//!
//! The service only needs `predict_proba(features[7]) -> probabilities[3]`.
//! Feature order is fixed by [`FEATURE_COLUMNS`]; gender is label-encoded by
//! the classifier's own encoder before it lands in the vector.

pub mod linear;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub use linear::{LinearArtifact, LinearModel};

pub const FEATURE_COLUMNS: [&str; 7] = [
    "Sentiment_Score",
    "HRV",
    "Sleep_Hours",
    "Activity",
    "Age",
    "Gender",
    "Work_Study_Hours",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Low,
    Moderate,
    High,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 3] = [HealthStatus::Low, HealthStatus::Moderate, HealthStatus::High];

    /// Class index used by the model output: 0 → Low, 1 → Moderate, 2 → High.
    pub fn index(self) -> usize {
        match self {
            HealthStatus::Low => 0,
            HealthStatus::Moderate => 1,
            HealthStatus::High => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Low => "Low",
            HealthStatus::Moderate => "Moderate",
            HealthStatus::High => "High",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        HealthStatus::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(label.trim()))
    }
}

/// Model input in [`FEATURE_COLUMNS`] order, gender already encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; 7]);

/// Class probabilities, serialized as `{"Low": .., "Moderate": .., "High": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Moderate")]
    pub moderate: f64,
    #[serde(rename = "High")]
    pub high: f64,
}

impl Probabilities {
    pub fn from_indexed(p: [f64; 3]) -> Self {
        Self {
            low: p[0],
            moderate: p[1],
            high: p[2],
        }
    }

    pub fn get(&self, s: HealthStatus) -> f64 {
        match s {
            HealthStatus::Low => self.low,
            HealthStatus::Moderate => self.moderate,
            HealthStatus::High => self.high,
        }
    }

    /// Most likely class; ties resolve to the lower class index.
    pub fn argmax(&self) -> HealthStatus {
        let mut best = HealthStatus::Low;
        for s in HealthStatus::ALL {
            if self.get(s) > self.get(best) {
                best = s;
            }
        }
        best
    }

    pub fn max(&self) -> f64 {
        self.get(self.argmax())
    }
}

/// Label encoder for the Gender column. Classes are stored sorted, so the
/// code of a label is its position (Female = 0, Male = 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenderEncoder {
    classes: Vec<String>,
}

impl Default for GenderEncoder {
    fn default() -> Self {
        Self::new(["Female", "Male"])
    }
}

impl GenderEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn transform(&self, label: &str) -> Result<f64> {
        match self.classes.iter().position(|c| c == label) {
            Some(i) => Ok(i as f64),
            None => bail!("unseen gender label '{label}' (known: {:?})", self.classes),
        }
    }
}

/// A pre-trained classifier. Implementations must be immutable after load so
/// one instance can serve concurrent requests.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    fn gender_encoder(&self) -> &GenderEncoder;

    fn predict_proba(&self, features: &FeatureVector) -> Result<Probabilities>;

    fn predict(&self, features: &FeatureVector) -> Result<HealthStatus> {
        Ok(self.predict_proba(features)?.argmax())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_encoder_sorts_classes() {
        let enc = GenderEncoder::new(["Male", "Female"]);
        assert_eq!(enc.transform("Female").unwrap(), 0.0);
        assert_eq!(enc.transform("Male").unwrap(), 1.0);
        assert!(enc.transform("male").is_err());
    }

    #[test]
    fn argmax_and_max() {
        let p = Probabilities::from_indexed([0.2, 0.5, 0.3]);
        assert_eq!(p.argmax(), HealthStatus::Moderate);
        assert_eq!(p.max(), 0.5);
        let tie = Probabilities::from_indexed([0.4, 0.4, 0.2]);
        assert_eq!(tie.argmax(), HealthStatus::Low);
    }

    #[test]
    fn probabilities_serialize_with_class_labels() {
        let v = serde_json::to_value(Probabilities::from_indexed([0.1, 0.2, 0.7])).unwrap();
        assert_eq!(v["Low"], 0.1);
        assert_eq!(v["Moderate"], 0.2);
        assert_eq!(v["High"], 0.7);
    }

    #[test]
    fn status_index_and_parse() {
        for (i, s) in HealthStatus::ALL.into_iter().enumerate() {
            assert_eq!(s.index(), i);
            assert_eq!(HealthStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(HealthStatus::parse(" high "), Some(HealthStatus::High));
        assert_eq!(HealthStatus::parse("unknown"), None);
    }
}
