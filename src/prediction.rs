// src/prediction.rs
//! # Prediction
//! Validates a raw `/predict` payload, runs the classifier and dresses the
//! result up for the UI: uncertainty disclaimer, chatbot message and the
//! crisis flag.
//!
//! Validation collects every problem before failing so the caller sees all
//! of them at once.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Instant;

use crate::classifier::{Classifier, FeatureVector, HealthStatus, Probabilities};

pub const DEFAULT_CRISIS_THRESHOLD: f64 = 0.8;
pub const DEFAULT_UNCERTAINTY_THRESHOLD: f64 = 0.7;

/// Validated model input (gender still as a label).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionInput {
    pub sentiment_score: f64,
    pub hrv: f64,
    pub sleep_hours: f64,
    pub activity: i64,
    pub age: i64,
    pub gender: String,
    pub work_study_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub problems: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid input_data: {}", self.problems.join("; "))
    }
}

impl std::error::Error for ValidationError {}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Numbers and numeric strings.
fn as_float(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|x| x.is_finite())
}

/// Integers, floats (truncated toward zero) and integer strings.
fn as_whole(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|x| x.is_finite()).map(|x| x.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

struct Checker<'a> {
    obj: &'a Map<String, Value>,
    problems: Vec<String>,
}

impl Checker<'_> {
    fn field(&mut self, name: &str) -> Option<&Value> {
        let v = self.obj.get(name);
        if v.is_none() {
            self.problems.push(format!("Missing required field: {name}"));
        }
        v
    }

    fn float(&mut self, name: &str, check: impl Fn(f64) -> Option<String>) -> f64 {
        let Some(v) = self.field(name).cloned() else {
            return 0.0;
        };
        match as_float(&v) {
            Some(x) => {
                if let Some(msg) = check(x) {
                    self.problems.push(msg);
                }
                x
            }
            None => {
                self.problems
                    .push(format!("{name} must be a number, got {}", type_name(&v)));
                0.0
            }
        }
    }

    fn whole(&mut self, name: &str, check: impl Fn(i64) -> Option<String>) -> i64 {
        let Some(v) = self.field(name).cloned() else {
            return 0;
        };
        match as_whole(&v) {
            Some(x) => {
                if let Some(msg) = check(x) {
                    self.problems.push(msg);
                }
                x
            }
            None => {
                self.problems
                    .push(format!("{name} must be a whole number, got {}", type_name(&v)));
                0
            }
        }
    }
}

impl PredictionInput {
    pub fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let Some(obj) = data.as_object() else {
            return Err(ValidationError {
                problems: vec![format!("expected a JSON object, got {}", type_name(data))],
            });
        };
        let mut c = Checker {
            obj,
            problems: Vec::new(),
        };

        let sentiment_score = c.float("Sentiment_Score", |v| {
            (!(0.0..=1.0).contains(&v))
                .then(|| format!("Sentiment_Score must be between 0 and 1, got {v}"))
        });
        let hrv = c.float("HRV", |v| {
            if v < 0.0 {
                Some(format!("HRV cannot be negative, got {v}"))
            } else if v > 200.0 {
                Some(format!("HRV seems unusually high ({v}), please verify"))
            } else {
                None
            }
        });
        let sleep_hours = c.float("Sleep_Hours", |v| hours_problem("Sleep_Hours", v));
        let activity = c.whole("Activity", |v| {
            if v < 0 {
                Some(format!("Activity cannot be negative, got {v}"))
            } else if v > 100_000 {
                Some(format!("Activity seems unusually high ({v}), please verify"))
            } else {
                None
            }
        });
        let age = c.whole("Age", |v| {
            if v < 0 {
                Some(format!("Age cannot be negative, got {v}"))
            } else if v > 120 {
                Some(format!("Age seems unusually high ({v}), please verify"))
            } else {
                None
            }
        });
        let gender = match c.field("Gender").cloned() {
            Some(Value::String(g)) if g == "Male" || g == "Female" => g,
            Some(other) => {
                let shown = other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string());
                c.problems
                    .push(format!("Gender must be 'Male' or 'Female', got '{shown}'"));
                String::new()
            }
            None => String::new(),
        };
        let work_study_hours =
            c.float("Work_Study_Hours", |v| hours_problem("Work_Study_Hours", v));

        if !c.problems.is_empty() {
            return Err(ValidationError {
                problems: c.problems,
            });
        }
        Ok(Self {
            sentiment_score,
            hrv,
            sleep_hours,
            activity,
            age,
            gender,
            work_study_hours,
        })
    }

    /// Feature vector in model column order, gender encoded by `classifier`.
    pub fn features(&self, classifier: &dyn Classifier) -> Result<FeatureVector> {
        let gender = classifier
            .gender_encoder()
            .transform(&self.gender)
            .context("encoding Gender")?;
        Ok(FeatureVector([
            self.sentiment_score,
            self.hrv,
            self.sleep_hours,
            self.activity as f64,
            self.age as f64,
            gender,
            self.work_study_hours,
        ]))
    }
}

fn hours_problem(name: &str, v: f64) -> Option<String> {
    if v < 0.0 {
        Some(format!("{name} cannot be negative, got {v}"))
    } else if v > 24.0 {
        Some(format!("{name} cannot exceed 24, got {v}"))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionPolicy {
    /// P(Low) strictly above this, with a Low verdict, flags a crisis.
    pub crisis_threshold: f64,
    /// Max probability below this adds the uncertainty disclaimer.
    pub uncertainty_threshold: f64,
}

impl Default for PredictionPolicy {
    fn default() -> Self {
        Self {
            crisis_threshold: DEFAULT_CRISIS_THRESHOLD,
            uncertainty_threshold: DEFAULT_UNCERTAINTY_THRESHOLD,
        }
    }
}

impl PredictionPolicy {
    pub fn is_crisis(&self, status: HealthStatus, p: &Probabilities) -> bool {
        status == HealthStatus::Low && p.low > self.crisis_threshold
    }

    pub fn disclaimer(&self, p: &Probabilities) -> String {
        if p.max() < self.uncertainty_threshold {
            format!(
                "This prediction is uncertain (confidence below {:.0}%). Please consult a professional for an accurate assessment.",
                self.uncertainty_threshold * 100.0
            )
        } else {
            String::new()
        }
    }
}

/// Cross-validation accuracy of the bundled model, reported with every prediction.
pub const MODEL_ACCURACY_NOTE: &str = "This model has a cross-validation accuracy of 80.8%.";

pub fn chatbot_message(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Low => "It looks like you might be experiencing low mental health. Consider reaching out to a friend or professional for support.",
        HealthStatus::Moderate => "Your mental health seems moderate. Keep up with self-care practices, and consider talking to someone if you feel overwhelmed.",
        HealthStatus::High => "Great news! Your mental health appears to be high. Keep maintaining your healthy habits!",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub prediction: HealthStatus,
    pub probabilities: Probabilities,
    pub disclaimer: String,
    pub model_accuracy: &'static str,
    pub chatbot_message: String,
    pub crisis_detected: bool,
    pub processing_time_ms: f64,
    pub timestamp: String,
    pub status: &'static str,
}

/// Run the classifier on validated input and assemble the response.
pub fn predict(
    classifier: &dyn Classifier,
    input: &PredictionInput,
    policy: &PredictionPolicy,
) -> Result<Prediction> {
    let features = input.features(classifier)?;

    let started = Instant::now();
    let probabilities = classifier
        .predict_proba(&features)
        .with_context(|| format!("classifier '{}' failed", classifier.name()))?;
    let elapsed = started.elapsed();

    let label = probabilities.argmax();
    Ok(Prediction {
        prediction: label,
        probabilities,
        disclaimer: policy.disclaimer(&probabilities),
        model_accuracy: MODEL_ACCURACY_NOTE,
        chatbot_message: chatbot_message(label).to_string(),
        crisis_detected: policy.is_crisis(label, &probabilities),
        processing_time_ms: (elapsed.as_secs_f64() * 1000.0 * 100.0).round() / 100.0,
        timestamp: chrono::Utc::now().to_rfc3339(),
        status: "success",
    })
}
