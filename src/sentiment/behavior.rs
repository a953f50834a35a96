// src/sentiment/behavior.rs
//! Behavioral scorer: activity signals → score in [0, 1].
//!
//! Start neutral (0.5), add one adjustment per signal, clamp.

use serde::Serialize;
use serde_json::Value;

const BASE: f64 = 0.5;
const DEFAULT_SLEEP_HOURS: f64 = 8.0;

/// Three-step ordinal answer used by the activity signals.
///
/// `Unrecognized` keeps unknown input explicit: every adjustment table maps
/// it to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    #[default]
    Moderate,
    High,
    Unrecognized,
}

impl Level {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "low" => Level::Low,
            "moderate" => Level::Moderate,
            "high" => Level::High,
            _ => Level::Unrecognized,
        }
    }

    /// Missing keys take the default; present non-string values are unrecognized.
    fn from_field(v: Option<&Value>) -> Self {
        match v {
            None | Some(Value::Null) => Level::default(),
            Some(Value::String(s)) => Level::parse(s),
            Some(_) => Level::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityProfile {
    pub sleep_hours: f64,
    pub activity_level: Level,
    pub social_interaction: Level,
    pub work_stress: Level,
}

impl Default for ActivityProfile {
    fn default() -> Self {
        Self {
            sleep_hours: DEFAULT_SLEEP_HOURS,
            activity_level: Level::Moderate,
            social_interaction: Level::Moderate,
            work_stress: Level::Moderate,
        }
    }
}

impl ActivityProfile {
    /// Lenient read of a JSON activity map. Never fails: non-objects read as
    /// empty, non-numeric `sleep_hours` falls back to the default.
    pub fn from_json(v: &Value) -> Self {
        let Some(obj) = v.as_object() else {
            return Self::default();
        };
        let sleep_hours = obj
            .get("sleep_hours")
            .and_then(Value::as_f64)
            .filter(|h| h.is_finite())
            .unwrap_or(DEFAULT_SLEEP_HOURS);
        Self {
            sleep_hours,
            activity_level: Level::from_field(obj.get("activity_level")),
            social_interaction: Level::from_field(obj.get("social_interaction")),
            work_stress: Level::from_field(obj.get("work_stress")),
        }
    }

    pub fn score(&self) -> f64 {
        let total = BASE
            + sleep_adjustment(self.sleep_hours)
            + activity_adjustment(self.activity_level)
            + social_adjustment(self.social_interaction)
            + stress_adjustment(self.work_stress);
        total.clamp(0.0, 1.0)
    }
}

// 6–7h and 9–10h are neither rewarded nor penalized.
fn sleep_adjustment(hours: f64) -> f64 {
    if (7.0..=9.0).contains(&hours) {
        0.1
    } else if hours < 6.0 || hours > 10.0 {
        -0.1
    } else {
        0.0
    }
}

fn activity_adjustment(l: Level) -> f64 {
    match l {
        Level::Low => -0.1,
        Level::Moderate => 0.0,
        Level::High => 0.1,
        Level::Unrecognized => 0.0,
    }
}

fn social_adjustment(l: Level) -> f64 {
    match l {
        Level::Low => -0.15,
        Level::Moderate => 0.0,
        Level::High => 0.15,
        Level::Unrecognized => 0.0,
    }
}

// Asymmetric: high stress costs more than low stress earns.
fn stress_adjustment(l: Level) -> f64 {
    match l {
        Level::Low => 0.1,
        Level::Moderate => 0.0,
        Level::High => -0.15,
        Level::Unrecognized => 0.0,
    }
}
