// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::prediction::{DEFAULT_CRISIS_THRESHOLD, DEFAULT_UNCERTAINTY_THRESHOLD};

pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";
pub const ENV_CONFIG_PATH: &str = "APP_CONFIG_PATH";

pub const ENV_MODEL_PATH: &str = "MODEL_PATH";
pub const ENV_LOAD_MODEL_ON_STARTUP: &str = "LOAD_MODEL_ON_STARTUP";
pub const ENV_CRISIS_THRESHOLD: &str = "CRISIS_THRESHOLD";
pub const ENV_UNCERTAINTY_THRESHOLD: &str = "UNCERTAINTY_THRESHOLD";
pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";
pub const ENV_COMPOUND_ENABLED: &str = "SENTIMENT_COMPOUND_ENABLED";
pub const ENV_HISTORY_CAPACITY: &str = "HISTORY_CAPACITY";

const MAX_HISTORY_CAPACITY: usize = 10_000;

fn default_model_path() -> String {
    "model/mental_health_model.json".to_string()
}
fn default_true() -> bool {
    true
}
fn default_crisis_threshold() -> f64 {
    DEFAULT_CRISIS_THRESHOLD
}
fn default_uncertainty_threshold() -> f64 {
    DEFAULT_UNCERTAINTY_THRESHOLD
}
fn default_history_capacity() -> usize {
    500
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
    /// When true, a model that fails to load aborts startup.
    #[serde(default = "default_true")]
    pub load_on_startup: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfig {
    #[serde(default = "default_crisis_threshold")]
    pub crisis_threshold: f64,
    #[serde(default = "default_uncertainty_threshold")]
    pub uncertainty_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Include the valence-aware compound estimator in text scoring.
    #[serde(default = "default_true")]
    pub compound_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            load_on_startup: true,
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            crisis_threshold: DEFAULT_CRISIS_THRESHOLD,
            uncertainty_threshold: DEFAULT_UNCERTAINTY_THRESHOLD,
        }
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            compound_enabled: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            prediction: PredictionConfig::default(),
            sentiment: SentimentConfig::default(),
            metrics_enabled: true,
            history_capacity: default_history_capacity(),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_unit(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let cfg: AppConfig =
            toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// File (`$APP_CONFIG_PATH`, else `config/app.toml`, else defaults) plus
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let base = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                if !Path::new(&p).exists() {
                    return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path {p}"));
                }
                Self::load_from_file(&p)?
            }
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => Self::default(),
        };
        Ok(base.with_env_from(|k| std::env::var(k).ok()))
    }

    /// Apply overrides from `lookup` (the process env in production).
    /// Unparseable values are ignored.
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = lookup(ENV_MODEL_PATH).filter(|p| !p.trim().is_empty()) {
            self.model.path = p.trim().to_string();
        }
        if let Some(b) = lookup(ENV_LOAD_MODEL_ON_STARTUP).as_deref().and_then(parse_bool) {
            self.model.load_on_startup = b;
        }
        if let Some(v) = lookup(ENV_CRISIS_THRESHOLD).as_deref().and_then(parse_unit) {
            self.prediction.crisis_threshold = v;
        }
        if let Some(v) = lookup(ENV_UNCERTAINTY_THRESHOLD).as_deref().and_then(parse_unit) {
            self.prediction.uncertainty_threshold = v;
        }
        if let Some(b) = lookup(ENV_METRICS_ENABLED).as_deref().and_then(parse_bool) {
            self.metrics_enabled = b;
        }
        if let Some(b) = lookup(ENV_COMPOUND_ENABLED).as_deref().and_then(parse_bool) {
            self.sentiment.compound_enabled = b;
        }
        if let Some(n) = lookup(ENV_HISTORY_CAPACITY).and_then(|s| s.trim().parse::<usize>().ok()) {
            self.history_capacity = n;
        }
        self.sanitized()
    }

    fn sanitized(mut self) -> Self {
        let p = &mut self.prediction;
        if !(0.0..=1.0).contains(&p.crisis_threshold) {
            p.crisis_threshold = DEFAULT_CRISIS_THRESHOLD;
        }
        if !(0.0..=1.0).contains(&p.uncertainty_threshold) {
            p.uncertainty_threshold = DEFAULT_UNCERTAINTY_THRESHOLD;
        }
        self.history_capacity = self.history_capacity.clamp(1, MAX_HISTORY_CAPACITY);
        self
    }
}
