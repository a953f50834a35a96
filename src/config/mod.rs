// src/config/mod.rs
//! Service configuration (TOML file + environment overrides).

pub mod app;

pub use app::{AppConfig, ModelConfig, PredictionConfig, SentimentConfig};
