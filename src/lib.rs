// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod history;
pub mod metrics;
pub mod prediction;
pub mod sentiment;

// `crate_root::router` as well as `crate_root::api::router`
pub use crate::api::router;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::AppState;
use crate::classifier::{Classifier, LinearModel};
use crate::config::AppConfig;
use crate::history::History;
use crate::prediction::PredictionPolicy;
use crate::sentiment::SentimentEngine;

pub const DEFAULT_LOG_FILTER: &str = "mental_health_predictor=info,warn";

/// Install the global tracing subscriber. `RUST_LOG` wins over the default
/// filter; `LOG_FORMAT=json` switches to structured output. Safe to call
/// more than once.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

fn load_classifier(cfg: &AppConfig) -> Result<Option<Arc<dyn Classifier>>> {
    match LinearModel::from_path(&cfg.model.path) {
        Ok(m) => Ok(Some(Arc::new(m))),
        Err(e) if cfg.model.load_on_startup => {
            Err(e).context("model is required at startup (set LOAD_MODEL_ON_STARTUP=0 to skip)")
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "model not loaded; /predict will answer 503");
            Ok(None)
        }
    }
}

/// Build the full application router from [`AppConfig::load`].
pub async fn app() -> Result<Router> {
    let cfg = AppConfig::load()?;
    app_with_config(&cfg)
}

pub fn app_with_config(cfg: &AppConfig) -> Result<Router> {
    let classifier = load_classifier(cfg)?;
    let policy = PredictionPolicy {
        crisis_threshold: cfg.prediction.crisis_threshold,
        uncertainty_threshold: cfg.prediction.uncertainty_threshold,
    };

    let metrics = if cfg.metrics_enabled {
        metrics::Metrics::init(classifier.is_some(), policy.crisis_threshold)
    } else {
        None
    };

    info!(
        model_loaded = classifier.is_some(),
        model_path = %cfg.model.path,
        crisis_threshold = policy.crisis_threshold,
        compound = cfg.sentiment.compound_enabled,
        metrics = metrics.is_some(),
        "application configured"
    );

    let state = AppState {
        engine: Arc::new(SentimentEngine::new(cfg.sentiment.compound_enabled)),
        classifier,
        policy,
        history: Arc::new(History::with_capacity(cfg.history_capacity)),
    };
    Ok(api::create_router(state, metrics.as_ref()))
}
