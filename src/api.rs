// src/api.rs
//! HTTP surface: sentiment scoring, interpretation, prediction, feedback, privacy notice.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::classifier::Classifier;
use crate::error::ApiError;
use crate::history::{anon_hash, EventKind, History, HistoryEntry};
use crate::metrics::{self, Metrics};
use crate::prediction::{self, Prediction, PredictionInput, PredictionPolicy};
use crate::sentiment::{Interpretation, MethodUsed, ScoreRequest, SentimentEngine};

const HISTORY_SNAPSHOT: usize = 20;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SentimentEngine>,
    pub classifier: Option<Arc<dyn Classifier>>,
    pub policy: PredictionPolicy,
    pub history: Arc<History>,
}

impl AppState {
    /// Shared default engine, no model, default policy.
    pub fn without_model(history_capacity: usize) -> Self {
        Self {
            engine: Arc::new(SentimentEngine::default()),
            classifier: None,
            policy: PredictionPolicy::default(),
            history: Arc::new(History::with_capacity(history_capacity)),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }
}

/// Router without the `/metrics` route.
pub fn router(state: AppState) -> Router {
    create_router(state, None)
}

pub fn create_router(state: AppState, metrics: Option<&Metrics>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/calculate_sentiment", post(calculate_sentiment))
        .route("/interpret", post(interpret))
        .route("/predict", post(predict))
        .route("/feedback", post(feedback))
        .route("/privacy", get(privacy))
        .route("/debug/history", get(debug_history));

    if let Some(m) = metrics {
        router = router.merge(m.router());
    }

    router.layer(CorsLayer::very_permissive()).with_state(state)
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Body must be a non-empty JSON object.
fn require_object(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    let Json(v) = body.map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))?;
    match v.as_object() {
        Some(o) if !o.is_empty() => Ok(v),
        _ => Err(ApiError::bad_request("No data provided")),
    }
}

#[derive(Serialize)]
struct HealthResp {
    status: &'static str,
    timestamp: String,
    version: &'static str,
    model_loaded: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResp> {
    Json(HealthResp {
        status: "healthy",
        timestamp: now_iso(),
        version: env!("CARGO_PKG_VERSION"),
        model_loaded: state.classifier.is_some(),
    })
}

#[derive(Serialize)]
struct SentimentResp {
    sentiment_score: f64,
    method_used: MethodUsed,
    interpretation: Interpretation,
    timestamp: String,
    status: &'static str,
}

async fn calculate_sentiment(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SentimentResp>, ApiError> {
    let raw = require_object(body)?;
    let id = anon_hash(raw.to_string().as_bytes());
    let req: ScoreRequest = serde_json::from_value(raw)
        .map_err(|e| ApiError::bad_request(format!("Invalid request: {e}")))?;

    let out = state.engine.score(&req);
    let interpretation = state.engine.interpret(out.sentiment_score);

    info!(
        %id,
        score = out.sentiment_score,
        method = out.method_used.as_str(),
        "sentiment calculated"
    );
    metrics::record_sentiment(out.method_used.as_str());
    state.history.push(HistoryEntry::new(
        EventKind::Sentiment,
        id,
        out.method_used.as_str(),
        out.sentiment_score,
    ));

    Ok(Json(SentimentResp {
        sentiment_score: round3(out.sentiment_score),
        method_used: out.method_used,
        interpretation,
        timestamp: now_iso(),
        status: "success",
    }))
}

#[derive(Deserialize)]
struct InterpretReq {
    score: f64,
}

async fn interpret(
    State(state): State<AppState>,
    body: Result<Json<InterpretReq>, JsonRejection>,
) -> Result<Json<Interpretation>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::bad_request(format!("Invalid request: {e}")))?;
    Ok(Json(state.engine.interpret(req.score)))
}

async fn predict(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let raw = require_object(body)?;
    let Some(classifier) = state.classifier.as_deref() else {
        warn!("prediction requested but no model is loaded");
        return Err(ApiError::model_unavailable());
    };

    let id = anon_hash(raw.to_string().as_bytes());
    let input = PredictionInput::from_json(&raw).map_err(|e| {
        warn!(%id, problems = e.problems.len(), "prediction input rejected");
        ApiError::from(e)
    })?;

    let out = prediction::predict(classifier, &input, &state.policy)
        .map_err(|e| ApiError::model(&e))?;

    let label = out.prediction.as_str();
    if out.crisis_detected {
        error!(
            %id,
            p_low = out.probabilities.low,
            threshold = state.policy.crisis_threshold,
            "crisis detected"
        );
        metrics::record_crisis();
    }
    info!(
        %id,
        prediction = label,
        confidence = out.probabilities.max(),
        elapsed_ms = out.processing_time_ms,
        "prediction served"
    );
    metrics::record_prediction(label, out.processing_time_ms);
    state.history.push(
        HistoryEntry::new(EventKind::Prediction, id, label, out.probabilities.max())
            .crisis(out.crisis_detected),
    );

    Ok(Json(out))
}

#[derive(Serialize)]
struct FeedbackResp {
    message: &'static str,
    timestamp: String,
}

async fn feedback(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<FeedbackResp>, ApiError> {
    let raw = require_object(body)?;
    let serialized = raw.to_string();
    let id = anon_hash(serialized.as_bytes());
    info!(%id, bytes = serialized.len(), "feedback received");
    state
        .history
        .push(HistoryEntry::new(EventKind::Feedback, id, "feedback", 0.0));

    Ok(Json(FeedbackResp {
        message: "Feedback received successfully",
        timestamp: now_iso(),
    }))
}

/// Static privacy notice.
#[derive(Serialize)]
struct PrivacyNotice {
    data_collection: &'static str,
    data_usage: &'static str,
    data_sharing: &'static str,
    data_retention: &'static str,
    user_rights: &'static str,
    contact: &'static str,
}

const PRIVACY_NOTICE: PrivacyNotice = PrivacyNotice {
    data_collection: "We collect minimal data necessary for prediction accuracy",
    data_usage: "Data is used solely for improving prediction accuracy",
    data_sharing: "We do not share personal data with third parties",
    data_retention: "Data is retained for up to 90 days for model improvement",
    user_rights: "You can request data deletion at any time",
    contact: "Contact us for privacy-related questions",
};

async fn privacy() -> Json<PrivacyNotice> {
    Json(PRIVACY_NOTICE)
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.snapshot_last_n(HISTORY_SNAPSHOT))
}
