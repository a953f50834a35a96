// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET  /health
// - POST /calculate_sentiment  (every method + bad bodies)
// - POST /interpret
// - POST /predict              (valid, invalid, crisis, no model)
// - POST /feedback
// - GET  /privacy
// - GET  /debug/history

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use mental_health_predictor::api::{self, AppState};
use mental_health_predictor::config::AppConfig;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Same wiring as the binary, with the bundled model and no metrics route.
fn test_router() -> Router {
    let mut cfg = AppConfig::default();
    cfg.metrics_enabled = false;
    mental_health_predictor::app_with_config(&cfg).expect("bundled model should load")
}

fn good_input() -> Json {
    json!({
        "Sentiment_Score": 0.95,
        "HRV": 90,
        "Sleep_Hours": 8,
        "Activity": 12000,
        "Age": 30,
        "Gender": "Female",
        "Work_Study_Hours": 6
    })
}

fn bad_input() -> Json {
    json!({
        "Sentiment_Score": 0.05,
        "HRV": 20,
        "Sleep_Hours": 4,
        "Activity": 1000,
        "Age": 35,
        "Gender": "Male",
        "Work_Study_Hours": 14
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Json) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b)),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, v)
}

async fn post(app: &Router, uri: &str, payload: Json) -> (StatusCode, Json) {
    send(app, "POST", uri, Some(payload.to_string())).await
}

#[tokio::test]
async fn health_reports_model_state() {
    let app = test_router();
    let (status, v) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["status"], "healthy");
    assert_eq!(v["model_loaded"], true);
    assert_eq!(v["version"], env!("CARGO_PKG_VERSION"));
    assert!(v["timestamp"].is_string());

    let bare = api::router(AppState::without_model(10));
    let (_, v) = send(&bare, "GET", "/health", None).await;
    assert_eq!(v["model_loaded"], false);
}

#[tokio::test]
async fn text_payload_uses_text_analysis() {
    let app = test_router();
    let (status, v) = post(
        &app,
        "/calculate_sentiment",
        json!({ "text": "I feel happy and great, such a wonderful day" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["method_used"], "text_analysis");
    assert_eq!(v["status"], "success");
    let score = v["sentiment_score"].as_f64().unwrap();
    assert!(score > 0.0 && score <= 1.0, "score {score}");
    assert!(v["interpretation"]["level"].is_string());
    assert!(v["timestamp"].is_string());
}

#[tokio::test]
async fn activities_payload_uses_behavioral_analysis() {
    let app = test_router();
    let (status, v) = post(
        &app,
        "/calculate_sentiment",
        json!({ "activities": {
            "sleep_hours": 8,
            "activity_level": "high",
            "social_interaction": "high",
            "work_stress": "low"
        }}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["method_used"], "behavioral_analysis");
    assert_eq!(v["sentiment_score"].as_f64().unwrap(), 0.95);
    assert_eq!(v["interpretation"]["level"], "positive");
}

#[tokio::test]
async fn survey_payload_uses_survey_analysis() {
    let app = test_router();
    let (status, v) = post(
        &app,
        "/calculate_sentiment",
        json!({ "survey": { "mood_today": "good", "stress_level": "low" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["method_used"], "survey_analysis");
    assert_eq!(v["sentiment_score"].as_f64().unwrap(), 0.75);
}

#[tokio::test]
async fn text_wins_over_other_modalities() {
    let app = test_router();
    let (_, v) = post(
        &app,
        "/calculate_sentiment",
        json!({
            "text": "okay",
            "activities": { "sleep_hours": 8 },
            "survey": { "mood_today": "good" }
        }),
    )
    .await;
    assert_eq!(v["method_used"], "text_analysis");
}

#[tokio::test]
async fn blank_text_falls_through_to_combined() {
    let app = test_router();
    let (status, v) = post(&app, "/calculate_sentiment", json!({ "text": "   " })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["method_used"], "combined_analysis");
    assert_eq!(v["sentiment_score"].as_f64().unwrap(), 0.5);
}

#[tokio::test]
async fn empty_or_malformed_bodies_are_rejected() {
    let app = test_router();

    let (status, v) = post(&app, "/calculate_sentiment", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error"], "No data provided");
    assert_eq!(v["error_code"], "BAD_REQUEST");

    let (status, _) = post(&app, "/calculate_sentiment", json!([1, 2])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, v) = send(
        &app,
        "POST",
        "/calculate_sentiment",
        Some("{not json".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error_code"], "BAD_REQUEST");
}

#[tokio::test]
async fn interpret_respects_band_edges() {
    let app = test_router();
    for (score, level) in [(0.7, "positive"), (0.69, "neutral"), (0.31, "neutral"), (0.3, "negative")] {
        let (status, v) = post(&app, "/interpret", json!({ "score": score })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["level"], level, "score {score}");
        assert!(v["recommendation"].is_string());
        assert!(v["color"].is_string());
    }

    let (status, _) = post(&app, "/interpret", json!({ "score": "high" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn predict_healthy_profile() {
    let app = test_router();
    let (status, v) = post(&app, "/predict", good_input()).await;
    assert_eq!(status, StatusCode::OK, "{v}");
    assert_eq!(v["prediction"], "High");
    assert_eq!(v["crisis_detected"], false);
    assert_eq!(v["status"], "success");

    let p = &v["probabilities"];
    let sum: f64 = ["Low", "Moderate", "High"]
        .iter()
        .map(|k| p[*k].as_f64().unwrap())
        .sum();
    assert!((sum - 1.0).abs() < 1e-9);
    assert!(v["chatbot_message"].as_str().unwrap().contains("Great news"));
    assert_eq!(
        v["model_accuracy"],
        "This model has a cross-validation accuracy of 80.8%."
    );
    assert!(v["processing_time_ms"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn predict_flags_crisis() {
    let app = test_router();
    let (status, v) = post(&app, "/predict", bad_input()).await;
    assert_eq!(status, StatusCode::OK, "{v}");
    assert_eq!(v["prediction"], "Low");
    assert_eq!(v["crisis_detected"], true);
    assert!(v["probabilities"]["Low"].as_f64().unwrap() > 0.8);
    assert_eq!(v["disclaimer"], "");
}

#[tokio::test]
async fn predict_reports_every_validation_problem() {
    let app = test_router();
    let mut input = good_input();
    input["Sentiment_Score"] = json!(1.5);
    input["Gender"] = json!("Other");
    input.as_object_mut().unwrap().remove("Age");

    let (status, v) = post(&app, "/predict", input).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["error_code"], "VALIDATION_ERROR");
    let msg = v["error"].as_str().unwrap();
    assert!(msg.starts_with("Invalid input_data"), "{msg}");
    assert!(msg.contains("Sentiment_Score must be between 0 and 1"), "{msg}");
    assert!(msg.contains("Missing required field: Age"), "{msg}");
    assert!(msg.contains("Gender must be 'Male' or 'Female'"), "{msg}");
}

#[tokio::test]
async fn predict_without_model_is_503() {
    let app = api::router(AppState::without_model(10));
    let (status, v) = post(&app, "/predict", good_input()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(v["error_code"], "MODEL_UNAVAILABLE");
}

#[tokio::test]
async fn feedback_is_acknowledged() {
    let app = test_router();
    let (status, v) = post(
        &app,
        "/feedback",
        json!({ "rating": 4, "comment": "helpful, thanks" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["message"], "Feedback received successfully");

    let (status, _) = post(&app, "/feedback", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn privacy_notice_lists_every_section() {
    let app = test_router();
    let (status, v) = send(&app, "GET", "/privacy", None).await;
    assert_eq!(status, StatusCode::OK);
    for key in [
        "data_collection",
        "data_usage",
        "data_sharing",
        "data_retention",
        "user_rights",
        "contact",
    ] {
        assert!(v[key].is_string(), "missing `{key}` in {v}");
    }
    assert_eq!(v["data_sharing"], "We do not share personal data with third parties");
    assert!(v["data_retention"].as_str().unwrap().contains("90 days"));
}

#[tokio::test]
async fn history_records_outcomes_without_raw_text() {
    let app = test_router();
    let secret = "my private diary entry about feeling sad";
    post(&app, "/calculate_sentiment", json!({ "text": secret })).await;
    post(&app, "/predict", bad_input()).await;
    post(&app, "/feedback", json!({ "comment": secret })).await;

    let (status, v) = send(&app, "GET", "/debug/history", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = v.as_array().expect("array");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["kind"], "sentiment");
    assert_eq!(entries[0]["label"], "text_analysis");
    assert_eq!(entries[1]["kind"], "prediction");
    assert_eq!(entries[1]["label"], "Low");
    assert_eq!(entries[1]["crisis"], true);
    assert_eq!(entries[2]["kind"], "feedback");
    assert!(!v.to_string().contains("diary"));
}

#[tokio::test]
async fn history_endpoint_returns_last_twenty() {
    let app = test_router();
    for _ in 0..25 {
        post(&app, "/calculate_sentiment", json!({ "text": "fine" })).await;
    }
    let (_, v) = send(&app, "GET", "/debug/history", None).await;
    assert_eq!(v.as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let app = test_router();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/calculate_sentiment")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
    assert!(resp
        .headers()
        .contains_key("access-control-allow-origin"));
}
