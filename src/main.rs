//! Mental Health Predictor: binary entrypoint
//! Boots the Axum HTTP server: config, model, sentiment engine and routes.
//!
//! See `README.md` for the quickstart and environment variables.

use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    mental_health_predictor::init_tracing();

    let router = mental_health_predictor::app()
        .await
        .map_err(shuttle_runtime::Error::Custom)?;

    Ok(router.into())
}
