//! HTTP gateway: the `/solve_captcha` endpoint.
//!
//! A thin, stateless-per-request layer over the dispatcher. Validation
//! failures come back as 400 without ever touching the dispatcher; upstream
//! failures are logged with detail and surfaced as a generic 500 so internal
//! error text never leaks to the caller.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use recap_core::Solver;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub solver: Arc<dyn Solver>,
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/solve_captcha", post(solve_captcha))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
}

/// Bind the listener and serve until shutdown.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("recap gateway listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Deserialize)]
struct SolveRequest {
    #[serde(default)]
    base64_image: Option<String>,
}

async fn solve_captcha(
    State(state): State<AppState>,
    Json(req): Json<SolveRequest>,
) -> (StatusCode, Json<Value>) {
    let Some(image) = req.base64_image.filter(|s| !s.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "base64_image is required"})),
        );
    };

    match state.solver.solve(image).await {
        Ok(text) => (StatusCode::OK, Json(json!({"captcha": text}))),
        Err(e) => {
            // Full detail stays server-side; the caller gets a generic body.
            tracing::error!(error = %e, "failed to solve captcha");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to process the captcha"})),
            )
        }
    }
}
