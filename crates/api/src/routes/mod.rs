//! HTTP surface

pub mod availability;
pub mod error;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

pub use error::{ApiError, ErrorBody};

use crate::utils::health::HealthStatus;
use crate::AppContext;

/// Build the router over a shared context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/users/{user_id}/availability/sync", post(availability::sync_availability))
        .route("/users/{user_id}/availability/status", get(availability::link_status))
        .route("/users/{user_id}/availability/suggestions", get(availability::suggest_free_times))
        .with_state(ctx)
}

async fn health(State(ctx): State<Arc<AppContext>>) -> (StatusCode, Json<HealthStatus>) {
    let status = ctx.health_check().await;
    let code = if status.is_healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(status))
}
