//! Availability routes
//!
//! Thin adapters from HTTP to [`rallypoint_core::AvailabilitySyncService`]:
//! extract, call, log one execution record, serialize.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use rallypoint_domain::{FreeInterval, LinkStatus, SyncError, SyncOutcome, SyncRequest};
use serde::Deserialize;
use tracing::info;

use super::error::ApiError;
use crate::utils::logging::log_operation;
use crate::AppContext;

/// Body of `POST /users/{user_id}/availability/sync`.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncBody {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub remove_conflicts: bool,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Query of `GET /users/{user_id}/availability/suggestions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionQuery {
    pub date: NaiveDate,
    /// Falls back to `availability.min_free_minutes`.
    pub min_duration_minutes: Option<i64>,
}

pub async fn sync_availability(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
    body: Result<Json<SyncBody>, JsonRejection>,
) -> Result<Json<SyncOutcome>, ApiError> {
    let Json(body) = body.map_err(|e| SyncError::InvalidRequest(e.body_text()))?;

    info!(
        user_id = %user_id,
        start_date = %body.start_date,
        end_date = %body.end_date,
        remove_conflicts = body.remove_conflicts,
        "sync requested"
    );

    let request = SyncRequest {
        user_id,
        start_date: body.start_date,
        end_date: body.end_date,
        remove_conflicts: body.remove_conflicts,
        group_id: body.group_id.filter(|group| !group.trim().is_empty()),
    };

    execute("availability::sync", ctx.sync_service.sync(request)).await
}

pub async fn link_status(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
) -> Result<Json<LinkStatus>, ApiError> {
    execute("availability::status", ctx.sync_service.get_status(&user_id)).await
}

pub async fn suggest_free_times(
    State(ctx): State<Arc<AppContext>>,
    Path(user_id): Path<String>,
    query: Result<Query<SuggestionQuery>, QueryRejection>,
) -> Result<Json<Vec<FreeInterval>>, ApiError> {
    let Query(query) = query.map_err(|e| SyncError::InvalidRequest(e.body_text()))?;
    let min_minutes =
        query.min_duration_minutes.unwrap_or(ctx.config.availability.min_free_minutes);

    execute(
        "availability::suggestions",
        ctx.sync_service.suggest_free_times(&user_id, query.date, min_minutes),
    )
    .await
}

/// Await one service call and log its execution record.
async fn execute<T, F>(operation: &'static str, call: F) -> Result<Json<T>, ApiError>
where
    F: Future<Output = Result<T, SyncError>>,
{
    let started = Instant::now();
    let result = call.await;

    log_operation(operation, started.elapsed(), result.as_ref().err().map(SyncError::label));

    result.map(Json).map_err(ApiError::from)
}
