//! REST API endpoints for the telemetry-service.
//!
//! # Endpoints
//!
//! - `POST /data` - Ingest plain-text readings, one `"<timestamp> <name> <value>"` per line
//! - `GET /data?from=..&to=..` - Readings in the inclusive range, followed by daily power
//!
//! # Response Shapes
//!
//! Both endpoints answer with HTTP 200. Failures are reported in the body as
//! `{"success": false}` rather than through the status code:
//!
//! - A body with any line that is not exactly three fields is rejected as a
//!   whole and nothing is stored.
//! - Lines whose timestamp or value is not numeric are dropped, and the
//!   request still reports `{"success": true}`.
//! - A missing or unparseable `from`/`to` is rejected before the store is read.
//!
//! # Lock Acquisition
//!
//! `state.store` is locked once per request. Parsing happens before the lock
//! is taken; a whole batch is inserted under a single lock.
//!
//! # Example
//!
//! ```ignore
//! use telemetry_service::api;
//!
//! let app = api::app(state);
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use telemetry_store::ReadingQuery;
use telemetry_types::{ParseError, PowerSample, Reading, parse_batch, parse_instant};

use crate::middleware::security_headers;
use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/data", get(get_data).post(post_data))
}

/// Create the full application: routes plus tracing, CORS, body limit and
/// security headers, bound to `state`.
pub fn app(state: Arc<AppState>) -> Router {
    let security = Arc::new(state.config.security.clone());
    let body_limit = state.config.server.max_body_bytes;

    router()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn_with_state(
            security,
            security_headers,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// `{"success": bool}` response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// One element of a range query response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataPoint {
    /// A stored reading.
    Reading(Reading),
    /// A derived daily power value.
    Power(PowerSample),
}

/// Ingest plain-text readings.
///
/// # Lock Acquisition
///
/// The body is parsed before the store mutex is acquired; the batch is
/// then inserted under one lock.
///
/// Invalid UTF-8 is replaced with U+FFFD rather than rejected, so the reply
/// is always a `{"success": bool}` body.
async fn post_data(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SuccessResponse>, AppError> {
    let body = String::from_utf8_lossy(&body);
    let batch = parse_batch(&body).map_err(AppError::MalformedBatch)?;

    for skipped in &batch.skipped {
        debug!("Skipping {}", skipped);
    }

    let lines = batch.lines();
    let skipped = batch.skipped.len();
    let written = state.store.lock().await.insert_batch(batch.readings);

    info!(
        "Ingested {} of {} lines ({} skipped)",
        written, lines, skipped
    );

    Ok(Json(SuccessResponse { success: true }))
}

/// Query parameters for the range query.
#[derive(Debug, Deserialize, Default)]
pub struct RangeParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeParams {
    /// Parse both bounds into an inclusive store query.
    pub fn to_query(&self) -> Result<ReadingQuery, AppError> {
        let (Some(from), Some(to)) = (self.from.as_deref(), self.to.as_deref()) else {
            return Err(AppError::MissingRange);
        };

        let from = parse_instant(from).map_err(AppError::InvalidRange)?;
        let to = parse_instant(to).map_err(AppError::InvalidRange)?;

        Ok(ReadingQuery::range(from, to))
    }
}

/// Readings in range followed by daily power over the same range.
///
/// Readings are ordered oldest first; power samples by ascending day.
///
/// # Errors
///
/// - Returns [`AppError::MissingRange`] if `from` or `to` is absent
/// - Returns [`AppError::InvalidRange`] if either cannot be parsed
/// - Returns [`AppError::InvalidQuery`] if the query string itself is malformed
async fn get_data(
    State(state): State<Arc<AppState>>,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<Vec<DataPoint>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::InvalidQuery(e.body_text()))?;
    let query = params.to_query()?;

    let (readings, power) = {
        let store = state.store.lock().await;
        (store.query_readings(&query), store.daily_power(&query))
    };

    debug!(
        "Range query matched {} readings across {} days",
        readings.len(),
        power.len()
    );

    let data = readings
        .into_iter()
        .map(DataPoint::Reading)
        .chain(power.into_iter().map(DataPoint::Power))
        .collect();

    Ok(Json(data))
}

/// Application error type.
///
/// Every variant is reported to the client as `{"success": false}` with
/// HTTP 200; the detail is only logged.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("malformed batch: {0}")]
    MalformedBatch(ParseError),
    #[error("missing 'from' or 'to' query parameter")]
    MissingRange,
    #[error("invalid range: {0}")]
    InvalidRange(ParseError),
    #[error("invalid query string: {0}")]
    InvalidQuery(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        debug!("Rejecting request: {}", self);
        (StatusCode::OK, Json(SuccessResponse { success: false })).into_response()
    }
}
