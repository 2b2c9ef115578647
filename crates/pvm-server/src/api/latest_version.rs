//! Latest-version endpoint.
//!
//! Update checkers poll this to learn the newest released version of a
//! product.
//!
//! Endpoint:
//!   GET /{namespace}/latest-version/{product_id}
//!
//! No authentication required.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::AppState;
use pvm_common::version::{latest_version, NO_VERSION};
use pvm_common::{AppError, AppResult};

pub fn router(state: Arc<AppState>) -> Router {
    let namespace = state.config.api.namespace.trim_matches('/').to_string();
    Router::new()
        .route(
            &format!("/{}/latest-version/{{product_id}}", namespace),
            get(get_latest_version),
        )
        .with_state(state)
}

// ─── Types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct LatestVersionResponse {
    latest_version: String,
}

// ─── Handler ─────────────────────────────────────────────────

async fn get_latest_version(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> AppResult<Json<LatestVersionResponse>> {
    if product_id.is_empty() || !product_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::BadRequest("Invalid parameter: product_id".into()));
    }
    // Digits beyond i64 cannot name a stored product.
    let versions = match product_id.parse::<i64>() {
        Ok(id) => state.meta.versions(id).await?.unwrap_or_default(),
        Err(_) => Vec::new(),
    };
    let latest = latest_version(&versions).unwrap_or(NO_VERSION);

    tracing::debug!(product_id = %product_id, latest, "Latest version lookup");

    Ok(Json(LatestVersionResponse {
        latest_version: latest.to_string(),
    }))
}
