//! HTTP routes.

mod account;
mod actions;
mod admin_versions;
mod assets;
pub mod downloads;
mod health;
mod latest_version;
pub mod middleware;

use crate::AppState;
use axum::Router;
use std::sync::Arc;

/// Path the storefront's forms post their `action` to.
pub const ADMIN_POST_PATH: &str = "/admin-post";

/// Build the router with all sub-routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/admin", admin_versions::router(state.clone()))
        .nest("/my-account", account::router(state.clone()))
        .nest("/assets", assets::router())
        .merge(actions::router(state.clone()))
        .merge(latest_version::router(state))
        .merge(health::router())
}
