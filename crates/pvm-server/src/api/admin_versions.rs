//! Admin product panel — archive file name and released versions.
//!
//! GET  /admin/products/{id}/versions  — render the panel
//! POST /admin/products/{id}/versions  — save it, then redirect back

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::get,
    Router,
};
use axum_extra::extract::Form;
use serde::Deserialize;

use crate::api::middleware::AuthUser;
use crate::services::store::{ProductId, ProductMetaStore};
use crate::views::{admin_panel, ErrorPage};
use crate::AppState;
use pvm_common::sanitize::sanitize_text_field;
use pvm_common::version::pair_submitted;
use pvm_common::AppResult;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/products/{id}/versions",
            get(show_panel).post(save_panel),
        )
        .with_state(state)
}

// ─── Types ───────────────────────────────────────────────────

/// Submitted panel. Rows added in the browser arrive as repeated
/// `version_name[]` / `release_date[]` fields.
#[derive(Debug, Default, Deserialize)]
pub struct PanelForm {
    #[serde(rename = "plugin-file-name")]
    pub file_name: Option<String>,
    #[serde(rename = "version_name[]", default)]
    pub version_names: Vec<String>,
    #[serde(rename = "release_date[]", default)]
    pub release_dates: Vec<String>,
}

// ─── Handlers ────────────────────────────────────────────────

async fn show_panel(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<ProductId>,
) -> Result<Html<String>, ErrorPage> {
    auth.require_admin()?;

    let file_name = state.meta.file_name(product_id).await?;
    let versions = state.meta.versions(product_id).await?.unwrap_or_default();

    Ok(Html(admin_panel::render(
        product_id,
        file_name.as_deref(),
        &versions,
    )))
}

async fn save_panel(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<ProductId>,
    Form(form): Form<PanelForm>,
) -> Result<Redirect, ErrorPage> {
    auth.require_admin()?;

    save_product_meta(state.meta.as_ref(), product_id, form).await?;

    Ok(Redirect::to(&format!("/admin/products/{}/versions", product_id)))
}

/// Persist a submitted panel.
///
/// The file name is stored as submitted (after clean-up) and removed when the
/// field is absent. Version rows are paired by position; a row missing its
/// name or date is dropped, and an empty result removes the attribute.
pub async fn save_product_meta(
    store: &dyn ProductMetaStore,
    product_id: ProductId,
    form: PanelForm,
) -> AppResult<()> {
    match form.file_name {
        Some(name) => {
            store
                .set_file_name(product_id, &sanitize_text_field(&name))
                .await?
        }
        None => store.delete_file_name(product_id).await?,
    }

    let names: Vec<String> = form
        .version_names
        .iter()
        .map(|n| sanitize_text_field(n))
        .collect();
    let dates: Vec<String> = form
        .release_dates
        .iter()
        .map(|d| sanitize_text_field(d))
        .collect();

    let versions = pair_submitted(&names, &dates);
    if versions.is_empty() {
        store.delete_versions(product_id).await?;
    } else {
        store.set_versions(product_id, &versions).await?;
    }

    tracing::info!(
        product_id,
        versions = versions.len(),
        submitted = names.len(),
        "Product versions saved"
    );
    Ok(())
}
