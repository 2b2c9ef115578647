//! Release archive download.
//!
//! Relays `{file host}/{file name}/xyzk-{version}.zip` to the customer as an
//! attachment. Every failure ends the request with an error page before any
//! byte is relayed:
//! - missing `selected_version` / `product_id` → 400
//! - product has no archive file name → 404 (the file host is never contacted)
//!
//! Variations take the archive file name of their parent product.
//! - probe answers anything but 200, or the host is unreachable → 502

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};

use crate::services::file_host::archive_url;
use crate::AppState;
use pvm_common::sanitize::{parse_int_lenient, sanitize_file_name, sanitize_text_field};
use pvm_common::{AppError, AppResult};

/// Action name the account page form submits.
pub const DOWNLOAD_ACTION: &str = "download_product_version";

#[derive(Debug)]
pub struct DownloadRequest {
    pub selected_version: Option<String>,
    pub product_id: Option<String>,
}

pub async fn download_product_version(
    state: &AppState,
    request: DownloadRequest,
) -> AppResult<Response> {
    let (Some(version), Some(product_id)) = (request.selected_version, request.product_id) else {
        return Err(AppError::BadRequest("Invalid request!".into()));
    };

    let version = sanitize_text_field(&version);
    if version.is_empty() {
        return Err(AppError::BadRequest("Invalid request!".into()));
    }
    let product_id = parse_int_lenient(&product_id);
    let owner = state
        .shop
        .product(product_id)
        .await?
        .map(|product| product.metadata_owner())
        .unwrap_or(product_id);

    let file_name = state
        .meta
        .file_name(owner)
        .await?
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            tracing::warn!(product_id, "Download requested for product without archive name");
            AppError::NotFound("Plugin file not found!".into())
        })?;

    let url = archive_url(&state.config.file_host, &file_name, &version)?;

    let status = state.files.probe(&url).await?;
    if status != StatusCode::OK.as_u16() {
        tracing::warn!(product_id, %url, status, "Archive not available on file host");
        return Err(AppError::Upstream("File not available!".into()));
    }

    let remote = state.files.fetch(&url).await?;
    tracing::info!(product_id, version = %version, %url, "Relaying release archive");

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.zip\"", sanitize_file_name(&file_name)),
        );
    if let Some(len) = remote.content_length {
        builder = builder.header(header::CONTENT_LENGTH, len);
    }

    builder
        .body(Body::from_stream(remote.body))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build download response: {}", e)))
}
