//! Form action endpoint shared by storefront pages.
//!
//! POST /admin-post with an `action` field naming the operation. Open to
//! anonymous callers; each action does its own checks.

use std::sync::Arc;

use axum::{extract::State, response::Response, routing::post, Form, Router};
use serde::Deserialize;

use crate::api::downloads::{self, DownloadRequest, DOWNLOAD_ACTION};
use crate::views::ErrorPage;
use crate::AppState;
use pvm_common::AppError;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(super::ADMIN_POST_PATH, post(dispatch))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ActionForm {
    #[serde(default)]
    action: String,
    selected_version: Option<String>,
    product_id: Option<String>,
}

async fn dispatch(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ActionForm>,
) -> Result<Response, ErrorPage> {
    match form.action.as_str() {
        DOWNLOAD_ACTION => {
            let request = DownloadRequest {
                selected_version: form.selected_version,
                product_id: form.product_id,
            };
            Ok(downloads::download_product_version(&state, request).await?)
        }
        other => {
            tracing::debug!(action = other, "Unknown form action");
            Err(AppError::BadRequest("Invalid request!".into()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::services::memory::{bearer, test_state, MemoryStore, StubFileHost};
    use crate::services::store::{LicenseInfo, ProductMetaStore, SubscriptionWindow};
    use chrono::{TimeZone, Utc};
    use pvm_common::VersionRecord;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use std::sync::Arc;
    use tower::ServiceExt;

    const ARCHIVE: &[u8] = b"PK\x03\x04 pretend zip body";

    async fn post(store: Arc<MemoryStore>, files: Arc<StubFileHost>, body: &'static str) -> Response {
        crate::app(test_state(store, files))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admin-post")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn streams_archive_as_attachment() {
        let store = Arc::new(MemoryStore::default());
        store.set_file_name(15, "pricing pro").await.unwrap();
        let files = Arc::new(StubFileHost::new(200, ARCHIVE));

        let resp = post(
            store,
            files.clone(),
            "action=download_product_version&selected_version=1.2.0&product_id=15",
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/zip");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"pricing-pro.zip\""
        );
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], ARCHIVE);
        assert_eq!(
            files.probed.lock().unwrap().as_slice(),
            ["https://www.wooxperto.com/our-plugins-zip/pricing%20pro/xyzk-1.2.0.zip"]
        );
    }

    #[tokio::test]
    async fn variation_download_uses_parent_file_name() {
        let store = Arc::new(MemoryStore::default());
        store.add_product(100, "Pricing Pro", None);
        store.add_product(101, "Pricing Pro - 5 sites", Some(100));
        store.set_file_name(100, "pricing").await.unwrap();
        store
            .set_versions(100, &[VersionRecord::new("1.1.0", "2025-01-01")])
            .await
            .unwrap();
        store.add_order(7, 600, &[101]);
        store.add_license(LicenseInfo {
            order_id: 600,
            product_id: Some(101),
            license_key: "KEY-600".into(),
            no_of_active_site: 5,
            expiry_date: "2026-06-01".into(),
            added_sites: 1,
        });
        store.add_subscription(
            600,
            SubscriptionWindow {
                start_date: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
                next_payment_date: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
            },
        );
        let files = Arc::new(StubFileHost::new(200, ARCHIVE));

        let page = crate::app(test_state(store.clone(), files.clone()))
            .oneshot(
                Request::builder()
                    .uri("/my-account/products")
                    .header(header::AUTHORIZATION, bearer("7", "customer"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(page.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("name=\"product_id\" value=\"101\""));
        assert!(html.contains("<option value=\"1.1.0\">"));

        let resp = post(
            store,
            files.clone(),
            "action=download_product_version&selected_version=1.1.0&product_id=101",
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"pricing.zip\""
        );
        assert_eq!(
            files.probed.lock().unwrap().as_slice(),
            ["https://www.wooxperto.com/our-plugins-zip/pricing/xyzk-1.1.0.zip"]
        );
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let store = Arc::new(MemoryStore::default());
        let files = Arc::new(StubFileHost::new(200, ARCHIVE));

        let resp = post(store, files.clone(), "action=download_product_version&product_id=15").await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(files.probed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_name_halts_before_probe() {
        let store = Arc::new(MemoryStore::default());
        let files = Arc::new(StubFileHost::new(200, ARCHIVE));

        let resp = post(
            store,
            files.clone(),
            "action=download_product_version&selected_version=1.0&product_id=99",
        )
        .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("Plugin file not found!"));
        assert!(files.probed.lock().unwrap().is_empty());
        assert!(files.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_probe_relays_nothing() {
        let store = Arc::new(MemoryStore::default());
        store.set_file_name(15, "pricing").await.unwrap();
        let files = Arc::new(StubFileHost::new(404, ARCHIVE));

        let resp = post(
            store,
            files.clone(),
            "action=download_product_version&selected_version=9.9.9&product_id=15",
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(files.probed.lock().unwrap().len(), 1);
        assert!(files.fetched.lock().unwrap().is_empty());
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("File not available!"));
    }

    #[tokio::test]
    async fn unknown_action_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let files = Arc::new(StubFileHost::new(200, ARCHIVE));

        let resp = post(store, files, "action=delete_everything").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
