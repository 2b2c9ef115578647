//! Embedded admin and storefront assets.
//!
//! URLs carry `?ver=<release>`, so responses may be cached for long.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

const ADMIN_CSS: &str = include_str!("../../assets/admin.css");
const ADMIN_JS: &str = include_str!("../../assets/admin.js");
const FRONTEND_CSS: &str = include_str!("../../assets/frontend.css");

pub fn router() -> Router {
    Router::new().route("/{file}", get(serve_asset))
}

async fn serve_asset(Path(file): Path<String>) -> Response {
    let (content_type, body) = match file.as_str() {
        "admin.css" => ("text/css; charset=utf-8", ADMIN_CSS),
        "admin.js" => ("text/javascript; charset=utf-8", ADMIN_JS),
        "frontend.css" => ("text/css; charset=utf-8", FRONTEND_CSS),
        _ => return (StatusCode::NOT_FOUND, "Not found").into_response(),
    };

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=31536000"),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn serves_known_assets_only() {
        let resp = router()
            .oneshot(Request::builder().uri("/admin.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "text/javascript; charset=utf-8"
        );

        let resp = router()
            .oneshot(Request::builder().uri("/../Cargo.toml").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
