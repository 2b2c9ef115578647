//! Session authentication — Axum `FromRequestParts` extractor.
//!
//! Sessions are issued by the storefront as HS256 JWTs and arrive in the
//! `Authorization: Bearer <token>` header. Handlers that need a logged-in
//! customer take `AuthUser` as an argument.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::services::store::CustomerId;
use crate::AppState;
use pvm_common::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Storefront customer id.
    pub sub: String,
    #[serde(default)]
    pub email: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Authenticated user extractor.
pub struct AuthUser {
    pub claims: Claims,
    customer_id: CustomerId,
}

impl AuthUser {
    /// Customer id from the JWT `sub` claim.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Fails unless the session belongs to a shop administrator.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.claims.role == "admin" {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".into()))
        }
    }
}

impl FromRequestParts<std::sync::Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &std::sync::Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".into()))?;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.auth.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        let claims = token_data.claims;
        let customer_id = claims.sub.parse::<CustomerId>().map_err(|_| {
            tracing::debug!(sub = %claims.sub, "JWT subject is not a customer id");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        Ok(AuthUser {
            claims,
            customer_id,
        })
    }
}
