//! Request middleware: CORS and caller identity.
//!
//! Authentication happens upstream; the gateway forwards the caller as
//! `x-user-id` and, for administrators, `x-user-role: admin`.
use axum::{extract::FromRequestParts, http::request::Parts};
use sora_store::{Principal, Role};
use tower_http::cors::CorsLayer;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

pub fn cors() -> CorsLayer {
    CorsLayer::permissive()
}

/// Calling principal taken from the identity headers
#[derive(Debug, Clone)]
pub struct Caller(pub Principal);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::Unauthenticated)?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(parse_role)
            .unwrap_or_default();

        Ok(Caller(Principal {
            user_id: user_id.to_string(),
            role,
        }))
    }
}

fn parse_role(value: &str) -> Role {
    match value.trim().to_ascii_lowercase().as_str() {
        "admin" | "super_agent" => Role::Admin,
        _ => Role::User,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("admin"), Role::Admin);
        assert_eq!(parse_role(" Super_Agent "), Role::Admin);
        assert_eq!(parse_role("user"), Role::User);
        assert_eq!(parse_role("root"), Role::User);
    }
}
