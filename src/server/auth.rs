//! Bearer token authentication.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sha2::{Digest, Sha256};

use super::AppState;

const NOT_PROVIDED: &str = "Authentication credentials were not provided.";
const INVALID_TOKEN: &str = "Invalid token.";

/// Reject requests without one of the configured bearer tokens.
pub async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let rejection = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
    {
        None => Some(NOT_PROVIDED),
        Some(token) if !is_known_token(&state.api_tokens, token) => Some(INVALID_TOKEN),
        Some(_) => None,
    };

    match rejection {
        Some(detail) => {
            tracing::debug!("Rejected {} request: {}", request.uri().path(), detail);
            unauthorized(detail)
        }
        None => next.run(request).await,
    }
}

/// Check `token` against every configured token without early exit.
fn is_known_token(known: &[String], token: &str) -> bool {
    let candidate = Sha256::digest(token.as_bytes());
    known.iter().fold(false, |found, expected| {
        digests_equal(&candidate, &Sha256::digest(expected.as_bytes())) | found
    })
}

/// Byte-wise comparison of equal-length digests that inspects every byte.
fn digests_equal(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

/// Token part of a `Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn unauthorized(detail: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "detail": detail })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_known_token() {
        let known = vec!["alpha".to_string(), "beta".to_string()];
        assert!(is_known_token(&known, "alpha"));
        assert!(is_known_token(&known, "beta"));
        assert!(!is_known_token(&known, "alph"));
        assert!(!is_known_token(&known, "alphaa"));
        assert!(!is_known_token(&[], "alpha"));
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Token abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
