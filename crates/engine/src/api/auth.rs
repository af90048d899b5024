//! API key authorization for ingestion routes
//!
//! Clients send the shared key as HTTP Basic credentials:
//! `Authorization: Basic <base64(api key)>`. Requests without the header, with
//! an undecodable value, or with a different key are rejected with 401.
//!
//! # Usage
//!
//! ```rust,ignore
//! use axum::{middleware, Router};
//!
//! let app = Router::new()
//!     .route("/v1/retrieval-events", post(handler))
//!     .route_layer(middleware::from_fn_with_state(api_key, require_api_key));
//! ```

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// The configured shared API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Arc::from(key.into()))
    }

    /// Compare a provided key with the configured one.
    pub fn matches(&self, provided: &str) -> bool {
        let expected = self.0.as_bytes();
        let provided = provided.as_bytes();
        // Length leaks, content does not.
        expected.len() == provided.len()
            && expected
                .iter()
                .zip(provided)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Extract the key carried by a `Basic` authorization header value.
fn decode_basic_credentials(header: &str) -> Option<String> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    String::from_utf8(decoded).ok()
}

/// Middleware that rejects requests not carrying the configured API key.
pub async fn require_api_key(
    State(api_key): State<ApiKey>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(decode_basic_credentials);

    match provided {
        Some(key) if api_key.matches(&key) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!(path = %request.uri().path(), "Rejected request with invalid API key");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "Rejected request without API key");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
