//! Request correlation.
//!
//! # Responsibilities
//! - Name the request ID header
//! - Read the request ID back out of a request
//! - Build the per-request tracing span
//!
//! # Design Decisions
//! - IDs are UUID v4, generated by `SetRequestIdLayer` as early as possible
//! - A client-supplied `x-request-id` is kept and echoed back

use axum::body::Body;
use axum::http::{HeaderName, Request};
use tracing::Span;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header name form of `X_REQUEST_ID`.
pub fn request_id_header() -> HeaderName {
    HeaderName::from_static(X_REQUEST_ID)
}

/// Access to the request ID set by the request-id layer.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> Option<&str> {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|value| value.to_str().ok())
    }
}

/// Span for one HTTP request, tagged with its request ID.
pub fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request.request_id().unwrap_or("unknown"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_lookup() {
        let request = Request::builder()
            .uri("/admin/users")
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request.request_id(), Some("abc-123"));

        let bare = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(bare.request_id(), None);
    }
}
