//! Correlation ids for log lines and Sentry events.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request id in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id accepted verbatim.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// Tag every request with an id.
///
/// An id supplied by a proxy is reused when it is short printable ASCII;
/// otherwise a UUID v4 is minted. The id is recorded on the request span,
/// set as a Sentry tag, and echoed back in the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn upstream_id(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
    let usable = !raw.is_empty()
        && raw.len() <= MAX_UPSTREAM_ID_LEN
        && raw.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(id).unwrap_or(HeaderValue::from_static("")));
        headers
    }

    #[test]
    fn test_upstream_id_is_reused() {
        assert_eq!(
            upstream_id(&headers_with("cf-8a1b2c")).as_deref(),
            Some("cf-8a1b2c")
        );
    }

    #[test]
    fn test_unusable_upstream_id_is_ignored() {
        assert_eq!(upstream_id(&HeaderMap::new()), None);
        assert_eq!(upstream_id(&headers_with("")), None);
        assert_eq!(upstream_id(&headers_with("has space")), None);
        assert_eq!(upstream_id(&headers_with(&"a".repeat(200))), None);
    }
}
