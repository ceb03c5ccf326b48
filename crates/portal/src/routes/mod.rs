//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - View router: login, admin dashboard, or customer dashboard
//! GET  /health                  - Health check
//!
//! # Auth
//! POST /auth/login              - Classify credentials, re-render login on failure (422)
//! POST /auth/logout             - Back to guest; inventory is kept
//!
//! # Inventory
//! GET  /inventory               - Inventory board fragment (signed in)
//! POST /admin/inventory/toggle  - Flip one grade/color flag (admin)
//!
//! # Orders (customer)
//! GET  /order                   - Order panel fragment
//! POST /order/draft             - Apply draft field edits, returns order panel fragment
//! POST /order/send              - 303 to the messaging deep link, 409 when out of stock
//! POST /order/advice            - Start an advisory call, returns the advice modal fragment
//! GET  /order/advice            - Advice modal fragment (polled while loading)
//! POST /order/advice/dismiss    - Close the advice modal
//! ```
//!
//! Mutating routes answer HTMX requests with a fragment and plain form posts
//! with a redirect to `/`.

pub mod advice;
pub mod auth;
pub mod home;
pub mod inventory;
pub mod order;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::state::AppState;

/// Header htmx sets on every request it issues.
pub const HX_REQUEST_HEADER: &str = "hx-request";

/// Whether the request was issued by htmx.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST_HEADER)
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/inventory/toggle", post(inventory::toggle))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(order::panel))
        .route("/draft", post(order::edit))
        .route("/send", post(order::send))
        .route("/advice", get(advice::show).post(advice::ask))
        .route("/advice/dismiss", post(advice::dismiss))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/inventory", get(inventory::board))
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
        .nest("/order", order_routes())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert(HX_REQUEST_HEADER, HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
        headers.insert(HX_REQUEST_HEADER, HeaderValue::from_static("false"));
        assert!(!is_htmx(&headers));
    }
}
