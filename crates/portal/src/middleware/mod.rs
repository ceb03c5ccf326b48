//! HTTP middleware stack for the portal.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, error capture)
//! 2. `TraceLayer` (request span with `request_id` and `portal_id` fields)
//! 3. Request ID
//! 4. Security headers
//! 5. Session layer (tower-sessions, in-memory store)

pub mod portal;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use portal::CurrentPortal;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
