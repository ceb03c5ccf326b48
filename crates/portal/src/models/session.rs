//! Session-related types.
//!
//! The cookie session holds only the browser's portal id; everything else
//! lives in the [`PortalRegistry`](crate::registry::PortalRegistry).

/// Session keys.
pub mod keys {
    /// Key for the browser's [`PortalId`](crate::registry::PortalId).
    pub const PORTAL_ID: &str = "portal_id";
}
