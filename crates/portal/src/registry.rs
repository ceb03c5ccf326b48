//! Per-browser portal instances.
//!
//! Each browser session carries a [`PortalId`] in its cookie session; the
//! registry maps that id to the browser's [`Portal`]. Portals idle longer
//! than the session idle timeout are evicted along with their state.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rmp_portal_core::Portal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Upper bound on concurrently tracked portals.
const MAX_PORTALS: u64 = 10_000;

/// Identifier of one browser's portal instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortalId(Uuid);

impl PortalId {
    /// A fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PortalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A portal shared between the requests of one browser.
pub type SharedPortal = Arc<Mutex<Portal>>;

/// In-memory map from [`PortalId`] to portal state.
#[derive(Clone)]
pub struct PortalRegistry {
    portals: Cache<PortalId, SharedPortal>,
}

impl PortalRegistry {
    /// Create a registry whose entries expire after `idle` without access.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        let portals = Cache::builder()
            .max_capacity(MAX_PORTALS)
            .time_to_idle(idle)
            .build();
        Self { portals }
    }

    /// The portal for `id`, creating a fresh guest portal on first use.
    pub async fn get_or_create(&self, id: PortalId) -> SharedPortal {
        self.portals
            .get_with(id, async {
                tracing::debug!(portal_id = %id, "Creating portal");
                Arc::new(Mutex::new(Portal::new()))
            })
            .await
    }

    /// Number of live portals. Approximate until pending maintenance runs.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.portals.entry_count()
    }

    /// Whether no portals are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
