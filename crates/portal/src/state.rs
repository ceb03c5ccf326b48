//! Application state shared across handlers.

use std::sync::Arc;

use chrono::TimeDelta;

use crate::advisory::{AdvisoryError, AdvisoryService, GeminiClient};
use crate::config::PortalConfig;
use crate::registry::PortalRegistry;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    registry: PortalRegistry,
    advisory: Arc<dyn AdvisoryService>,
}

impl AppState {
    /// Create application state backed by the Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: PortalConfig) -> Result<Self, AdvisoryError> {
        let advisory = GeminiClient::new(&config.gemini)?;
        Ok(Self::with_advisory(config, Arc::new(advisory)))
    }

    /// Create application state with a specific advisory service.
    #[must_use]
    pub fn with_advisory(config: PortalConfig, advisory: Arc<dyn AdvisoryService>) -> Self {
        let registry = PortalRegistry::new(config.session_idle);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                advisory,
            }),
        }
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get a reference to the per-browser portal registry.
    #[must_use]
    pub fn registry(&self) -> &PortalRegistry {
        &self.inner.registry
    }

    /// Get a handle to the advisory service.
    #[must_use]
    pub fn advisory(&self) -> Arc<dyn AdvisoryService> {
        Arc::clone(&self.inner.advisory)
    }

    /// How long an outstanding advisory request blocks a new one.
    ///
    /// Slightly longer than the client timeout, so a request is only
    /// superseded once it can no longer complete on its own.
    #[must_use]
    pub fn advisory_stale_after(&self) -> TimeDelta {
        TimeDelta::from_std(self.inner.config.gemini.timeout)
            .unwrap_or(TimeDelta::MAX)
            .checked_add(&TimeDelta::seconds(5))
            .unwrap_or(TimeDelta::MAX)
    }
}
