//! Product advice from a hosted text-generation model.
//!
//! The portal depends on [`AdvisoryService`] rather than a concrete client so
//! tests can swap in a canned advisor. [`GeminiClient`] is the production
//! implementation.

mod client;
mod error;
mod types;

use std::sync::Arc;

use async_trait::async_trait;
use rmp_portal_core::AdvisoryRequest;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::registry::SharedPortal;

pub use client::GeminiClient;
pub use error::{AdvisoryError, ApiError, ApiErrorResponse};
pub use types::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part};

/// Something that turns a prompt into advice text.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    /// Answer `prompt` with a short piece of advice.
    async fn advise(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

/// Run one advisory call in the background and land its outcome on `portal`.
///
/// The request that started the call does not wait for it; the portal lock
/// is only taken once the outcome is known. The handle resolves to whether
/// the outcome became visible.
pub fn spawn_advisory(
    service: Arc<dyn AdvisoryService>,
    portal: SharedPortal,
    request: AdvisoryRequest,
) -> JoinHandle<bool> {
    let span = tracing::info_span!(
        "advisory",
        mount = request.ticket.mount,
        seq = request.ticket.seq
    );

    tokio::spawn(
        async move {
            let outcome = service.advise(&request.prompt).await;
            if let Err(e) = &outcome {
                tracing::warn!(error = %e, "Advisory call failed, showing fallback");
            }

            let shown = portal.lock().await.complete_advisory(request.ticket, outcome);
            if !shown {
                tracing::debug!("Advisory outcome dropped");
            }
            shown
        }
        .instrument(span),
    )
}
