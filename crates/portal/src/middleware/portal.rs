//! Extractor for the browser's portal instance.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;
use crate::registry::{PortalId, SharedPortal};
use crate::state::AppState;

/// The portal belonging to the requesting browser.
///
/// A browser without a portal id gets a fresh guest portal on its first
/// request; the id is stored in its cookie session.
///
/// ```rust,ignore
/// async fn handler(CurrentPortal { portal, .. }: CurrentPortal) -> String {
///     portal.lock().await.session().role().to_string()
/// }
/// ```
pub struct CurrentPortal {
    pub id: PortalId,
    pub portal: SharedPortal,
    pub session: Session,
}

impl FromRequestParts<AppState> for CurrentPortal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let id = match session.get::<PortalId>(session_keys::PORTAL_ID).await? {
            Some(id) => id,
            None => {
                let id = PortalId::new();
                session.insert(session_keys::PORTAL_ID, id).await?;
                id
            }
        };

        tracing::Span::current().record("portal_id", tracing::field::display(id));
        let portal = state.registry().get_or_create(id).await;

        Ok(Self {
            id,
            portal,
            session,
        })
    }
}
