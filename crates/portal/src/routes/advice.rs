//! Product advice modal.
//!
//! Asking for advice starts the call in the background and answers at once
//! with the modal in its loading state; the modal polls until the outcome
//! lands.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use rmp_portal_core::{AdvisoryPanel, Portal};
use tracing::instrument;

use crate::advisory::spawn_advisory;
use crate::error::Result;
use crate::middleware::CurrentPortal;
use crate::routes::is_htmx;
use crate::routes::order::{DraftForm, apply_form, customer_view};
use crate::state::AppState;

/// Advice modal display data.
#[derive(Clone, Default)]
pub struct AdvisoryView {
    pub open: bool,
    pub loading: bool,
    pub response: Option<String>,
}

impl From<&AdvisoryPanel> for AdvisoryView {
    fn from(panel: &AdvisoryPanel) -> Self {
        Self {
            open: panel.is_open(),
            loading: panel.is_loading(),
            response: panel.response().map(str::to_string),
        }
    }
}

/// Advice modal fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/advice_modal.html")]
pub struct AdviceModalTemplate {
    pub advice: AdvisoryView,
}

impl AdviceModalTemplate {
    fn from_portal(portal: &Portal) -> Result<Self> {
        let view = customer_view(portal)?;
        Ok(Self {
            advice: AdvisoryView::from(view.advisory()),
        })
    }
}

/// Ask for advice on the current selection.
///
/// Submitted draft fields are applied first so the prompt matches what the
/// customer sees. While a call is outstanding a repeat request only returns
/// the current modal.
#[instrument(skip(state, current, headers, form), fields(portal_id = %current.id))]
pub async fn ask(
    State(state): State<AppState>,
    current: CurrentPortal,
    headers: HeaderMap,
    Form(form): Form<DraftForm>,
) -> Result<Response> {
    let mut portal = current.portal.lock().await;
    apply_form(&mut portal, form)?;

    match portal.begin_advisory(Utc::now(), state.advisory_stale_after())? {
        Some(request) => {
            tracing::info!(
                mount = request.ticket.mount,
                seq = request.ticket.seq,
                "Advisory call started"
            );
            drop(spawn_advisory(
                state.advisory(),
                current.portal.clone(),
                request,
            ));
        }
        None => tracing::debug!("Advisory call already outstanding"),
    }

    if is_htmx(&headers) {
        Ok(AdviceModalTemplate::from_portal(&portal)?.into_response())
    } else {
        Ok(Redirect::to("/").into_response())
    }
}

/// Render the advice modal (HTMX fragment).
#[instrument(skip(current), fields(portal_id = %current.id))]
pub async fn show(current: CurrentPortal) -> Result<AdviceModalTemplate> {
    let portal = current.portal.lock().await;
    AdviceModalTemplate::from_portal(&portal)
}

/// Close the advice modal. An outstanding call keeps running; its outcome is
/// dropped when it arrives.
#[instrument(skip(current, headers), fields(portal_id = %current.id))]
pub async fn dismiss(current: CurrentPortal, headers: HeaderMap) -> Result<Response> {
    let mut portal = current.portal.lock().await;
    portal.dismiss_advisory()?;

    if is_htmx(&headers) {
        Ok(AdviceModalTemplate::from_portal(&portal)?.into_response())
    } else {
        Ok(Redirect::to("/").into_response())
    }
}
