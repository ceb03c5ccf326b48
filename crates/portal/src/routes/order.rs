//! Customer order drafting and the hand-off to the messaging app.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use rmp_portal_core::{
    Color, ColorError, CustomerView, DraftEdit, Grade, ITEMS, Portal, PortalError, coerce_quantity,
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CurrentPortal;
use crate::routes::home::CustomerTemplate;
use crate::routes::is_htmx;
use crate::state::AppState;

/// A select option.
#[derive(Clone)]
pub struct Choice {
    pub value: String,
    pub selected: bool,
}

/// Order panel display data.
#[derive(Clone)]
pub struct DraftView {
    pub items: Vec<Choice>,
    pub grades: Vec<Choice>,
    pub colors: Vec<Choice>,
    pub grade: String,
    pub color: &'static str,
    pub bags: u32,
    pub pieces_per_bag: u32,
    pub deadline: String,
    pub note: String,
    /// Submission gate, re-read from the inventory on every render.
    pub available: bool,
}

impl DraftView {
    /// Build the panel for the mounted customer view of `portal`.
    #[must_use]
    pub fn new(portal: &Portal, view: &CustomerView) -> Self {
        let draft = view.draft();

        let mut items: Vec<Choice> = ITEMS
            .iter()
            .map(|item| Choice {
                value: (*item).to_string(),
                selected: *item == draft.item,
            })
            .collect();
        if !items.iter().any(|c| c.selected) {
            items.push(Choice {
                value: draft.item.clone(),
                selected: true,
            });
        }

        Self {
            items,
            grades: portal
                .inventory()
                .grades()
                .map(|grade| Choice {
                    value: grade.to_string(),
                    selected: *grade == draft.grade,
                })
                .collect(),
            colors: Color::ALL
                .into_iter()
                .map(|color| Choice {
                    value: color.label().to_string(),
                    selected: color == draft.color,
                })
                .collect(),
            grade: draft.grade.to_string(),
            color: draft.color.label(),
            bags: draft.bags,
            pieces_per_bag: draft.pieces_per_bag,
            deadline: draft.deadline.clone(),
            note: draft.note.clone(),
            available: portal.can_submit(),
        }
    }
}

/// Draft form data. Every field is optional; only the fields present are
/// applied, each as its own edit.
#[derive(Debug, Default, Deserialize)]
pub struct DraftForm {
    pub item: Option<String>,
    pub grade: Option<String>,
    pub color: Option<String>,
    pub bags: Option<String>,
    pub pieces_per_bag: Option<String>,
    pub deadline: Option<String>,
    pub note: Option<String>,
}

impl DraftForm {
    /// Convert the submitted fields into draft edits.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown color.
    pub fn into_edits(self) -> Result<Vec<DraftEdit>> {
        let mut edits = Vec::new();
        if let Some(item) = self.item {
            edits.push(DraftEdit::Item(item));
        }
        if let Some(grade) = self.grade {
            edits.push(DraftEdit::Grade(Grade::new(grade)));
        }
        if let Some(color) = self.color {
            let color: Color = color
                .parse()
                .map_err(|e: ColorError| AppError::BadRequest(e.to_string()))?;
            edits.push(DraftEdit::Color(color));
        }
        if let Some(bags) = self.bags {
            edits.push(DraftEdit::Bags(coerce_quantity(&bags)));
        }
        if let Some(pieces) = self.pieces_per_bag {
            edits.push(DraftEdit::PiecesPerBag(coerce_quantity(&pieces)));
        }
        if let Some(deadline) = self.deadline {
            edits.push(DraftEdit::Deadline(deadline));
        }
        if let Some(note) = self.note {
            edits.push(DraftEdit::Note(note));
        }
        Ok(edits)
    }
}

/// Order panel fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_panel.html")]
pub struct OrderPanelTemplate {
    pub order: DraftView,
}

impl OrderPanelTemplate {
    fn from_portal(portal: &Portal) -> Result<Self> {
        let view = customer_view(portal)?;
        Ok(Self {
            order: DraftView::new(portal, view),
        })
    }
}

/// The mounted customer view, or the role error for this portal.
pub(crate) fn customer_view(portal: &Portal) -> Result<&CustomerView> {
    portal.customer().ok_or_else(|| {
        if portal.session().is_authenticated() {
            PortalError::Forbidden {
                required: rmp_portal_core::Role::Customer,
            }
            .into()
        } else {
            PortalError::NotSignedIn.into()
        }
    })
}

/// Apply every edit in `form` to the portal's draft, or none of them.
pub(crate) fn apply_form(portal: &mut Portal, form: DraftForm) -> Result<()> {
    portal.edit_draft_all(form.into_edits()?)?;
    Ok(())
}

/// Render the order panel (HTMX fragment).
#[instrument(skip(current), fields(portal_id = %current.id))]
pub async fn panel(current: CurrentPortal) -> Result<OrderPanelTemplate> {
    let portal = current.portal.lock().await;
    OrderPanelTemplate::from_portal(&portal)
}

/// Apply draft edits.
#[instrument(skip(current, headers, form), fields(portal_id = %current.id))]
pub async fn edit(
    current: CurrentPortal,
    headers: HeaderMap,
    Form(form): Form<DraftForm>,
) -> Result<Response> {
    let mut portal = current.portal.lock().await;
    apply_form(&mut portal, form)?;

    if is_htmx(&headers) {
        Ok(OrderPanelTemplate::from_portal(&portal)?.into_response())
    } else {
        Ok(Redirect::to("/").into_response())
    }
}

/// Send the order: apply the submitted fields, then redirect to the
/// messaging deep link.
///
/// When the chosen grade and color are out of stock the customer dashboard
/// is rendered again with a 409 and no link is produced.
#[instrument(skip(state, current, form), fields(portal_id = %current.id))]
pub async fn send(
    State(state): State<AppState>,
    current: CurrentPortal,
    Form(form): Form<DraftForm>,
) -> Result<Response> {
    let mut portal = current.portal.lock().await;
    apply_form(&mut portal, form)?;

    let today = chrono::Local::now().date_naive();
    match portal.submit_order(&state.config().whatsapp_number, today) {
        Ok(order) => {
            tracing::info!(message_len = order.message.len(), "Order handed off");
            add_breadcrumb("order", "Order handed off to messaging app");
            Ok(Redirect::to(&order.link).into_response())
        }
        Err(PortalError::OutOfStock { grade, color }) => {
            tracing::info!(grade = %grade, color = %color, "Order blocked, out of stock");
            let page = CustomerTemplate::from_portal(&portal)?;
            Ok((StatusCode::CONFLICT, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
