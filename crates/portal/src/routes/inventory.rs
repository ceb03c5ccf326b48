//! Inventory board and admin stock toggles.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use rmp_portal_core::{Color, Grade, Inventory, PortalError};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CurrentPortal;
use crate::routes::is_htmx;

/// One color cell of the board.
#[derive(Clone)]
pub struct StockCell {
    pub color: &'static str,
    pub available: bool,
}

/// One grade row of the board.
#[derive(Clone)]
pub struct BoardRow {
    pub grade: String,
    pub cells: Vec<StockCell>,
}

/// Inventory board display data.
#[derive(Clone)]
pub struct BoardView {
    pub rows: Vec<BoardRow>,
}

impl From<&Inventory> for BoardView {
    fn from(inventory: &Inventory) -> Self {
        let rows = inventory
            .iter()
            .map(|(grade, stock)| BoardRow {
                grade: grade.to_string(),
                cells: Color::ALL
                    .into_iter()
                    .map(|color| StockCell {
                        color: color.label(),
                        available: stock.is_available(color),
                    })
                    .collect(),
            })
            .collect();
        Self { rows }
    }
}

/// Toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub grade: String,
    pub color: String,
}

/// Inventory board fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/inventory_board.html")]
pub struct InventoryBoardTemplate {
    pub board: BoardView,
}

/// Admin section fragment: board plus the toggle panel.
#[derive(Template, WebTemplate)]
#[template(path = "partials/admin_section.html")]
pub struct AdminSectionTemplate {
    pub board: BoardView,
}

/// Render the inventory board (HTMX fragment).
#[instrument(skip(current), fields(portal_id = %current.id))]
pub async fn board(current: CurrentPortal) -> Result<InventoryBoardTemplate> {
    let portal = current.portal.lock().await;
    if !portal.session().is_authenticated() {
        return Err(PortalError::NotSignedIn.into());
    }
    Ok(InventoryBoardTemplate {
        board: BoardView::from(portal.inventory()),
    })
}

/// Flip one availability flag.
#[instrument(skip(current, headers), fields(portal_id = %current.id))]
pub async fn toggle(
    current: CurrentPortal,
    headers: HeaderMap,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    let color: Color = form
        .color
        .parse()
        .map_err(|e: rmp_portal_core::ColorError| AppError::BadRequest(e.to_string()))?;
    let grade = Grade::new(form.grade);

    let mut portal = current.portal.lock().await;
    let available = portal.toggle_stock(&grade, color)?;

    tracing::info!(grade = %grade, color = %color, available, "Stock toggled");
    add_breadcrumb("inventory", &format!("{grade} / {color} -> {available}"));

    if is_htmx(&headers) {
        Ok(AdminSectionTemplate {
            board: BoardView::from(portal.inventory()),
        }
        .into_response())
    } else {
        Ok(Redirect::to("/").into_response())
    }
}
