//! View router: picks the page for the portal's current session.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};
use rmp_portal_core::{Portal, Session, ViewKind};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::CurrentPortal;
use crate::routes::advice::AdvisoryView;
use crate::routes::inventory::BoardView;
use crate::routes::order::{DraftView, customer_view};

/// Dashboard header display data.
#[derive(Clone)]
pub struct HeaderView {
    pub role_label: &'static str,
    pub name: String,
}

impl From<&Session> for HeaderView {
    fn from(session: &Session) -> Self {
        Self {
            role_label: session.role().header_label(),
            name: session.name().to_string(),
        }
    }
}

/// Login page.
#[derive(Template, WebTemplate, Default)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub name: String,
    pub phone: String,
}

/// Manufacturer dashboard.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub header: HeaderView,
    pub board: BoardView,
}

/// Customer dashboard.
#[derive(Template, WebTemplate)]
#[template(path = "customer.html")]
pub struct CustomerTemplate {
    pub header: HeaderView,
    pub board: BoardView,
    pub order: DraftView,
    pub advice: AdvisoryView,
}

impl CustomerTemplate {
    /// Build the dashboard for the portal's mounted customer view.
    ///
    /// # Errors
    ///
    /// Returns a role error if no customer is signed in.
    pub fn from_portal(portal: &Portal) -> Result<Self> {
        let view = customer_view(portal)?;
        Ok(Self {
            header: HeaderView::from(portal.session()),
            board: BoardView::from(portal.inventory()),
            order: DraftView::new(portal, view),
            advice: AdvisoryView::from(view.advisory()),
        })
    }
}

/// Render the page for whoever is signed in.
///
/// # Errors
///
/// Only fails if the portal's view and session disagree.
pub fn render_portal(portal: &Portal) -> Result<Response> {
    Ok(match portal.view() {
        ViewKind::Login => LoginTemplate::default().into_response(),
        ViewKind::Admin => AdminTemplate {
            header: HeaderView::from(portal.session()),
            board: BoardView::from(portal.inventory()),
        }
        .into_response(),
        ViewKind::Customer => CustomerTemplate::from_portal(portal)?.into_response(),
    })
}

/// Display the page for the current session.
#[instrument(skip(current), fields(portal_id = %current.id))]
pub async fn index(current: CurrentPortal) -> Result<Response> {
    let portal = current.portal.lock().await;
    render_portal(&portal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use rmp_portal_core::Credentials;

    use super::*;

    fn login(portal: &mut Portal, name: &str, phone: &str, password: &str) {
        let creds = Credentials {
            name,
            phone,
            password,
        };
        portal
            .login(&creds, "RMP123", NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
            .unwrap();
    }

    #[test]
    fn test_login_page_keeps_entered_values() {
        let html = LoginTemplate {
            error: Some("Please enter a valid 10-digit phone number.".to_string()),
            name: "Ravi".to_string(),
            phone: "12345".to_string(),
        }
        .render()
        .unwrap();
        assert!(html.contains("Please enter a valid 10-digit phone number."));
        assert!(html.contains("value=\"Ravi\""));
        assert!(html.contains("value=\"12345\""));
    }

    #[test]
    fn test_admin_dashboard_header() {
        let mut portal = Portal::new();
        login(&mut portal, "", "", "RMP123");
        let html = AdminTemplate {
            header: HeaderView::from(portal.session()),
            board: BoardView::from(portal.inventory()),
        }
        .render()
        .unwrap();
        assert!(html.contains("MANUFACTURER"));
        assert!(html.contains("Manufacturer Control Panel"));
        assert!(html.contains("Auto-Saved"));

        let year = chrono::Datelike::year(&chrono::Local::now());
        assert!(html.contains(&format!("&copy; {year} RMP Paper Products")));
    }

    #[test]
    fn test_customer_dashboard_shows_draft_defaults() {
        let mut portal = Portal::new();
        login(&mut portal, "Ravi Patel", "9876543210", "");
        let html = CustomerTemplate::from_portal(&portal)
            .unwrap()
            .render()
            .unwrap();
        assert!(html.contains("CUSTOMER"));
        assert!(html.contains("Ravi Patel"));
        assert!(html.contains("14 Inch Thali"));
        assert!(html.contains("value=\"2026-10-19\""));
        assert!(!html.contains("This item is currently out of stock."));
    }

    #[test]
    fn test_customer_template_requires_customer() {
        assert!(CustomerTemplate::from_portal(&Portal::new()).is_err());
    }
}
