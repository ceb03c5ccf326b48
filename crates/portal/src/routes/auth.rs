//! Login and logout.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rmp_portal_core::{Credentials, Role};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::CurrentPortal;
use crate::routes::home::LoginTemplate;
use crate::state::AppState;

/// Login form data.
///
/// No `Debug`: the password must never reach a log line.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
}

/// Handle login form submission.
///
/// On failure the login page is rendered again with the message and the
/// entered name and phone; the password field is left empty.
#[instrument(skip(state, current, form), fields(portal_id = %current.id))]
pub async fn login(
    State(state): State<AppState>,
    current: CurrentPortal,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let credentials = Credentials {
        name: &form.name,
        phone: &form.phone,
        password: &form.password,
    };
    let admin_secret = state.config().admin_password.expose_secret();
    let today = chrono::Local::now().date_naive();

    let role = {
        let mut portal = current.portal.lock().await;
        match portal.login(&credentials, admin_secret, today) {
            Ok(session) => session.role(),
            Err(e) => {
                tracing::info!(reason = %e, "Login rejected");
                let page = LoginTemplate {
                    error: Some(e.to_string()),
                    name: form.name,
                    phone: form.phone,
                };
                return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
            }
        }
    };

    // New session id on privilege change
    current.session.cycle_id().await?;

    tracing::info!(role = %role, "Signed in");
    add_breadcrumb("auth", &format!("Signed in as {role}"));
    if role == Role::Admin {
        sentry::configure_scope(|scope| scope.set_tag("role", "admin"));
    }

    Ok(Redirect::to("/").into_response())
}

/// Handle logout.
#[instrument(skip(current), fields(portal_id = %current.id))]
pub async fn logout(current: CurrentPortal) -> Result<Redirect> {
    current.portal.lock().await.logout();
    tracing::info!("Signed out");
    add_breadcrumb("auth", "Signed out");
    Ok(Redirect::to("/"))
}
