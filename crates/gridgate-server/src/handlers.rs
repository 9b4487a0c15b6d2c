//! Request handlers for the portal pages.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;
use url::Url;

use crate::auth::{self, CurrentUser};
use crate::error::PortalError;
use crate::pages;
use crate::state::{AppState, FlashKind};
use crate::users::RegisterError;
use gridgate_token::ViewerClaims;

/// Handler for the home page (GET). The widget is not loaded until the
/// user asks for it.
pub async fn home(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Html<String> {
    let flashes = state.take_flashes(&user.session);
    Html(pages::home_page(
        state.project_name(),
        &user.username,
        None,
        &flashes,
    ))
}

/// Handler for loading the widget (POST on the home page).
///
/// Mints a viewer token bound to this user and the request origin, and
/// renders the iframe pointing at the external web app.
pub async fn load_widget(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Result<Html<String>, PortalError> {
    let origin = request_origin(&state, &headers)?;
    let claims = ViewerClaims::new(&user.username, &origin);
    let token = state.signer().viewer_token(&claims);

    let iframe_src = widget_src(&state.config().widget.webapp_url, &token)?;
    tracing::debug!(username = %user.username, %origin, "minted viewer token");

    let flashes = state.take_flashes(&user.session);
    Ok(Html(pages::home_page(
        state.project_name(),
        &user.username,
        Some(&iframe_src),
        &flashes,
    )))
}

/// The origin URL the viewer token is bound to: the configured public
/// URL if set, otherwise derived from the request's Host header.
fn request_origin(state: &AppState, headers: &HeaderMap) -> Result<String, PortalError> {
    if let Some(public_url) = &state.config().server.public_url {
        return Ok(public_url.trim_end_matches('/').to_string());
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| PortalError::InvalidRequest("missing Host header".to_string()))?;
    Ok(format!("http://{host}"))
}

/// Iframe src: the configured web app URL with the viewer token
/// appended, keeping whatever iframe-specific parameters it carries.
fn widget_src(webapp_url: &str, token: &str) -> Result<String, PortalError> {
    let mut url = Url::parse(webapp_url)
        .map_err(|e| PortalError::InvalidRequest(format!("bad widget URL: {e}")))?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url.into())
}

/// Registration page query parameters.
#[derive(Debug, Deserialize)]
pub struct RegisterQuery {
    #[serde(default)]
    pub error: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Handler for the registration page (GET).
pub async fn register_page(
    State(state): State<AppState>,
    Query(query): Query<RegisterQuery>,
) -> Html<String> {
    Html(pages::register_page(
        state.project_name(),
        query.error.as_deref(),
    ))
}

/// Handler for registration form submission (POST).
///
/// Creates the user, then mirrors it to the external system. The sync
/// outcome is advisory only: registration and login proceed either
/// way, and a failure just queues a warning for the home page.
pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    if let Err(code) = validate_registration(&form) {
        return Redirect::to(&format!("/register?error={code}")).into_response();
    }

    match state
        .users()
        .register(&form.username, &form.email, &form.password)
    {
        Ok(_) => {}
        Err(RegisterError::UsernameTaken) => {
            return Redirect::to("/register?error=username_taken").into_response();
        }
        Err(e) => {
            return PortalError::Internal(e.into()).into_response();
        }
    }
    tracing::info!(username = %form.username, "user registered");

    let sync_outcome = match state.sync() {
        Some(sync) => Some(sync.sync_user(&form.username, &form.email).await),
        None => None,
    };

    let (token, response) = auth::login_redirect(&state, &form.username, "/");
    state.push_flash(&token, FlashKind::Success, "Registration successful!");
    if let Some(outcome) = sync_outcome {
        if !outcome.is_synced() {
            state.push_flash(
                &token,
                FlashKind::Warning,
                "Registered, but syncing your account to the external sheet failed. \
                 Please contact an administrator.",
            );
        }
    }

    response
}

/// Form-level validation, returning an error code for the redirect.
fn validate_registration(form: &RegisterForm) -> Result<(), &'static str> {
    if form.username.is_empty() || form.username.contains(|c: char| c.is_whitespace()) {
        return Err("bad_username");
    }
    // '|' is the token payload delimiter; a username containing it
    // would make admin-token field boundaries ambiguous to the
    // external verifier.
    if form.username.contains('|') {
        return Err("bad_username");
    }
    if !form.email.contains('@') {
        return Err("bad_email");
    }
    if form.password.len() < 8 {
        return Err("weak_password");
    }
    if form.password != form.password_confirm {
        return Err("password_mismatch");
    }
    Ok(())
}
