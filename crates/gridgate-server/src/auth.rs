//! Session authentication for the portal.
//!
//! Form-based login with a server-side session keyed by a random
//! cookie token. Every page except login and registration requires a
//! session; unauthenticated requests are redirected to the login page
//! with the original path preserved.

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::pages;
use crate::state::{AppState, FlashKind};

/// Session cookie name.
const SESSION_COOKIE_NAME: &str = "gridgate_session";

/// The authenticated user for the current request, inserted into
/// request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    /// Session cookie token, used to address flash messages.
    pub session: String,
}

/// Middleware gating the portal behind a session.
///
/// Signed-in users hitting `/login` or `/register` are bounced home,
/// mirroring how the original flow treats already-authenticated
/// visitors.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let open = path == "/login" || path == "/register";

    if let Some(token) = session_token(request.headers()) {
        if let Some(username) = state.session_username(&token) {
            if open {
                return Redirect::to("/").into_response();
            }
            request
                .extensions_mut()
                .insert(CurrentUser {
                    username,
                    session: token,
                });
            return next.run(request).await;
        }
    }

    if open {
        return next.run(request).await;
    }

    let redirect_to = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Redirect::to(&format!(
        "/login?redirect={}",
        urlencoding::encode(redirect_to)
    ))
    .into_response()
}

/// Extract the session token from the cookie header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookies.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{SESSION_COOKIE_NAME}=")) {
            return Some(value.to_string());
        }
    }
    None
}

/// Set-Cookie value establishing a session.
fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// Set-Cookie value clearing the session.
fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Start a session and redirect, in one response.
pub fn login_redirect(state: &AppState, username: &str, to: &str) -> (String, Response) {
    let token = state.create_session(username);
    let response = (
        [(header::SET_COOKIE, session_cookie(&token))],
        Redirect::to(to),
    )
        .into_response();
    (token, response)
}

/// Login page query parameters.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Handler for the login page (GET).
pub async fn login_page(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Html<String> {
    Html(pages::login_page(
        state.project_name(),
        query.redirect.as_deref(),
        query.error.as_deref(),
        query.notice.as_deref(),
    ))
}

/// Handler for login form submission (POST).
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Response {
    if state.users().verify(&form.username, &form.password) {
        let redirect_url = form
            .redirect
            .filter(|r| !r.is_empty() && r.starts_with('/'))
            .unwrap_or_else(|| "/".to_string());

        let (token, response) = login_redirect(&state, &form.username, &redirect_url);
        state.push_flash(
            &token,
            FlashKind::Success,
            format!("Welcome back, {}!", form.username),
        );
        tracing::info!(username = %form.username, "user logged in");
        response
    } else {
        tracing::debug!(username = %form.username, "login rejected");
        let redirect = form
            .redirect
            .map(|r| format!("&redirect={}", urlencoding::encode(&r)))
            .unwrap_or_default();
        Redirect::to(&format!("/login?error=invalid{redirect}")).into_response()
    }
}

/// Handler for logout (POST).
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.remove_session(&token);
    }

    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to("/login?notice=logged_out"),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_session_token_extracted() {
        let headers = headers_with_cookie("other=1; gridgate_session=abc123; theme=dark");
        assert_eq!(session_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn test_session_token_absent() {
        assert!(session_token(&HeaderMap::new()).is_none());
        let headers = headers_with_cookie("other=1");
        assert!(session_token(&headers).is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
