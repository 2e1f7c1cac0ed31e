//! Session cookie handling, development sign-in, sign-out.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::routes::dashboards::DASHBOARD_ROUTE;
use crate::services::workflow::SignedIn;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "admin_session";

pub(crate) fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Signed-in session extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthSession(pub SignedIn);

impl<S> axum::extract::FromRequestParts<S> for AuthSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let access_token = app_state
            .sessions
            .access_token(token)
            .await
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self(SignedIn { session: token.to_owned(), access_token }))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /dev/session`: open a session with the configured development token.
///
/// Enabled only when `DEV_AUTH_BYPASS=true`.
pub async fn dev_sign_in(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(dev_auth) = &state.dev_auth else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let token = state
        .sessions
        .create(dev_auth.access_token.clone())
        .await;
    tracing::info!("development session opened");

    let jar = jar.add(session_cookie(token, state.cookie_secure));
    (jar, Redirect::to(DASHBOARD_ROUTE)).into_response()
}

/// `POST /sign-out`: drop the session and clear the cookie.
pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(COOKIE_NAME) {
        state.sessions.destroy(cookie.value()).await;
    }
    let jar = jar.add(expired_session_cookie(state.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
