//! Route layers that only let requests with a running session through.
//!
//! Handlers behind these layers receive the user with
//! `Extension(user_id): Extension<UserID>`.

use axum::{
    extract::{FromRef, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::{Duration, OffsetDateTime};

use crate::{
    AppState,
    auth::{redirect::log_in_url_for, session::current_session},
};

/// The cookie key and session length the guards need.
#[derive(Clone)]
pub struct SessionConfig {
    pub cookie_key: Key,
    /// How far each authenticated request pushes the session expiry out.
    pub session_length: Duration,
}

impl FromRef<AppState> for SessionConfig {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_length: state.session_length,
        }
    }
}

impl FromRef<SessionConfig> for Key {
    fn from_ref(config: &SessionConfig) -> Self {
        config.cookie_key.clone()
    }
}

/// How a request without a session is sent to the log-in page.
#[derive(Debug, Clone, Copy)]
enum LogInRedirect {
    /// A 303 for full page loads.
    SeeOther,
    /// An `HX-Redirect` header, since htmx does not follow 303s for swaps.
    Htmx,
}

impl LogInRedirect {
    fn respond(self, log_in_url: String) -> Response {
        match self {
            Self::SeeOther => Redirect::to(&log_in_url).into_response(),
            Self::Htmx => (StatusCode::OK, HxRedirect(log_in_url), ()).into_response(),
        }
    }
}

async fn guard(
    config: SessionConfig,
    redirect: LogInRedirect,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = PrivateCookieJar::from_headers(request.headers(), config.cookie_key.clone());
    let now = OffsetDateTime::now_utc();

    let session = match current_session(&jar, now) {
        Ok(session) => session,
        Err(error) => {
            tracing::debug!("No session for {}: {error}", request.uri().path());
            return redirect.respond(log_in_url_for(&request));
        }
    };

    request.extensions_mut().insert(session.user_id);
    let response = next.run(request).await;

    match session
        .renewed(now, config.session_length)
        .and_then(|session| session.store(jar))
    {
        Ok(jar) => (jar, response).into_response(),
        Err(error) => {
            tracing::error!(
                "Could not renew the session of user {}: {error}",
                session.user_id
            );
            response
        }
    }
}

/// Guard for pages. Requests without a session are redirected to the log-in page.
pub async fn session_guard(
    State(config): State<SessionConfig>,
    request: Request,
    next: Next,
) -> Response {
    guard(config, LogInRedirect::SeeOther, request, next).await
}

/// Guard for the htmx endpoints under `/api`.
pub async fn session_guard_hx(
    State(config): State<SessionConfig>,
    request: Request,
    next: Next,
) -> Response {
    guard(config, LogInRedirect::Htmx, request, next).await
}
