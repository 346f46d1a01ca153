//! The log-in page and the handler that starts a session from it.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        REMEMBERED_SESSION_LENGTH, User, get_user_by_email, normalize_redirect_url, start_session,
    },
    endpoints,
    html::{AuthField, auth_card, auth_field, auth_footer_link, base, submit_button},
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

/// The database and session settings shared by the log-in and registration handlers.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub cookie_key: Key,
    /// The length of a session started without "remember me".
    pub session_length: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_length: state.session_length,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<AccountState> for Key {
    fn from_ref(state: &AccountState) -> Self {
        state.cookie_key.clone()
    }
}

fn log_in_form(email: &str, error: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (auth_field(AuthField {
                label: "Email",
                name: "email",
                type_: "email",
                value: email,
                placeholder: Some("name@example.com"),
                ..Default::default()
            }))
            (auth_field(AuthField {
                label: "Password",
                name: "password",
                type_: "password",
                placeholder: Some("••••••••"),
                error,
                ..Default::default()
            }))

            label class="flex items-center gap-x-3 text-sm font-medium" {
                input type="checkbox" name="remember_me" class="rounded-xs";
                "Keep me logged in for one week"
            }

            (submit_button("Log in"))
            (auth_footer_link("Forgot your password?", endpoints::FORGOT_PASSWORD_VIEW, "Reset it here"))
            (auth_footer_link("Don't have an account?", endpoints::REGISTER_VIEW, "Register here"))
        }
    }
}

/// The page to go to after logging in, if `raw_url` names a safe one.
fn return_page(raw_url: Option<&str>) -> Option<String> {
    let raw_url = raw_url?;
    let page = normalize_redirect_url(raw_url);
    if page.is_none() {
        tracing::warn!("Ignoring redirect URL {raw_url:?}");
    }

    page
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Display the log-in page.
///
/// A safe `redirect_url` in the query is carried through the form as a hidden input.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = return_page(query.redirect_url.as_deref());
    let form = log_in_form("", None, redirect_url.as_deref());

    base("Log In", &[], &auth_card("Log in to your account", &form)).into_response()
}

/// The fields of the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    pub email: String,
    pub password: String,
    /// Present, with any value, when the checkbox is ticked.
    pub remember_me: Option<String>,
    pub redirect_url: Option<String>,
}

/// Find the user with `email` and check their password.
///
/// An unknown email and a wrong password both give [Error::InvalidCredentials].
fn check_credentials(email: &str, password: &str, connection: &Connection) -> Result<User, Error> {
    let user = get_user_by_email(email, connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidCredentials,
        error => error,
    })?;

    if user.password_hash.verify(password)? {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Start a session for the user whose credentials were submitted.
///
/// Success redirects to the page the user was trying to reach, or the
/// wallets page. Failures re-render the form with a message.
pub async fn post_log_in(
    State(state): State<AccountState>,
    jar: PrivateCookieJar,
    Form(data): Form<LogInData>,
) -> Response {
    let redirect_url = return_page(data.redirect_url.as_deref());
    let form_with_error =
        |message: &str| log_in_form(&data.email, Some(message), redirect_url.as_deref());

    let user = match state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| check_credentials(&data.email, &data.password, &connection))
    {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            return form_with_error(INVALID_CREDENTIALS_ERROR_MSG).into_response();
        }
        Err(error) => {
            tracing::error!("Could not check credentials: {error}");
            return form_with_error(INTERNAL_ERROR_MSG).into_response();
        }
    };

    let session_length = match data.remember_me {
        Some(_) => REMEMBERED_SESSION_LENGTH,
        None => state.session_length,
    };

    match start_session(jar, user.id, session_length) {
        Ok(jar) => {
            tracing::info!("User {} logged in", user.id);
            let target = redirect_url.unwrap_or_else(|| endpoints::WALLETS_VIEW.to_owned());

            (StatusCode::SEE_OTHER, HxRedirect(target), jar).into_response()
        }
        Err(error) => {
            tracing::error!("Could not start a session for user {}: {error}", user.id);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                (),
            )
                .into_response()
        }
    }
}
