//! The registration page for creating a new user account.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error, PasswordHash, ValidatedPassword,
    auth::{create_user, log_in::AccountState, start_session},
    endpoints,
    error_pages::get_internal_server_error_redirect,
    html::{AuthField, auth_card, auth_field, auth_footer_link, base, submit_button},
};

/// The browser rejects shorter passwords before the strength check runs.
const PASSWORD_MIN_LENGTH: u8 = 14;

/// What the user typed and which fields were rejected.
#[derive(Default)]
struct RegistrationFormView<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    email_error: Option<&'a str>,
    password_error: Option<&'a str>,
    confirm_password_error: Option<&'a str>,
}

fn password_field<'a>(
    label: &'a str,
    name: &'a str,
    value: &'a str,
    error: Option<&'a str>,
) -> Markup {
    auth_field(AuthField {
        label,
        name,
        type_: "password",
        value,
        placeholder: Some("••••••••"),
        min_length: Some(PASSWORD_MIN_LENGTH),
        error,
    })
}

fn registration_form(view: RegistrationFormView<'_>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (auth_field(AuthField {
                label: "Username",
                name: "username",
                type_: "text",
                value: view.username,
                ..Default::default()
            }))
            (auth_field(AuthField {
                label: "Email",
                name: "email",
                type_: "email",
                value: view.email,
                placeholder: Some("name@example.com"),
                error: view.email_error,
                ..Default::default()
            }))
            (password_field("Password", "password", view.password, view.password_error))
            (password_field("Confirm Password", "confirm_password", "", view.confirm_password_error))

            (submit_button("Create Account"))
            (auth_footer_link("Already have an account?", endpoints::LOG_IN_VIEW, "Log in here"))
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = registration_form(RegistrationFormView::default());

    base("Register", &[], &auth_card("Create Account", &form)).into_response()
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Create a user account, log the new user in and send them to the wallets page.
///
/// Validation problems are shown next to the offending field in the returned form.
pub async fn register_user(
    State(state): State<AccountState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let view = RegistrationFormView {
        username: &form.username,
        email: &form.email,
        password: &form.password,
        ..Default::default()
    };

    let password = match ValidatedPassword::new(&form.password, &[&form.username, &form.email])
    {
        Ok(password) => password,
        Err(error) => {
            let message = error.to_string();
            return registration_form(RegistrationFormView {
                password_error: Some(&message),
                ..view
            })
            .into_response();
        }
    };

    if form.password != form.confirm_password {
        return registration_form(RegistrationFormView {
            confirm_password_error: Some("Passwords do not match"),
            ..view
        })
        .into_response();
    }

    let user = match PasswordHash::new(&password, PasswordHash::DEFAULT_COST).and_then(|hash| {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        create_user(&form.username, &form.email, hash, &connection)
    }) {
        Ok(user) => user,
        Err(error @ (Error::InvalidEmail(_) | Error::DuplicateEmail)) => {
            let message = error.to_string();
            return registration_form(RegistrationFormView {
                email_error: Some(&message),
                ..view
            })
            .into_response();
        }
        Err(error) => {
            tracing::error!("Could not register a new user: {error}");
            return get_internal_server_error_redirect();
        }
    };

    tracing::info!("Registered user {}", user.id);

    match start_session(jar, user.id, state.session_length) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::WALLETS_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not start a session for user {}: {error}", user.id);
            get_internal_server_error_redirect()
        }
    }
}


#[cfg(test)]
mod register_user_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        PasswordHash,
        app_state::create_cookie_key,
        auth::{
            SESSION_COOKIE, SESSION_LENGTH, create_user, create_user_table, log_in::AccountState,
        },
        endpoints,
    };

    use super::{RegisterForm, register_user};

    const STRONG_PASSWORD: &str = "iamtestingwhethericancreateanewuser";

    fn get_test_state() -> AccountState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        AccountState {
            cookie_key: create_cookie_key("42"),
            session_length: SESSION_LENGTH,
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_test_server(state: AccountState) -> TestServer {
        let app = Router::new()
            .route(endpoints::USERS, post(register_user))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn register_form(email: &str, password: &str, confirm_password: &str) -> RegisterForm {
        RegisterForm {
            username: "alice".to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            confirm_password: confirm_password.to_owned(),
        }
    }

    fn error_paragraphs(text: &str) -> Vec<String> {
        let fragment = scraper::Html::parse_fragment(text);
        let p_selector = scraper::Selector::parse("p.text-red-500").unwrap();

        fragment
            .select(&p_selector)
            .map(|paragraph| paragraph.text().collect::<String>().to_lowercase())
            .collect()
    }

    #[tokio::test]
    async fn create_user_succeeds_and_logs_in() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::USERS)
            .form(&register_form(
                "alice@example.com",
                STRONG_PASSWORD,
                STRONG_PASSWORD,
            ))
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("hx-redirect"), endpoints::WALLETS_VIEW);
        response.cookie(SESSION_COOKIE);
    }

    #[tokio::test]
    async fn create_user_fails_with_duplicate_email() {
        let state = get_test_state();
        create_user(
            "bob",
            "alice@example.com",
            PasswordHash::new_unchecked("hash"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        let server = get_test_server(state);

        let text = server
            .post(endpoints::USERS)
            .form(&register_form(
                "Alice@Example.com",
                STRONG_PASSWORD,
                STRONG_PASSWORD,
            ))
            .await
            .text();

        let errors = error_paragraphs(&text);
        assert_eq!(errors.len(), 1, "want 1 error, got {errors:?}");
        assert!(errors[0].contains("already in use"), "got {:?}", errors[0]);
    }

    #[tokio::test]
    async fn create_user_fails_with_invalid_email() {
        let server = get_test_server(get_test_state());

        let text = server
            .post(endpoints::USERS)
            .form(&register_form("alice", STRONG_PASSWORD, STRONG_PASSWORD))
            .await
            .text();

        let errors = error_paragraphs(&text);
        assert_eq!(errors.len(), 1, "want 1 error, got {errors:?}");
        assert!(errors[0].contains("not a valid email"), "got {:?}", errors[0]);
    }

    #[tokio::test]
    async fn create_user_fails_when_password_is_weak() {
        let server = get_test_server(get_test_state());

        let text = server
            .post(endpoints::USERS)
            .form(&register_form("alice@example.com", "foo", "foo"))
            .await
            .text();

        let errors = error_paragraphs(&text);
        assert_eq!(errors.len(), 1, "want 1 error, got {errors:?}");
        assert!(errors[0].contains("password is too weak"), "got {:?}", errors[0]);
    }

    #[tokio::test]
    async fn create_user_fails_when_passwords_do_not_match() {
        let server = get_test_server(get_test_state());

        let text = server
            .post(endpoints::USERS)
            .form(&register_form(
                "alice@example.com",
                STRONG_PASSWORD,
                "thisisadifferentpassword",
            ))
            .await
            .text();

        let errors = error_paragraphs(&text);
        assert_eq!(errors.len(), 1, "want 1 error, got {errors:?}");
        assert!(errors[0].contains("passwords do not match"), "got {:?}", errors[0]);
    }
}
