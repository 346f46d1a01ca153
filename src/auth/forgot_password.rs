//! Explains how a forgotten password gets reset.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{LINK_STYLE, auth_card, base},
};

/// Passwords are reset from the command line by whoever runs the server.
pub async fn get_forgot_password_page() -> Response {
    let body = html! {
        p {
            "Ask whoever runs the server to reset it. From the directory the server runs in, they run "
            code { "reset_password" }
            " with the database file and your email:"
        }
        pre class="p-2 text-sm bg-gray-100 dark:bg-gray-700 rounded overflow-x-auto" {
            "reset_password --db-path pocketbook.db --email name@example.com"
        }
        p {
            "Then "
            a href=(endpoints::LOG_IN_VIEW) class=(LINK_STYLE) { "log in" }
            " with the new password."
        }
    };

    base("Forgot Password", &[], &auth_card("Forgot your password?", &body)).into_response()
}
