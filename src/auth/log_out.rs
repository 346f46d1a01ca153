//! Ends the session and returns to the log-in page.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::end_session, endpoints};

/// Log the user out.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    (end_session(jar), Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
