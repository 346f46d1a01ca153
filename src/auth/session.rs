//! The session cookie that keeps a user logged in.
//!
//! A [Session] is stored as JSON in a private cookie, so the browser can
//! neither read nor forge it. Every authenticated request pushes the expiry
//! out again, so an idle session ends after [SESSION_LENGTH].

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserID};

/// Name of the cookie holding the session.
pub(crate) const SESSION_COOKIE: &str = "session";

/// How long a session lasts without activity.
pub const SESSION_LENGTH: Duration = Duration::minutes(5);

/// How long a session lasts when the user asks to be remembered.
pub const REMEMBERED_SESSION_LENGTH: Duration = Duration::days(7);

// Hours are always two digits, otherwise a midnight expiry cannot be parsed back.
time::serde::format_description!(
    expiry_format,
    OffsetDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour sign:mandatory]:[offset_minute]:[offset_second]"
);

/// The logged in user and when their session ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct Session {
    pub user_id: UserID,
    #[serde(with = "expiry_format")]
    pub expires_at: OffsetDateTime,
}

impl Session {
    fn begin(user_id: UserID, now: OffsetDateTime, length: Duration) -> Result<Self, Error> {
        Ok(Self {
            user_id,
            expires_at: expiry_after(now, length)?,
        })
    }

    fn has_ended(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }

    /// Move the expiry to `length` after `now`, keeping a later expiry
    /// such as the one from a remembered log-in.
    pub(crate) fn renewed(self, now: OffsetDateTime, length: Duration) -> Result<Self, Error> {
        let expires_at = expiry_after(now, length)?.max(self.expires_at);

        Ok(Self { expires_at, ..self })
    }

    /// Write the session into `jar`, replacing any earlier one.
    pub(crate) fn store(self, jar: PrivateCookieJar) -> Result<PrivateCookieJar, Error> {
        let json = serde_json::to_string(&self)
            .map_err(|error| Error::SessionEncoding(error.to_string()))?;

        Ok(jar.add(session_cookie(json, self.expires_at)))
    }
}

fn expiry_after(now: OffsetDateTime, length: Duration) -> Result<OffsetDateTime, Error> {
    now.checked_add(length).ok_or(Error::SessionTooLong(length))
}

fn session_cookie(value: String, expires_at: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .expires(expires_at)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

/// Log `user_id` in for `length` from now.
///
/// # Errors
///
/// Returns [Error::SessionEncoding] if the session cannot be encoded.
pub fn start_session(
    jar: PrivateCookieJar,
    user_id: UserID,
    length: Duration,
) -> Result<PrivateCookieJar, Error> {
    Session::begin(user_id, OffsetDateTime::now_utc(), length)?.store(jar)
}

/// Overwrite the session cookie with one the browser discards immediately.
pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    let mut cookie = session_cookie("deleted".to_owned(), OffsetDateTime::UNIX_EPOCH);
    cookie.set_max_age(Duration::ZERO);

    jar.add(cookie)
}

/// The session in `jar` if it is still running at `now`.
///
/// # Errors
///
/// - [Error::CookieMissing] if there is no session cookie.
/// - [Error::InvalidCredentials] if the cookie does not hold a session or the session has ended.
pub(crate) fn current_session(
    jar: &PrivateCookieJar,
    now: OffsetDateTime,
) -> Result<Session, Error> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(Error::CookieMissing)?;
    let session: Session =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::InvalidCredentials)?;

    if session.has_ended(now) {
        return Err(Error::InvalidCredentials);
    }

    Ok(session)
}
