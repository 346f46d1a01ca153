//! The state shared by every handler, and the slices of it handlers extract.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, auth::SESSION_LENGTH, db::initialize, timezone::get_local_offset};

/// Everything the router hands to its handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Encrypts the session cookie.
    pub cookie_key: Key,
    /// How long a session lasts without activity.
    pub session_length: Duration,
    /// A canonical timezone name such as "Pacific/Auckland", used for "today".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Initialise the database behind `db_connection` and build the state around it.
    ///
    /// # Errors
    ///
    /// - [Error::InvalidTimezone] if `local_timezone` is not a canonical timezone name.
    /// - Any error from creating the tables or seeding the system categories.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        get_local_offset(local_timezone)
            .ok_or_else(|| Error::InvalidTimezone(local_timezone.to_owned()))?;
        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            session_length: SESSION_LENGTH,
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// For handlers that only touch the database.
#[derive(Debug, Clone)]
pub struct DbState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DbState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// For handlers that also need today's date in the server's timezone.
#[derive(Debug, Clone)]
pub struct DbTimezoneState {
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DbTimezoneState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Derive the cookie key from the SHA-512 digest of `secret`.
pub fn create_cookie_key(secret: &str) -> Key {
    Key::from(&Sha512::digest(secret))
}
