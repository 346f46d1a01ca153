//! Registered users and the `user` table.

use std::fmt;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash, error::is_unique_violation};

/// The database ID of a user.
///
/// Every query is scoped by a user ID, so it gets its own type instead of
/// the plain integer alias the other tables use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserID,
    /// Shown in the app, not unique.
    pub username: String,
    /// Used to log in. Unique across users, ignoring case.
    pub email: String,
    pub password_hash: PasswordHash,
}

const SELECT_USER: &str = "SELECT id, username, email, password FROM user";

/// # Errors
///
/// Returns an error if the table cannot be created.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn user_from_row(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: UserID(row.get("id")?),
        username: row.get("username")?,
        email: row.get("email")?,
        password_hash: PasswordHash::new_unchecked(&row.get::<_, String>("password")?),
    })
}

/// Register a user. Surrounding whitespace is trimmed from `username` and
/// `email`.
///
/// # Errors
///
/// - [Error::InvalidEmail] if `email` has no '@'.
/// - [Error::DuplicateEmail] if `email` is taken.
pub fn create_user(
    username: &str,
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let (username, email) = (username.trim(), email.trim());

    if !email.contains('@') {
        return Err(Error::InvalidEmail(email.to_owned()));
    }

    let inserted = connection.execute(
        "INSERT INTO user (username, email, password) VALUES (?1, ?2, ?3)",
        (username, email, password_hash.as_ref()),
    );

    match inserted {
        Ok(_) => Ok(User {
            id: UserID(connection.last_insert_rowid()),
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash,
        }),
        Err(error) if is_unique_violation(&error) => Err(Error::DuplicateEmail),
        Err(error) => Err(error.into()),
    }
}

/// # Errors
///
/// Returns [Error::NotFound] if no user has `user_id`.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    find_user("id = ?1", user_id.as_i64(), connection)
}

/// Look up a user by email, ignoring case.
///
/// # Errors
///
/// Returns [Error::NotFound] if nobody registered with `email`.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    find_user("email = ?1", email.trim(), connection)
}

fn find_user(
    condition: &str,
    value: impl rusqlite::ToSql,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE {condition}"))?
        .query_row([value], user_from_row)
        .optional()?
        .ok_or(Error::NotFound)
}

/// # Errors
///
/// Returns [Error::NotFound] if no user has `user_id`.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    match connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )? {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}
