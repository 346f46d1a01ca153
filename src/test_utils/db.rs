use rusqlite::Connection;

use crate::{PasswordHash, UserID, create_user, initialize_db};

/// An in-memory database with every table created and the system categories seeded.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize_db(&connection).expect("Could not initialise database");

    connection
}

/// Insert a user with a dummy password hash.
#[track_caller]
pub(crate) fn create_test_user(email: &str, connection: &Connection) -> UserID {
    let username = email.split('@').next().unwrap_or(email);

    create_user(
        username,
        email,
        PasswordHash::new_unchecked("notarealhash"),
        connection,
    )
    .expect("Could not create test user")
    .id
}
