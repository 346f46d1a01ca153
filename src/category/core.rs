//! Category domain types and database queries.

use std::{collections::HashMap, fmt::Display};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserID,
    database_id::CategoryId,
    error::{is_foreign_key_violation, is_unique_violation},
    name::trimmed_name,
};

/// The names of the categories every user shares.
///
/// System categories are seeded when the database is initialised and are
/// reserved for bookkeeping entries, users cannot create, rename or delete them.
pub const SYSTEM_CATEGORIES: [&str; 2] = ["Initial deposit", "Final withdrawal"];

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        trimmed_name(name, "Category").map(Self)
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is trimmed and not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Whether the name matches a system category, ignoring case.
    pub fn is_reserved(&self) -> bool {
        SYSTEM_CATEGORIES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(&self.0))
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label for grouping transactions, e.g. "Groceries".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: CategoryName,
    /// The owner of a user category, `None` for system categories.
    pub user_id: Option<UserID>,
}

impl Category {
    /// Whether this is one of the shared [SYSTEM_CATEGORIES].
    pub fn is_system(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Create the category table.
///
/// System categories have a NULL `user_id`.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL COLLATE NOCASE,
            user_id INTEGER,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )
}

/// Insert any [SYSTEM_CATEGORIES] that are missing.
///
/// Safe to call on every start up.
pub fn seed_system_categories(connection: &Connection) -> Result<(), rusqlite::Error> {
    let mut statement = connection.prepare(
        "INSERT INTO category (name, user_id)
        SELECT ?1, NULL
        WHERE NOT EXISTS (SELECT 1 FROM category WHERE name = ?1 AND user_id IS NULL)",
    )?;

    for name in SYSTEM_CATEGORIES {
        if statement.execute([name])? > 0 {
            tracing::info!("Created system category \"{name}\"");
        }
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;
    let user_id: Option<i64> = row.get(2)?;

    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        user_id: user_id.map(UserID::new),
    })
}

fn map_unique_violation(error: rusqlite::Error, name: &CategoryName) -> Error {
    if is_unique_violation(&error) {
        Error::DuplicateCategoryName(name.to_string())
    } else {
        error.into()
    }
}

/// Create a category owned by `user_id`.
///
/// # Errors
///
/// - [Error::ReservedCategoryName] if `name` is the name of a system category.
/// - [Error::DuplicateCategoryName] if the user already has a category with this name.
pub fn create_category(
    name: CategoryName,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    if name.is_reserved() {
        return Err(Error::ReservedCategoryName(name.to_string()));
    }

    connection
        .execute(
            "INSERT INTO category (name, user_id) VALUES (?1, ?2)",
            (name.as_ref(), user_id.as_i64()),
        )
        .map_err(|error| map_unique_violation(error, &name))?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        name,
        user_id: Some(user_id),
    })
}

/// Get a category, system or user, by ID.
pub fn get_category(id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, user_id FROM category WHERE id = :id")?
        .query_row(&[(":id", &id)], map_row)
        .map_err(Error::from)
}

/// Get a category that `user_id` may file a transaction under: one of
/// their own categories or a system category.
///
/// # Errors
///
/// Returns [Error::InvalidCategory] if the category does not exist or belongs
/// to another user.
pub fn get_usable_category(
    id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    match get_category(id, connection) {
        Ok(category) if category.is_system() || category.user_id == Some(user_id) => Ok(category),
        Ok(_) | Err(Error::NotFound) => Err(Error::InvalidCategory),
        Err(error) => Err(error),
    }
}

/// Get the categories owned by `user_id` ordered by name.
pub fn get_user_categories(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, user_id FROM category
            WHERE user_id = :user_id
            ORDER BY name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Get the shared system categories.
pub fn get_system_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, user_id FROM category WHERE user_id IS NULL ORDER BY id ASC")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Rename a category owned by `user_id`.
///
/// # Errors
///
/// - [Error::ReservedCategoryName] if `name` is the name of a system category.
/// - [Error::DuplicateCategoryName] if the user has another category with this name.
/// - [Error::UpdateMissing] if the user does not own a category with `id`,
///   this includes system categories.
pub fn rename_category(
    id: CategoryId,
    name: CategoryName,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    if name.is_reserved() {
        return Err(Error::ReservedCategoryName(name.to_string()));
    }

    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            (name.as_ref(), id, user_id.as_i64()),
        )
        .map_err(|error| map_unique_violation(error, &name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing("category"));
    }

    Ok(())
}

/// Delete a category owned by `user_id`.
///
/// Goals that track the category go back to tracking all categories.
///
/// # Errors
///
/// - [Error::CategoryInUse] if any transaction is filed under the category.
/// - [Error::DeleteMissing] if the user does not own a category with `id`,
///   this includes system categories.
pub fn delete_category(
    id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::CategoryInUse
            } else {
                error.into()
            }
        })?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("category"));
    }

    Ok(())
}

/// Count the transactions filed under each of the user's categories.
pub fn count_transactions_per_category(
    user_id: UserID,
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare(
            "SELECT category.id, COUNT(\"transaction\".id)
            FROM category
            INNER JOIN \"transaction\" ON \"transaction\".category_id = category.id
            WHERE category.user_id = :user_id
            GROUP BY category.id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .collect();

    result.map_err(Error::from)
}
