//! Savings objectives and their progress.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error, UserID,
    amount::validate_amount,
    database_id::{ObjectiveId, WalletId},
    name::trimmed_name,
    wallet::get_wallet,
};

/// The most characters kept of an objective's icon.
const ICON_MAX_CHARS: usize = 10;

/// An amount the user is saving towards, e.g. a holiday.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    /// The ID of the objective.
    pub id: ObjectiveId,
    /// The display name of the objective.
    pub name: String,
    /// The amount the user wants to save.
    pub target_amount: f64,
    /// When the user would like to reach the target.
    pub due_date: Option<Date>,
    /// Objectives become inactive when deleted.
    pub is_active: bool,
    /// A short decoration such as an emoji.
    pub icon: Option<String>,
    /// The user that owns the objective.
    pub user_id: UserID,
    /// The wallet the savings are kept in.
    pub wallet_id: Option<WalletId>,
}

/// The user editable details of an objective.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveDetails {
    /// The display name, surrounding whitespace is trimmed.
    pub name: String,
    /// The amount to save, must be greater than zero.
    pub target_amount: f64,
    /// When the user would like to reach the target.
    pub due_date: Option<Date>,
    /// An active wallet of the user holding the savings.
    pub wallet_id: Option<WalletId>,
    /// A short decoration, blank icons are dropped.
    pub icon: Option<String>,
}

/// An objective with the amount saved so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveProgress {
    pub objective: Objective,
    /// The name of the linked wallet if it is still active.
    pub wallet_name: Option<String>,
    /// The balance of the linked wallet, zero without an active wallet.
    pub current_amount: f64,
    /// The share of the target saved, capped at 100.
    pub percentage: f64,
}

/// Create the objective table.
///
/// Objectives keep existing when their wallet row is removed.
pub fn create_objective_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS objective (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            target_amount REAL NOT NULL CHECK(target_amount > 0),
            due_date TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            icon TEXT,
            user_id INTEGER NOT NULL,
            wallet_id INTEGER,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(wallet_id) REFERENCES wallet(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_objective_user_id ON objective(user_id);",
    )
}

const OBJECTIVE_COLUMNS: &str = "objective.id, objective.name, objective.target_amount, \
    objective.due_date, objective.is_active, objective.icon, objective.user_id, \
    objective.wallet_id";

fn map_objective_row(row: &Row) -> Result<Objective, rusqlite::Error> {
    Ok(Objective {
        id: row.get(0)?,
        name: row.get(1)?,
        target_amount: row.get(2)?,
        due_date: row.get(3)?,
        is_active: row.get(4)?,
        icon: row.get(5)?,
        user_id: UserID::new(row.get(6)?),
        wallet_id: row.get(7)?,
    })
}

fn map_progress_row(row: &Row) -> Result<ObjectiveProgress, rusqlite::Error> {
    let objective = map_objective_row(row)?;
    let current_amount: f64 = row.get(9)?;
    let percentage = (current_amount / objective.target_amount * 100.0).min(100.0);

    Ok(ObjectiveProgress {
        wallet_name: row.get(8)?,
        current_amount,
        percentage,
        objective,
    })
}

/// The validated form of [ObjectiveDetails].
struct ValidDetails {
    name: String,
    target_amount: f64,
    due_date: Option<Date>,
    wallet_id: Option<WalletId>,
    icon: Option<String>,
}

fn validate_details(
    details: ObjectiveDetails,
    user_id: UserID,
    connection: &Connection,
) -> Result<ValidDetails, Error> {
    let name = trimmed_name(&details.name, "Objective")?;

    let target_amount = validate_amount(details.target_amount)?;

    if let Some(wallet_id) = details.wallet_id {
        match get_wallet(wallet_id, connection) {
            Ok(wallet) if wallet.user_id == user_id => {}
            Ok(_) | Err(Error::NotFound) => return Err(Error::InvalidWallet),
            Err(error) => return Err(error),
        }
    }

    let icon = details
        .icon
        .as_deref()
        .map(str::trim)
        .filter(|icon| !icon.is_empty())
        .map(|icon| icon.chars().take(ICON_MAX_CHARS).collect());

    Ok(ValidDetails {
        name,
        target_amount,
        due_date: details.due_date,
        wallet_id: details.wallet_id,
        icon,
    })
}

/// Create an objective for `user_id`.
///
/// # Errors
///
/// - [Error::EmptyName] if the name is blank.
/// - [Error::InvalidAmount] if the target is not greater than zero.
/// - [Error::InvalidWallet] if the wallet is inactive or not owned by the user.
pub fn create_objective(
    details: ObjectiveDetails,
    user_id: UserID,
    connection: &Connection,
) -> Result<Objective, Error> {
    let details = validate_details(details, user_id, connection)?;

    connection.execute(
        "INSERT INTO objective (name, target_amount, due_date, icon, user_id, wallet_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            &details.name,
            details.target_amount,
            details.due_date,
            &details.icon,
            user_id.as_i64(),
            details.wallet_id,
        ),
    )?;

    Ok(Objective {
        id: connection.last_insert_rowid(),
        name: details.name,
        target_amount: details.target_amount,
        due_date: details.due_date,
        is_active: true,
        icon: details.icon,
        user_id,
        wallet_id: details.wallet_id,
    })
}

/// Get one of the user's active objectives.
///
/// Other users' objectives and inactive objectives are reported as [Error::NotFound].
pub fn get_active_objective(
    id: ObjectiveId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Objective, Error> {
    connection
        .prepare(&format!(
            "SELECT {OBJECTIVE_COLUMNS} FROM objective
            WHERE objective.id = :id AND objective.user_id = :user_id AND objective.is_active = 1"
        ))?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_objective_row,
        )
        .map_err(Error::from)
}

/// Get the user's active objectives with the amount saved towards each.
///
/// Objectives are ordered by due date, those without one last.
pub fn get_active_objectives(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<ObjectiveProgress>, Error> {
    connection
        .prepare(&format!(
            "SELECT {OBJECTIVE_COLUMNS}, wallet.name, COALESCE(wallet.current_balance, 0)
            FROM objective
            LEFT JOIN wallet ON wallet.id = objective.wallet_id AND wallet.is_active = 1
            WHERE objective.user_id = :user_id AND objective.is_active = 1
            ORDER BY objective.due_date IS NULL, objective.due_date ASC, objective.id ASC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_progress_row)?
        .map(|maybe_progress| maybe_progress.map_err(Error::from))
        .collect()
}

/// Replace the details of one of the user's active objectives.
///
/// # Errors
///
/// - The validation errors of [create_objective].
/// - [Error::UpdateMissing] if the user has no active objective with `id`.
pub fn edit_objective(
    id: ObjectiveId,
    details: ObjectiveDetails,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let details = validate_details(details, user_id, connection)?;

    let rows_affected = connection.execute(
        "UPDATE objective
        SET name = ?1, target_amount = ?2, due_date = ?3, icon = ?4, wallet_id = ?5
        WHERE id = ?6 AND user_id = ?7 AND is_active = 1",
        (
            &details.name,
            details.target_amount,
            details.due_date,
            &details.icon,
            details.wallet_id,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing("objective"));
    }

    Ok(())
}

/// Deactivate one of the user's active objectives.
///
/// # Errors
///
/// Returns [Error::DeleteMissing] if the user has no active objective with `id`.
pub fn delete_objective(
    id: ObjectiveId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE objective SET is_active = 0 WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("objective"));
    }

    Ok(())
}
