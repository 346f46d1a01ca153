//! Creates the application's database schema.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    auth::create_user_table,
    category::{create_category_table, seed_system_categories},
    goal::create_goal_table,
    objective::create_objective_table,
    transaction::create_transaction_table,
    wallet::create_wallet_table,
};

/// Create all tables, in dependency order, and seed the system categories.
///
/// Foreign key enforcement is switched on for `connection`, the ledger relies
/// on it to stop categories that are still in use from being deleted.
/// This function is idempotent and may be called on an existing database.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the SQL statements fail.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_wallet_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_goal_table(&transaction)?;
    create_objective_table(&transaction)?;
    seed_system_categories(&transaction)?;

    transaction.commit()?;

    tracing::debug!("Database initialised");

    Ok(())
}
