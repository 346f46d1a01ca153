//! Transaction domain types, the transaction table and read queries.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, UserID,
    database_id::{CategoryId, TransactionId, WalletId},
};

/// Whether a transaction adds money to or takes money from a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming into a wallet.
    Income,
    /// Money leaving a wallet.
    Expense,
}

impl TransactionType {
    /// The value stored in the database and sent by forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// The signed change a transaction of this type and `value` makes to its
    /// wallet's balance.
    pub fn effect(&self, value: f64) -> f64 {
        match self {
            TransactionType::Income => value,
            TransactionType::Expense => -value,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction type {other:?}").into(),
            )),
        }
    }
}

/// A single income or expense recorded against a wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the transaction is an income or an expense.
    pub type_: TransactionType,
    /// The unsigned amount of money, always greater than zero.
    pub value: f64,
    /// The date the transaction happened.
    pub created_at: Date,
    /// A free text note, may be empty.
    pub description: String,
    /// The wallet the money moved in or out of.
    pub wallet_id: WalletId,
    /// The category the transaction is filed under.
    pub category_id: CategoryId,
}

impl Transaction {
    /// The signed change this transaction makes to its wallet's balance.
    pub fn effect(&self) -> f64 {
        self.type_.effect(self.value)
    }
}

/// A transaction with the names of its wallet and category for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListItem {
    /// The transaction.
    pub transaction: Transaction,
    /// The name of the wallet the transaction belongs to.
    pub wallet_name: String,
    /// The name of the category the transaction is filed under.
    pub category_name: String,
    /// Inactive wallets are read only, so their transactions cannot be edited.
    pub wallet_is_active: bool,
}

/// Create the transaction table.
///
/// Deleting a category that transactions still refer to fails with a
/// foreign key error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            type TEXT NOT NULL CHECK(type IN ('income', 'expense')),
            value REAL NOT NULL CHECK(value > 0),
            created_at TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            wallet_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            FOREIGN KEY(wallet_id) REFERENCES wallet(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_wallet_id ON \"transaction\"(wallet_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_category_id ON \"transaction\"(category_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_created_at ON \"transaction\"(created_at);",
    )
}

/// Map a row of `id, type, value, created_at, description, wallet_id, category_id`
/// to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        type_: row.get(1)?,
        value: row.get(2)?,
        created_at: row.get(3)?,
        description: row.get(4)?,
        wallet_id: row.get(5)?,
        category_id: row.get(6)?,
    })
}

fn map_list_item_row(row: &Row) -> Result<TransactionListItem, rusqlite::Error> {
    Ok(TransactionListItem {
        transaction: map_transaction_row(row)?,
        wallet_name: row.get(7)?,
        category_name: row.get(8)?,
        wallet_is_active: row.get(9)?,
    })
}

const LIST_ITEM_QUERY: &str = "SELECT \"transaction\".id, \"transaction\".type, \
    \"transaction\".value, \"transaction\".created_at, \"transaction\".description, \
    \"transaction\".wallet_id, \"transaction\".category_id, \
    wallet.name, category.name, wallet.is_active, wallet.user_id \
    FROM \"transaction\" \
    INNER JOIN wallet ON wallet.id = \"transaction\".wallet_id \
    INNER JOIN category ON category.id = \"transaction\".category_id";

/// Get a transaction by ID.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, type, value, created_at, description, wallet_id, category_id
            FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(Error::from)
}

/// Get a transaction along with its wallet and category names.
///
/// # Errors
///
/// - [Error::NotFound] if there is no transaction with `id`.
/// - [Error::Forbidden] if the transaction's wallet belongs to another user.
pub fn get_owned_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<TransactionListItem, Error> {
    let (item, owner): (TransactionListItem, i64) = connection
        .prepare(&format!("{LIST_ITEM_QUERY} WHERE \"transaction\".id = :id"))
        .and_then(|mut statement| {
            statement.query_row(&[(":id", &id)], |row| {
                Ok((map_list_item_row(row)?, row.get(10)?))
            })
        })?;

    if owner != user_id.as_i64() {
        tracing::warn!(
            "User {user_id} tried to access transaction {id} which belongs to user {owner}"
        );
        return Err(Error::Forbidden);
    }

    Ok(item)
}

/// Get the transactions of one of the user's wallets, newest first.
///
/// Transactions on the same date are ordered by ID, newest first.
pub fn get_transactions_by_wallet(
    wallet_id: WalletId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<TransactionListItem>, Error> {
    connection
        .prepare(&format!(
            "{LIST_ITEM_QUERY}
            WHERE \"transaction\".wallet_id = :wallet_id AND wallet.user_id = :user_id
            ORDER BY \"transaction\".created_at DESC, \"transaction\".id DESC"
        ))?
        .query_map(
            &[(":wallet_id", &wallet_id), (":user_id", &user_id.as_i64())],
            map_list_item_row,
        )?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

/// Get the transactions across all of the user's wallets, newest first.
///
/// Transactions of deactivated wallets are included.
pub fn get_user_transactions(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<TransactionListItem>, Error> {
    connection
        .prepare(&format!(
            "{LIST_ITEM_QUERY}
            WHERE wallet.user_id = :user_id
            ORDER BY \"transaction\".created_at DESC, \"transaction\".id DESC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_list_item_row)?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}
