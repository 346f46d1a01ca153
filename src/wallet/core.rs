//! Wallet domain types and database queries.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error, UserID,
    amount::validate_initial_balance,
    database_id::WalletId,
    error::is_unique_violation,
    name::capitalised_name,
};

/// A validated wallet name.
///
/// Wallet names are trimmed and capitalised, e.g. " sAVINGS " becomes "Savings".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct WalletName(String);

impl WalletName {
    /// Create a wallet name.
    ///
    /// # Errors
    ///
    /// Returns an [Error::EmptyName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        capitalised_name(name, "Wallet").map(Self)
    }

    /// Create a wallet name without validation.
    ///
    /// The caller should ensure that the string is already trimmed,
    /// capitalised and not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for WalletName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for WalletName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named container of money with a cached running balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    /// The ID of the wallet.
    pub id: WalletId,
    /// The display name of the wallet.
    pub name: WalletName,
    /// The balance the wallet was opened with.
    pub initial_balance: f64,
    /// The opening balance plus every income minus every expense.
    pub current_balance: f64,
    /// Inactive wallets are hidden and can no longer be changed.
    pub is_active: bool,
    /// The user that owns the wallet.
    pub user_id: UserID,
}

/// Create the wallet table.
///
/// Wallet names are unique per user regardless of case, including wallets
/// that have been deactivated.
pub fn create_wallet_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS wallet (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL COLLATE NOCASE,
            initial_balance REAL NOT NULL,
            current_balance REAL NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            user_id INTEGER NOT NULL,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_wallet_user_id ON wallet(user_id);",
    )
}

/// Map a row of `id, name, initial_balance, current_balance, is_active, user_id` to a [Wallet].
pub fn map_row_to_wallet(row: &Row) -> Result<Wallet, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Wallet {
        id: row.get(0)?,
        name: WalletName::new_unchecked(&raw_name),
        initial_balance: row.get(2)?,
        current_balance: row.get(3)?,
        is_active: row.get(4)?,
        user_id: UserID::new(row.get(5)?),
    })
}

/// Create a wallet whose current balance starts at `initial_balance`.
///
/// # Errors
///
/// - [Error::NegativeInitialBalance] if `initial_balance` is below zero or not a number.
/// - [Error::AmountTooLarge] if `initial_balance` is above [MAX_AMOUNT](crate::amount::MAX_AMOUNT).
/// - [Error::DuplicateWalletName] if the user already has a wallet with this name,
///   active or not.
pub fn create_wallet(
    name: WalletName,
    initial_balance: f64,
    user_id: UserID,
    connection: &Connection,
) -> Result<Wallet, Error> {
    let initial_balance = validate_initial_balance(initial_balance)?;

    connection
        .execute(
            "INSERT INTO wallet (name, initial_balance, current_balance, is_active, user_id)
            VALUES (?1, ?2, ?2, 1, ?3)",
            (name.as_ref(), initial_balance, user_id.as_i64()),
        )
        .map_err(|error| {
            if is_unique_violation(&error) {
                Error::DuplicateWalletName(name.to_string())
            } else {
                error.into()
            }
        })?;

    let id = connection.last_insert_rowid();

    Ok(Wallet {
        id,
        name,
        initial_balance,
        current_balance: initial_balance,
        is_active: true,
        user_id,
    })
}

/// Get the active wallets of `user_id` ordered by name.
pub fn get_active_wallets(user_id: UserID, connection: &Connection) -> Result<Vec<Wallet>, Error> {
    connection
        .prepare(
            "SELECT id, name, initial_balance, current_balance, is_active, user_id
            FROM wallet
            WHERE user_id = :user_id AND is_active = 1
            ORDER BY name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row_to_wallet)?
        .map(|maybe_wallet| maybe_wallet.map_err(Error::from))
        .collect()
}

/// Get an active wallet by its ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no active wallet with `id`.
pub fn get_wallet(id: WalletId, connection: &Connection) -> Result<Wallet, Error> {
    connection
        .prepare(
            "SELECT id, name, initial_balance, current_balance, is_active, user_id
            FROM wallet
            WHERE id = :id AND is_active = 1",
        )?
        .query_row(&[(":id", &id)], map_row_to_wallet)
        .map_err(Error::from)
}

/// Get an active wallet that must belong to `user_id`.
///
/// # Errors
///
/// - [Error::NotFound] if there is no active wallet with `id`.
/// - [Error::Forbidden] if the wallet belongs to another user.
pub fn get_owned_wallet(
    id: WalletId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Wallet, Error> {
    let wallet = get_wallet(id, connection)?;

    if wallet.user_id != user_id {
        tracing::warn!(
            "User {user_id} tried to access wallet {id} which belongs to user {}",
            wallet.user_id
        );
        return Err(Error::Forbidden);
    }

    Ok(wallet)
}

/// Rename an active wallet owned by `user_id`.
///
/// # Errors
///
/// - [Error::UpdateMissing] if the user has no active wallet with `id`.
/// - [Error::DuplicateWalletName] if another of the user's wallets has the name.
pub fn rename_wallet(
    id: WalletId,
    name: WalletName,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE wallet SET name = ?1 WHERE id = ?2 AND user_id = ?3 AND is_active = 1",
            (name.as_ref(), id, user_id.as_i64()),
        )
        .map_err(|error| {
            if is_unique_violation(&error) {
                Error::DuplicateWalletName(name.to_string())
            } else {
                error.into()
            }
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing("wallet"));
    }

    Ok(())
}

/// Soft delete an active wallet owned by `user_id`.
///
/// The wallet and its transactions stay in the database so that reports
/// still include them.
///
/// # Errors
///
/// Returns [Error::DeleteMissing] if the user has no active wallet with `id`.
pub fn deactivate_wallet(
    id: WalletId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE wallet SET is_active = 0 WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("wallet"));
    }

    Ok(())
}


#[cfg(test)]
mod wallet_query_tests {
    use crate::{
        Error,
        test_utils::{create_test_user, get_test_connection},
    };

    use super::{
        WalletName, create_wallet, deactivate_wallet, get_active_wallets, get_owned_wallet,
        get_wallet, rename_wallet,
    };

    #[test]
    fn create_wallet_starts_at_initial_balance() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);

        let wallet = create_wallet(
            WalletName::new_unchecked("Cash"),
            100.456,
            user_id,
            &connection,
        )
        .unwrap();

        assert!(wallet.id > 0);
        assert_eq!(wallet.initial_balance, 100.46);
        assert_eq!(wallet.current_balance, 100.46);
        assert!(wallet.is_active);
        assert_eq!(get_wallet(wallet.id, &connection), Ok(wallet));
    }

    #[test]
    fn create_wallet_rejects_balance_too_large_to_store() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);

        let result = create_wallet(WalletName::new_unchecked("Cash"), 1e307, user_id, &connection);

        assert_eq!(result, Err(Error::AmountTooLarge(1e307)));
        assert_eq!(get_active_wallets(user_id, &connection), Ok(vec![]));
    }

    #[test]
    fn create_wallet_rejects_negative_balance() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);

        let result = create_wallet(WalletName::new_unchecked("Cash"), -0.01, user_id, &connection);

        assert_eq!(result, Err(Error::NegativeInitialBalance(-0.01)));
    }

    #[test]
    fn create_wallet_rejects_duplicate_name_ignoring_case() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        create_wallet(WalletName::new_unchecked("Cash"), 0.0, user_id, &connection).unwrap();

        let result = create_wallet(WalletName::new_unchecked("CASH"), 0.0, user_id, &connection);

        assert_eq!(result, Err(Error::DuplicateWalletName("CASH".to_owned())));
    }

    #[test]
    fn duplicate_check_includes_inactive_wallets() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        let wallet =
            create_wallet(WalletName::new_unchecked("Cash"), 0.0, user_id, &connection).unwrap();
        deactivate_wallet(wallet.id, user_id, &connection).unwrap();

        let result = create_wallet(WalletName::new_unchecked("Cash"), 0.0, user_id, &connection);

        assert_eq!(result, Err(Error::DuplicateWalletName("Cash".to_owned())));
    }

    #[test]
    fn different_users_can_share_wallet_names() {
        let connection = get_test_connection();
        let user_a = create_test_user("a@bar.baz", &connection);
        let user_b = create_test_user("b@bar.baz", &connection);
        create_wallet(WalletName::new_unchecked("Cash"), 0.0, user_a, &connection).unwrap();

        let result = create_wallet(WalletName::new_unchecked("Cash"), 0.0, user_b, &connection);

        assert!(result.is_ok());
    }

    #[test]
    fn get_active_wallets_is_ordered_by_name_and_scoped_to_user() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        let other_user = create_test_user("other@bar.baz", &connection);
        let savings =
            create_wallet(WalletName::new_unchecked("Savings"), 5.0, user_id, &connection)
                .unwrap();
        let bank =
            create_wallet(WalletName::new_unchecked("Bank"), 10.0, user_id, &connection).unwrap();
        let closed =
            create_wallet(WalletName::new_unchecked("Closed"), 0.0, user_id, &connection).unwrap();
        deactivate_wallet(closed.id, user_id, &connection).unwrap();
        create_wallet(WalletName::new_unchecked("Other"), 1.0, other_user, &connection).unwrap();

        let wallets = get_active_wallets(user_id, &connection).unwrap();

        assert_eq!(wallets, vec![bank, savings]);
    }

    #[test]
    fn get_wallet_hides_inactive_wallets() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        let wallet =
            create_wallet(WalletName::new_unchecked("Cash"), 0.0, user_id, &connection).unwrap();
        deactivate_wallet(wallet.id, user_id, &connection).unwrap();

        assert_eq!(get_wallet(wallet.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_owned_wallet_rejects_other_users() {
        let connection = get_test_connection();
        let owner = create_test_user("owner@bar.baz", &connection);
        let intruder = create_test_user("intruder@bar.baz", &connection);
        let wallet =
            create_wallet(WalletName::new_unchecked("Cash"), 0.0, owner, &connection).unwrap();

        assert_eq!(
            get_owned_wallet(wallet.id, intruder, &connection),
            Err(Error::Forbidden)
        );
        assert_eq!(get_owned_wallet(wallet.id + 1, owner, &connection), Err(Error::NotFound));
    }

    #[test]
    fn rename_wallet_succeeds() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        let wallet =
            create_wallet(WalletName::new_unchecked("Cash"), 0.0, user_id, &connection).unwrap();

        rename_wallet(
            wallet.id,
            WalletName::new_unchecked("Pocket"),
            user_id,
            &connection,
        )
        .unwrap();

        let got = get_wallet(wallet.id, &connection).unwrap();
        assert_eq!(got.name, WalletName::new_unchecked("Pocket"));
    }

    #[test]
    fn rename_wallet_rejects_other_users_and_inactive_wallets() {
        let connection = get_test_connection();
        let owner = create_test_user("owner@bar.baz", &connection);
        let intruder = create_test_user("intruder@bar.baz", &connection);
        let wallet =
            create_wallet(WalletName::new_unchecked("Cash"), 0.0, owner, &connection).unwrap();

        let result = rename_wallet(
            wallet.id,
            WalletName::new_unchecked("Mine"),
            intruder,
            &connection,
        );
        assert_eq!(result, Err(Error::UpdateMissing("wallet")));

        deactivate_wallet(wallet.id, owner, &connection).unwrap();
        let result = rename_wallet(
            wallet.id,
            WalletName::new_unchecked("Mine"),
            owner,
            &connection,
        );
        assert_eq!(result, Err(Error::UpdateMissing("wallet")));
    }

    #[test]
    fn rename_wallet_rejects_duplicate_name() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        let wallet =
            create_wallet(WalletName::new_unchecked("Cash"), 0.0, user_id, &connection).unwrap();
        create_wallet(WalletName::new_unchecked("Bank"), 0.0, user_id, &connection).unwrap();

        let result = rename_wallet(
            wallet.id,
            WalletName::new_unchecked("Bank"),
            user_id,
            &connection,
        );

        assert_eq!(result, Err(Error::DuplicateWalletName("Bank".to_owned())));
    }

    #[test]
    fn deactivate_wallet_twice_fails() {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        let wallet =
            create_wallet(WalletName::new_unchecked("Cash"), 0.0, user_id, &connection).unwrap();

        assert_eq!(deactivate_wallet(wallet.id, user_id, &connection), Ok(()));
        assert_eq!(
            deactivate_wallet(wallet.id, user_id, &connection),
            Err(Error::DeleteMissing("wallet"))
        );
    }
}
