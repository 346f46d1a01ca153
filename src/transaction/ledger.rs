//! Keeps wallet balances in step with their transactions.
//!
//! A wallet's current balance is its initial balance plus every income minus
//! every expense. Each function here changes a transaction and its wallet's
//! balance inside one SQLite transaction, so either both change or neither does.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error, UserID,
    amount::{round_to_cents, validate_amount},
    category::get_usable_category,
    database_id::{CategoryId, TransactionId, WalletId},
    transaction::core::{Transaction, TransactionType, get_transaction},
    wallet::{Wallet, get_wallet},
};

/// The details of a transaction to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the transaction is an income or an expense.
    pub type_: TransactionType,
    /// The unsigned amount, must be greater than zero.
    pub value: f64,
    /// The date the transaction happened, must not be after today.
    pub created_at: Date,
    /// A free text note.
    pub description: String,
    /// The wallet the money moves in or out of.
    pub wallet_id: WalletId,
    /// The category to file the transaction under.
    pub category_id: CategoryId,
}

/// The new details of an existing transaction.
///
/// A transaction cannot be moved to another wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    /// Whether the transaction is an income or an expense.
    pub type_: TransactionType,
    /// The unsigned amount, must be greater than zero.
    pub value: f64,
    /// The date the transaction happened, must not be after today.
    pub created_at: Date,
    /// A free text note.
    pub description: String,
    /// The category to file the transaction under.
    pub category_id: CategoryId,
}

fn validate_date(date: Date, today: Date) -> Result<(), Error> {
    if date > today {
        return Err(Error::FutureDate(date));
    }

    Ok(())
}

/// Get a wallet that `user_id` may record transactions against.
fn get_mutable_wallet(
    wallet_id: WalletId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Wallet, Error> {
    match get_wallet(wallet_id, connection) {
        Ok(wallet) if wallet.user_id == user_id => Ok(wallet),
        Ok(_) | Err(Error::NotFound) => Err(Error::InvalidWallet),
        Err(error) => Err(error),
    }
}

/// Add `change` to `balance`, rejecting any result below zero.
fn apply_change(balance: f64, change: f64) -> Result<f64, Error> {
    let new_balance = round_to_cents(balance + change);

    if new_balance < 0.0 {
        return Err(Error::InsufficientBalance { balance, change });
    }

    Ok(new_balance)
}

fn set_wallet_balance(
    wallet_id: WalletId,
    balance: f64,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE wallet SET current_balance = ?1 WHERE id = ?2",
        (balance, wallet_id),
    )?;

    Ok(())
}

/// Record a transaction and apply it to its wallet's balance.
///
/// # Errors
///
/// - [Error::InvalidAmount] if the value is not greater than zero.
/// - [Error::FutureDate] if the date is after `today`.
/// - [Error::InvalidWallet] if the wallet is inactive or not owned by `user_id`.
/// - [Error::InvalidCategory] if the category is neither a system category nor
///   owned by `user_id`.
/// - [Error::InsufficientBalance] if the wallet balance would go below zero.
pub fn create_transaction(
    new_transaction: NewTransaction,
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let value = validate_amount(new_transaction.value)?;
    validate_date(new_transaction.created_at, today)?;

    let sql_transaction = connection.unchecked_transaction()?;

    let wallet = get_mutable_wallet(new_transaction.wallet_id, user_id, &sql_transaction)?;
    get_usable_category(new_transaction.category_id, user_id, &sql_transaction)?;

    let new_balance = apply_change(
        wallet.current_balance,
        new_transaction.type_.effect(value),
    )?;

    let description = new_transaction.description.trim().to_owned();
    sql_transaction.execute(
        "INSERT INTO \"transaction\" (type, value, created_at, description, wallet_id, category_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            new_transaction.type_,
            value,
            new_transaction.created_at,
            &description,
            wallet.id,
            new_transaction.category_id,
        ),
    )?;
    let id = sql_transaction.last_insert_rowid();

    set_wallet_balance(wallet.id, new_balance, &sql_transaction)?;
    sql_transaction.commit()?;

    tracing::debug!(
        "Recorded transaction {id} in wallet {}, balance {} -> {new_balance}",
        wallet.id,
        wallet.current_balance
    );

    Ok(Transaction {
        id,
        type_: new_transaction.type_,
        value,
        created_at: new_transaction.created_at,
        description,
        wallet_id: wallet.id,
        category_id: new_transaction.category_id,
    })
}

/// Change a transaction, reversing its old effect on the wallet balance and
/// applying the new one.
///
/// # Errors
///
/// - [Error::UpdateMissing] if there is no transaction with `id`.
/// - [Error::InvalidWallet] if the transaction's wallet is inactive or not
///   owned by `user_id`.
/// - [Error::InsufficientBalance] if the wallet balance would go below zero.
///   The reported change is the new effect minus the old one.
/// - The validation errors of [create_transaction].
pub fn edit_transaction(
    id: TransactionId,
    update: TransactionUpdate,
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let value = validate_amount(update.value)?;
    validate_date(update.created_at, today)?;

    let sql_transaction = connection.unchecked_transaction()?;

    let existing = match get_transaction(id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissing("transaction")),
        Err(error) => return Err(error),
    };
    let wallet = get_mutable_wallet(existing.wallet_id, user_id, &sql_transaction)?;
    get_usable_category(update.category_id, user_id, &sql_transaction)?;

    let change = round_to_cents(update.type_.effect(value) - existing.effect());
    let new_balance = apply_change(wallet.current_balance, change)?;

    let description = update.description.trim().to_owned();
    sql_transaction.execute(
        "UPDATE \"transaction\"
        SET type = ?1, value = ?2, created_at = ?3, description = ?4, category_id = ?5
        WHERE id = ?6",
        (
            update.type_,
            value,
            update.created_at,
            &description,
            update.category_id,
            id,
        ),
    )?;

    set_wallet_balance(wallet.id, new_balance, &sql_transaction)?;
    sql_transaction.commit()?;

    tracing::debug!(
        "Updated transaction {id} in wallet {}, balance {} -> {new_balance}",
        wallet.id,
        wallet.current_balance
    );

    Ok(Transaction {
        id,
        type_: update.type_,
        value,
        created_at: update.created_at,
        description,
        wallet_id: wallet.id,
        category_id: update.category_id,
    })
}

/// Delete a transaction and reverse its effect on the wallet balance.
///
/// # Errors
///
/// - [Error::DeleteMissing] if there is no transaction with `id`.
/// - [Error::InvalidWallet] if the transaction's wallet is inactive or not
///   owned by `user_id`.
/// - [Error::InsufficientBalance] if the transaction is an income that has
///   already been spent.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let existing = match get_transaction(id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::DeleteMissing("transaction")),
        Err(error) => return Err(error),
    };
    let wallet = get_mutable_wallet(existing.wallet_id, user_id, &sql_transaction)?;

    let new_balance = apply_change(wallet.current_balance, -existing.effect())?;

    sql_transaction.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;
    set_wallet_balance(wallet.id, new_balance, &sql_transaction)?;
    sql_transaction.commit()?;

    tracing::debug!(
        "Deleted transaction {id} from wallet {}, balance {} -> {new_balance}",
        wallet.id,
        wallet.current_balance
    );

    Ok(())
}

#[cfg(test)]
mod ledger_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error, UserID,
        amount::MAX_AMOUNT,
        category::{CategoryName, create_category, get_system_categories},
        test_utils::{create_test_user, get_test_connection},
        transaction::core::{TransactionType, get_transaction},
        wallet::{Wallet, WalletName, create_wallet, deactivate_wallet, get_wallet},
    };

    use super::{
        NewTransaction, TransactionUpdate, create_transaction, delete_transaction,
        edit_transaction,
    };

    const TODAY: Date = date!(2025 - 06 - 15);

    struct Fixture {
        connection: Connection,
        user_id: UserID,
        wallet: Wallet,
        category_id: i64,
    }

    fn fixture(initial_balance: f64) -> Fixture {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        let wallet = create_wallet(
            WalletName::new_unchecked("Cash"),
            initial_balance,
            user_id,
            &connection,
        )
        .unwrap();
        let category_id =
            create_category(CategoryName::new_unchecked("Food"), user_id, &connection)
                .unwrap()
                .id;

        Fixture {
            connection,
            user_id,
            wallet,
            category_id,
        }
    }

    fn new_transaction(fixture: &Fixture, type_: TransactionType, value: f64) -> NewTransaction {
        NewTransaction {
            type_,
            value,
            created_at: TODAY,
            description: "".to_owned(),
            wallet_id: fixture.wallet.id,
            category_id: fixture.category_id,
        }
    }

    fn update(fixture: &Fixture, type_: TransactionType, value: f64) -> TransactionUpdate {
        TransactionUpdate {
            type_,
            value,
            created_at: TODAY,
            description: "".to_owned(),
            category_id: fixture.category_id,
        }
    }

    fn balance(fixture: &Fixture) -> f64 {
        fixture
            .connection
            .query_row(
                "SELECT current_balance FROM wallet WHERE id = ?1",
                [fixture.wallet.id],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[track_caller]
    fn assert_balance_matches_history(fixture: &Fixture) {
        let expected: f64 = fixture
            .connection
            .query_row(
                "SELECT wallet.initial_balance + COALESCE(SUM(
                    CASE \"transaction\".type
                        WHEN 'income' THEN \"transaction\".value
                        ELSE -\"transaction\".value
                    END), 0)
                FROM wallet
                LEFT JOIN \"transaction\" ON \"transaction\".wallet_id = wallet.id
                WHERE wallet.id = ?1",
                [fixture.wallet.id],
                |row| row.get(0),
            )
            .unwrap();

        assert!(
            (balance(fixture) - expected).abs() < 0.005,
            "want balance {expected}, got {}",
            balance(fixture)
        );
    }

    fn transaction_count(fixture: &Fixture) -> i64 {
        fixture
            .connection
            .query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn income_credits_wallet() {
        let fixture = fixture(10.0);

        let transaction = create_transaction(
            new_transaction(&fixture, TransactionType::Income, 5.25),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(balance(&fixture), 15.25);
        assert_eq!(
            get_transaction(transaction.id, &fixture.connection),
            Ok(transaction)
        );
        assert_balance_matches_history(&fixture);
    }

    #[test]
    fn expense_debits_wallet() {
        let fixture = fixture(10.0);

        create_transaction(
            new_transaction(&fixture, TransactionType::Expense, 10.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(balance(&fixture), 0.0);
        assert_balance_matches_history(&fixture);
    }

    #[test]
    fn expense_cannot_overdraw_wallet() {
        let fixture = fixture(10.0);

        let result = create_transaction(
            new_transaction(&fixture, TransactionType::Expense, 10.01),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        );

        assert_eq!(
            result,
            Err(Error::InsufficientBalance {
                balance: 10.0,
                change: -10.01
            })
        );
        assert_eq!(balance(&fixture), 10.0);
        assert_eq!(transaction_count(&fixture), 0);
    }

    #[test]
    fn create_rejects_invalid_amounts() {
        let fixture = fixture(10.0);

        for value in [0.0, -1.0, 0.001, f64::NAN] {
            let result = create_transaction(
                new_transaction(&fixture, TransactionType::Income, value),
                fixture.user_id,
                TODAY,
                &fixture.connection,
            );

            assert!(
                matches!(result, Err(Error::InvalidAmount(_))),
                "want invalid amount for {value}, got {result:?}"
            );
        }
        assert_eq!(transaction_count(&fixture), 0);
    }

    #[test]
    fn create_rejects_future_date() {
        let fixture = fixture(10.0);
        let tomorrow = date!(2025 - 06 - 16);
        let mut new = new_transaction(&fixture, TransactionType::Income, 1.0);
        new.created_at = tomorrow;

        let result = create_transaction(new, fixture.user_id, TODAY, &fixture.connection);

        assert_eq!(result, Err(Error::FutureDate(tomorrow)));
    }

    #[test]
    fn create_rejects_wallet_of_other_user() {
        let fixture = fixture(10.0);
        let intruder = create_test_user("intruder@bar.baz", &fixture.connection);

        let result = create_transaction(
            new_transaction(&fixture, TransactionType::Income, 1.0),
            intruder,
            TODAY,
            &fixture.connection,
        );

        assert_eq!(result, Err(Error::InvalidWallet));
        assert_eq!(balance(&fixture), 10.0);
    }

    #[test]
    fn create_rejects_inactive_wallet() {
        let fixture = fixture(10.0);
        deactivate_wallet(fixture.wallet.id, fixture.user_id, &fixture.connection).unwrap();

        let result = create_transaction(
            new_transaction(&fixture, TransactionType::Income, 1.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        );

        assert_eq!(result, Err(Error::InvalidWallet));
    }

    #[test]
    fn create_rejects_category_of_other_user() {
        let fixture = fixture(10.0);
        let other_user = create_test_user("other@bar.baz", &fixture.connection);
        let their_category = create_category(
            CategoryName::new_unchecked("Theirs"),
            other_user,
            &fixture.connection,
        )
        .unwrap();
        let mut new = new_transaction(&fixture, TransactionType::Income, 1.0);
        new.category_id = their_category.id;

        let result = create_transaction(new, fixture.user_id, TODAY, &fixture.connection);

        assert_eq!(result, Err(Error::InvalidCategory));
        assert_eq!(transaction_count(&fixture), 0);
    }

    #[test]
    fn create_accepts_system_category() {
        let fixture = fixture(0.0);
        let system = get_system_categories(&fixture.connection).unwrap().remove(0);
        let mut new = new_transaction(&fixture, TransactionType::Income, 50.0);
        new.category_id = system.id;

        let result = create_transaction(new, fixture.user_id, TODAY, &fixture.connection);

        assert!(result.is_ok());
        assert_eq!(balance(&fixture), 50.0);
    }

    #[test]
    fn edit_reverses_old_effect_and_applies_new_one() {
        let fixture = fixture(100.0);
        let transaction = create_transaction(
            new_transaction(&fixture, TransactionType::Expense, 30.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        let edited = edit_transaction(
            transaction.id,
            TransactionUpdate {
                description: "  Lunch ".to_owned(),
                ..update(&fixture, TransactionType::Income, 20.0)
            },
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        assert_eq!(balance(&fixture), 120.0);
        assert_eq!(edited.description, "Lunch");
        assert_eq!(edited.type_, TransactionType::Income);
        assert_eq!(
            get_transaction(transaction.id, &fixture.connection),
            Ok(edited)
        );
        assert_balance_matches_history(&fixture);
    }

    #[test]
    fn edit_can_use_the_whole_reversed_balance() {
        let fixture = fixture(50.0);
        let transaction = create_transaction(
            new_transaction(&fixture, TransactionType::Expense, 50.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        let result = edit_transaction(
            transaction.id,
            update(&fixture, TransactionType::Expense, 50.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        );

        assert!(result.is_ok());
        assert_eq!(balance(&fixture), 0.0);
    }

    #[test]
    fn edit_rejects_overdraw_and_leaves_wallet_untouched() {
        let fixture = fixture(50.0);
        let transaction = create_transaction(
            new_transaction(&fixture, TransactionType::Expense, 20.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        let result = edit_transaction(
            transaction.id,
            update(&fixture, TransactionType::Expense, 60.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        );

        assert_eq!(
            result,
            Err(Error::InsufficientBalance {
                balance: 30.0,
                change: -40.0
            })
        );
        assert_eq!(balance(&fixture), 30.0);
        assert_eq!(
            get_transaction(transaction.id, &fixture.connection),
            Ok(transaction)
        );
    }

    #[test]
    fn edit_rejects_shrinking_spent_income() {
        let fixture = fixture(0.0);
        let income = create_transaction(
            new_transaction(&fixture, TransactionType::Income, 100.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();
        create_transaction(
            new_transaction(&fixture, TransactionType::Expense, 80.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        let result = edit_transaction(
            income.id,
            update(&fixture, TransactionType::Income, 50.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        );

        assert!(matches!(result, Err(Error::InsufficientBalance { .. })));
        assert_eq!(balance(&fixture), 20.0);
        assert_balance_matches_history(&fixture);
    }

    #[test]
    fn create_rejects_amounts_too_large_to_store() {
        let fixture = fixture(10.0);

        for value in [1e307, f64::MAX, f64::INFINITY] {
            let result = create_transaction(
                new_transaction(&fixture, TransactionType::Income, value),
                fixture.user_id,
                TODAY,
                &fixture.connection,
            );

            assert_eq!(result, Err(Error::AmountTooLarge(value)));
        }
        assert_eq!(balance(&fixture), 10.0);
        assert_eq!(transaction_count(&fixture), 0);
    }

    #[test]
    fn largest_income_can_be_deleted_again() {
        let fixture = fixture(10.0);
        let income = create_transaction(
            new_transaction(&fixture, TransactionType::Income, MAX_AMOUNT),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();
        assert_balance_matches_history(&fixture);

        delete_transaction(income.id, fixture.user_id, &fixture.connection).unwrap();

        assert_eq!(balance(&fixture), 10.0);
        assert_balance_matches_history(&fixture);
    }

    #[test]
    fn edit_rejects_amounts_too_large_to_store() {
        let fixture = fixture(10.0);
        let transaction = create_transaction(
            new_transaction(&fixture, TransactionType::Income, 5.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        let result = edit_transaction(
            transaction.id,
            update(&fixture, TransactionType::Income, 1e307),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        );

        assert_eq!(result, Err(Error::AmountTooLarge(1e307)));
        assert_eq!(balance(&fixture), 15.0);
        assert_eq!(
            get_transaction(transaction.id, &fixture.connection),
            Ok(transaction)
        );
    }

    #[test]
    fn edit_missing_transaction_fails() {
        let fixture = fixture(0.0);

        let result = edit_transaction(
            42,
            update(&fixture, TransactionType::Income, 1.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        );

        assert_eq!(result, Err(Error::UpdateMissing("transaction")));
    }

    #[test]
    fn edit_rejects_other_user() {
        let fixture = fixture(10.0);
        let intruder = create_test_user("intruder@bar.baz", &fixture.connection);
        let transaction = create_transaction(
            new_transaction(&fixture, TransactionType::Income, 1.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        let result = edit_transaction(
            transaction.id,
            update(&fixture, TransactionType::Income, 1000.0),
            intruder,
            TODAY,
            &fixture.connection,
        );

        assert_eq!(result, Err(Error::InvalidWallet));
        assert_eq!(balance(&fixture), 11.0);
    }

    #[test]
    fn delete_reverses_effect() {
        let fixture = fixture(10.0);
        let transaction = create_transaction(
            new_transaction(&fixture, TransactionType::Expense, 4.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        delete_transaction(transaction.id, fixture.user_id, &fixture.connection).unwrap();

        assert_eq!(balance(&fixture), 10.0);
        assert_eq!(
            get_transaction(transaction.id, &fixture.connection),
            Err(Error::NotFound)
        );
        assert_balance_matches_history(&fixture);
    }

    #[test]
    fn delete_rejects_removing_spent_income() {
        let fixture = fixture(0.0);
        let income = create_transaction(
            new_transaction(&fixture, TransactionType::Income, 10.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();
        create_transaction(
            new_transaction(&fixture, TransactionType::Expense, 5.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();

        let result = delete_transaction(income.id, fixture.user_id, &fixture.connection);

        assert_eq!(
            result,
            Err(Error::InsufficientBalance {
                balance: 5.0,
                change: -10.0
            })
        );
        assert_eq!(transaction_count(&fixture), 2);
        assert_balance_matches_history(&fixture);
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let fixture = fixture(0.0);

        assert_eq!(
            delete_transaction(1, fixture.user_id, &fixture.connection),
            Err(Error::DeleteMissing("transaction"))
        );
    }

    #[test]
    fn transactions_of_inactive_wallets_cannot_change() {
        let fixture = fixture(10.0);
        let transaction = create_transaction(
            new_transaction(&fixture, TransactionType::Income, 1.0),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();
        deactivate_wallet(fixture.wallet.id, fixture.user_id, &fixture.connection).unwrap();

        assert_eq!(
            delete_transaction(transaction.id, fixture.user_id, &fixture.connection),
            Err(Error::InvalidWallet)
        );
        assert_eq!(transaction_count(&fixture), 1);
    }

    #[test]
    fn balance_matches_history_after_many_changes() {
        let fixture = fixture(25.5);
        let mut ids = Vec::new();

        for (type_, value) in [
            (TransactionType::Income, 0.1),
            (TransactionType::Income, 0.2),
            (TransactionType::Expense, 10.33),
            (TransactionType::Income, 100.0),
            (TransactionType::Expense, 0.07),
        ] {
            ids.push(
                create_transaction(
                    new_transaction(&fixture, type_, value),
                    fixture.user_id,
                    TODAY,
                    &fixture.connection,
                )
                .unwrap()
                .id,
            );
            assert_balance_matches_history(&fixture);
        }

        edit_transaction(
            ids[2],
            update(&fixture, TransactionType::Expense, 3.5),
            fixture.user_id,
            TODAY,
            &fixture.connection,
        )
        .unwrap();
        assert_balance_matches_history(&fixture);

        delete_transaction(ids[4], fixture.user_id, &fixture.connection).unwrap();
        assert_balance_matches_history(&fixture);

        let wallet = get_wallet(fixture.wallet.id, &fixture.connection).unwrap();
        assert_eq!(wallet.current_balance, 122.3);
    }
}
