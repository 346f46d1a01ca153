//! Monthly aggregates over the user's transactions and wallets.

use rusqlite::Connection;
use time::Month;

use crate::{Error, UserID, amount::round_to_cents};

/// A calendar month of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    /// The month to report on.
    pub month: Month,
    /// The calendar year, between 1 and 9999.
    pub year: i32,
}

impl ReportPeriod {
    /// The `YYYY-MM` prefix shared by every date stored in this month.
    fn date_prefix(&self) -> String {
        format!("{:04}-{:02}", self.year, u8::from(self.month))
    }
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryExpense {
    /// The category name.
    pub category: String,
    /// The sum of the category's expenses, rounded to cents.
    pub total: f64,
}

/// Income and expenses over a month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlySummary {
    /// The sum of all income in the month.
    pub income: f64,
    /// The sum of all expenses in the month.
    pub expense: f64,
    /// Income minus expense.
    pub balance: f64,
}

/// Sum the user's expenses in `period` by category name, largest first.
///
/// Transactions of deactivated wallets are included.
pub fn get_expenses_by_category(
    user_id: UserID,
    period: ReportPeriod,
    connection: &Connection,
) -> Result<Vec<CategoryExpense>, Error> {
    connection
        .prepare(
            "SELECT category.name, SUM(\"transaction\".value) AS total
            FROM \"transaction\"
            INNER JOIN category ON category.id = \"transaction\".category_id
            INNER JOIN wallet ON wallet.id = \"transaction\".wallet_id
            WHERE wallet.user_id = :user_id
                AND \"transaction\".type = 'expense'
                AND strftime('%Y-%m', \"transaction\".created_at) = :month
            GROUP BY category.name
            ORDER BY total DESC, category.name ASC",
        )?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":month": period.date_prefix(),
            },
            |row| {
                Ok(CategoryExpense {
                    category: row.get(0)?,
                    total: round_to_cents(row.get(1)?),
                })
            },
        )?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Total the user's income and expenses in `period`.
///
/// Transactions of deactivated wallets are included.
pub fn get_monthly_summary(
    user_id: UserID,
    period: ReportPeriod,
    connection: &Connection,
) -> Result<MonthlySummary, Error> {
    let (income, expense): (f64, f64) = connection
        .prepare(
            "SELECT
                COALESCE(SUM(CASE WHEN \"transaction\".type = 'income' THEN \"transaction\".value END), 0),
                COALESCE(SUM(CASE WHEN \"transaction\".type = 'expense' THEN \"transaction\".value END), 0)
            FROM \"transaction\"
            INNER JOIN wallet ON wallet.id = \"transaction\".wallet_id
            WHERE wallet.user_id = :user_id
                AND strftime('%Y-%m', \"transaction\".created_at) = :month",
        )?
        .query_row(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":month": period.date_prefix(),
            },
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

    let income = round_to_cents(income);
    let expense = round_to_cents(expense);

    Ok(MonthlySummary {
        income,
        expense,
        balance: round_to_cents(income - expense),
    })
}

/// The sum of the current balances of the user's active wallets, zero if there are none.
pub fn get_consolidated_wallet_balance(
    user_id: UserID,
    connection: &Connection,
) -> Result<f64, Error> {
    let total: f64 = connection.query_row(
        "SELECT COALESCE(SUM(current_balance), 0) FROM wallet
        WHERE user_id = ?1 AND is_active = 1",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;

    Ok(round_to_cents(total))
}
