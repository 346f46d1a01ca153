//! Spending goals and their progress.

use rusqlite::{Connection, OptionalExtension, Row};
use time::Date;

use crate::{
    Error, UserID,
    amount::{round_to_cents, validate_amount},
    category::get_category,
    database_id::{CategoryId, GoalId},
    error::is_unique_violation,
    name::trimmed_name,
};

/// Progress at or above this percentage of the target is a warning.
const WARNING_PERCENTAGE: f64 = 80.0;

/// A ceiling on spending, optionally limited to one category and a deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    /// The ID of the goal.
    pub id: GoalId,
    /// The display name of the goal.
    pub name: String,
    /// The most the user wants to spend.
    pub target_amount: f64,
    /// Expenses are counted from this date.
    pub created_at: Date,
    /// Expenses are counted up to and including this date.
    pub deadline: Option<Date>,
    /// Goals become inactive when deleted or once their deadline passes.
    pub is_active: bool,
    /// The user that owns the goal.
    pub user_id: UserID,
    /// The tracked category, `None` tracks every category.
    pub category_id: Option<CategoryId>,
}

/// The details for creating a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    /// The display name, unique among the user's active goals.
    pub name: String,
    /// The spending limit, must be greater than zero.
    pub target_amount: f64,
    /// The goal expires once this date is reached.
    pub deadline: Option<Date>,
    /// Only count expenses in this category, all categories if `None`.
    pub category_id: Option<CategoryId>,
}

/// How close spending is to a goal's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    /// Less than 80% of the target has been spent.
    Safe,
    /// Between 80% and 100% of the target has been spent.
    Warning,
    /// More than the target has been spent.
    Danger,
}

impl GoalStatus {
    fn from_percentage(percentage: f64) -> Self {
        if percentage > 100.0 {
            GoalStatus::Danger
        } else if percentage >= WARNING_PERCENTAGE {
            GoalStatus::Warning
        } else {
            GoalStatus::Safe
        }
    }

    /// The lowercase name used in `data-status` attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Safe => "safe",
            GoalStatus::Warning => "warning",
            GoalStatus::Danger => "danger",
        }
    }
}

/// A goal with the spending counted against it.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    /// The goal being tracked.
    pub goal: Goal,
    /// The name of the tracked category, `None` when tracking all categories.
    pub category_name: Option<String>,
    /// The sum of matching expenses.
    pub current: f64,
    /// The share of the target spent, capped at 100.
    pub percentage: f64,
    /// The share of the target spent, uncapped.
    pub real_percentage: f64,
    /// The target minus current spending, negative once overspent.
    pub remaining: f64,
    /// Derived from the uncapped percentage.
    pub status: GoalStatus,
}

impl GoalProgress {
    fn new(goal: Goal, category_name: Option<String>, current: f64) -> Self {
        let current = round_to_cents(current);
        let real_percentage = current / goal.target_amount * 100.0;

        Self {
            category_name,
            current,
            percentage: real_percentage.min(100.0),
            real_percentage,
            remaining: round_to_cents(goal.target_amount - current),
            status: GoalStatus::from_percentage(real_percentage),
            goal,
        }
    }
}

/// Create the goal table.
///
/// Deleting the tracked category makes a goal track all categories.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS goal (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL COLLATE NOCASE,
            target_amount REAL NOT NULL CHECK(target_amount > 0),
            created_at TEXT NOT NULL,
            deadline TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            user_id INTEGER NOT NULL,
            category_id INTEGER,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_goal_user_id ON goal(user_id);",
    )
}

const GOAL_COLUMNS: &str =
    "id, name, target_amount, created_at, deadline, is_active, user_id, category_id";

fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    Ok(Goal {
        id: row.get(0)?,
        name: row.get(1)?,
        target_amount: row.get(2)?,
        created_at: row.get(3)?,
        deadline: row.get(4)?,
        is_active: row.get(5)?,
        user_id: UserID::new(row.get(6)?),
        category_id: row.get(7)?,
    })
}

/// Check that `category_id` is one of the user's own categories.
///
/// System categories cannot be tracked by goals.
fn validate_category(
    category_id: Option<CategoryId>,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let Some(category_id) = category_id else {
        return Ok(());
    };

    match get_category(category_id, connection) {
        Ok(category) if category.user_id == Some(user_id) => Ok(()),
        Ok(_) | Err(Error::NotFound) => Err(Error::InvalidCategory),
        Err(error) => Err(error),
    }
}

fn map_unique_violation(error: rusqlite::Error, name: &str) -> Error {
    if is_unique_violation(&error) {
        Error::DuplicateGoalName(name.to_owned())
    } else {
        error.into()
    }
}

/// Create a goal, or bring back an inactive goal with the same name.
///
/// A reactivated goal takes the new target, deadline and category and starts
/// counting expenses from `today`.
///
/// # Errors
///
/// - [Error::EmptyName] if the name is blank.
/// - [Error::InvalidAmount] if the target is not greater than zero.
/// - [Error::InvalidCategory] if the category is not one of the user's categories.
/// - [Error::DuplicateGoalName] if the user has an active goal with this name.
pub fn create_goal(
    new_goal: NewGoal,
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<Goal, Error> {
    let name = trimmed_name(&new_goal.name, "Goal")?;
    let target_amount = validate_amount(new_goal.target_amount)?;
    validate_category(new_goal.category_id, user_id, connection)?;

    let existing: Option<(GoalId, bool)> = connection
        .query_row(
            "SELECT id, is_active FROM goal WHERE user_id = ?1 AND name = ?2",
            (user_id.as_i64(), &name),
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let id = match existing {
        Some((_, true)) => return Err(Error::DuplicateGoalName(name)),
        Some((id, false)) => {
            connection.execute(
                "UPDATE goal
                SET is_active = 1, name = ?1, target_amount = ?2, deadline = ?3,
                    category_id = ?4, created_at = ?5
                WHERE id = ?6",
                (
                    &name,
                    target_amount,
                    new_goal.deadline,
                    new_goal.category_id,
                    today,
                    id,
                ),
            )?;
            tracing::info!("Reactivated goal {id} for user {user_id}");
            id
        }
        None => {
            connection
                .execute(
                    "INSERT INTO goal (name, target_amount, created_at, deadline, user_id, category_id)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    (
                        &name,
                        target_amount,
                        today,
                        new_goal.deadline,
                        user_id.as_i64(),
                        new_goal.category_id,
                    ),
                )
                .map_err(|error| map_unique_violation(error, &name))?;
            connection.last_insert_rowid()
        }
    };

    Ok(Goal {
        id,
        name,
        target_amount,
        created_at: today,
        deadline: new_goal.deadline,
        is_active: true,
        user_id,
        category_id: new_goal.category_id,
    })
}

/// Get one of the user's active goals.
///
/// Other users' goals and inactive goals are reported as [Error::NotFound].
pub fn get_active_goal(
    id: GoalId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Goal, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goal
            WHERE id = :id AND user_id = :user_id AND is_active = 1"
        ))?
        .query_row(&[(":id", &id), (":user_id", &user_id.as_i64())], map_goal_row)
        .map_err(Error::from)
}

/// Get the user's active goals ordered by name.
pub fn get_active_goals(user_id: UserID, connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goal
            WHERE user_id = :user_id AND is_active = 1
            ORDER BY name ASC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(Error::from))
        .collect()
}

/// Deactivate the user's active goals whose deadline is on or before `today`.
///
/// Returns the number of goals that expired.
pub fn expire_goals(user_id: UserID, today: Date, connection: &Connection) -> Result<usize, Error> {
    let expired = connection.execute(
        "UPDATE goal SET is_active = 0
        WHERE user_id = ?1 AND is_active = 1 AND deadline IS NOT NULL AND deadline <= ?2",
        (user_id.as_i64(), today),
    )?;

    if expired > 0 {
        tracing::info!("Expired {expired} goal(s) for user {user_id}");
    }

    Ok(expired)
}

/// Change the name and target of an active goal.
///
/// # Errors
///
/// - [Error::EmptyName] if the name is blank.
/// - [Error::InvalidAmount] if the target is not greater than zero.
/// - [Error::DuplicateGoalName] if the user has another goal with this name.
/// - [Error::UpdateMissing] if the user has no active goal with `id`.
pub fn edit_goal(
    id: GoalId,
    name: &str,
    target_amount: f64,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let name = trimmed_name(name, "Goal")?;
    let target_amount = validate_amount(target_amount)?;

    let rows_affected = connection
        .execute(
            "UPDATE goal SET name = ?1, target_amount = ?2
            WHERE id = ?3 AND user_id = ?4 AND is_active = 1",
            (&name, target_amount, id, user_id.as_i64()),
        )
        .map_err(|error| map_unique_violation(error, &name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissing("goal"));
    }

    Ok(())
}

/// Deactivate one of the user's active goals.
///
/// # Errors
///
/// Returns [Error::DeleteMissing] if the user has no active goal with `id`.
pub fn delete_goal(id: GoalId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE goal SET is_active = 0 WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissing("goal"));
    }

    Ok(())
}

/// Sum the user's expenses that count towards `goal`.
fn sum_goal_expenses(goal: &Goal, connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row(
            "SELECT COALESCE(SUM(\"transaction\".value), 0)
            FROM \"transaction\"
            INNER JOIN wallet ON wallet.id = \"transaction\".wallet_id
            WHERE wallet.user_id = ?1
                AND \"transaction\".type = 'expense'
                AND \"transaction\".created_at >= ?2
                AND (?3 IS NULL OR \"transaction\".created_at <= ?3)
                AND (?4 IS NULL OR \"transaction\".category_id = ?4)",
            (
                goal.user_id.as_i64(),
                goal.created_at,
                goal.deadline,
                goal.category_id,
            ),
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Get the user's active goals with the spending counted against each.
pub fn get_goals_progress(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<GoalProgress>, Error> {
    get_active_goals(user_id, connection)?
        .into_iter()
        .map(|goal| -> Result<GoalProgress, Error> {
            let category_name = match goal.category_id {
                Some(category_id) => Some(get_category(category_id, connection)?.name.to_string()),
                None => None,
            };
            let current = sum_goal_expenses(&goal, connection)?;

            Ok(GoalProgress::new(goal, category_name, current))
        })
        .collect()
}


#[cfg(test)]
mod goal_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, UserID,
        category::{CategoryName, create_category, delete_category, get_system_categories},
        test_utils::{create_test_user, get_test_connection},
        transaction::{NewTransaction, TransactionType, create_transaction},
        wallet::{WalletName, create_wallet},
    };

    use super::{
        GoalStatus, NewGoal, create_goal, delete_goal, edit_goal, expire_goals, get_active_goal,
        get_active_goals, get_goals_progress,
    };

    fn new_goal(name: &str, target_amount: f64) -> NewGoal {
        NewGoal {
            name: name.to_owned(),
            target_amount,
            deadline: None,
            category_id: None,
        }
    }

    fn setup() -> (Connection, UserID) {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", &connection);
        (connection, user_id)
    }

    #[test]
    fn create_goal_starts_today() {
        let (connection, user_id) = setup();
        let today = date!(2025 - 04 - 01);

        let goal = create_goal(new_goal(" Eating out ", 200.0), user_id, today, &connection)
            .unwrap();

        assert_eq!(goal.name, "Eating out");
        assert_eq!(goal.created_at, today);
        assert!(goal.is_active);
        assert_eq!(get_active_goal(goal.id, user_id, &connection), Ok(goal));
    }

    #[test]
    fn create_goal_rejects_duplicate_active_name() {
        let (connection, user_id) = setup();
        let today = date!(2025 - 04 - 01);
        create_goal(new_goal("Fuel", 100.0), user_id, today, &connection).unwrap();

        let result = create_goal(new_goal("fuel", 50.0), user_id, today, &connection);

        assert_eq!(result, Err(Error::DuplicateGoalName("fuel".to_owned())));
    }

    #[test]
    fn create_goal_reactivates_inactive_goal() {
        let (connection, user_id) = setup();
        let category =
            create_category(CategoryName::new_unchecked("Fuel"), user_id, &connection).unwrap();
        let old = create_goal(
            new_goal("Fuel", 100.0),
            user_id,
            date!(2025 - 01 - 01),
            &connection,
        )
        .unwrap();
        delete_goal(old.id, user_id, &connection).unwrap();

        let revived = create_goal(
            NewGoal {
                name: "Fuel".to_owned(),
                target_amount: 300.0,
                deadline: Some(date!(2025 - 12 - 31)),
                category_id: Some(category.id),
            },
            user_id,
            date!(2025 - 06 - 01),
            &connection,
        )
        .unwrap();

        assert_eq!(revived.id, old.id);
        let got = get_active_goal(old.id, user_id, &connection).unwrap();
        assert_eq!(got.target_amount, 300.0);
        assert_eq!(got.created_at, date!(2025 - 06 - 01));
        assert_eq!(got.deadline, Some(date!(2025 - 12 - 31)));
        assert_eq!(got.category_id, Some(category.id));
    }

    #[test]
    fn edit_goal_rejects_target_too_large_to_store() {
        let (connection, user_id) = setup();
        let today = date!(2025 - 04 - 01);
        let goal = create_goal(new_goal("Eating out", 200.0), user_id, today, &connection).unwrap();

        let result = edit_goal(goal.id, "Eating out", f64::MAX, user_id, &connection);

        assert_eq!(result, Err(Error::AmountTooLarge(f64::MAX)));
        let got = get_active_goal(goal.id, user_id, &connection).unwrap();
        assert_eq!(got.target_amount, 200.0);
    }

    #[test]
    fn create_goal_rejects_invalid_input() {
        let (connection, user_id) = setup();
        let other_user = create_test_user("other@bar.baz", &connection);
        let others_category =
            create_category(CategoryName::new_unchecked("Theirs"), other_user, &connection)
                .unwrap();
        let system_category = get_system_categories(&connection).unwrap().remove(0);
        let today = date!(2025 - 04 - 01);

        assert_eq!(
            create_goal(new_goal("  ", 10.0), user_id, today, &connection),
            Err(Error::EmptyName("Goal"))
        );
        assert_eq!(
            create_goal(new_goal("Zero", 0.0), user_id, today, &connection),
            Err(Error::InvalidAmount(0.0))
        );
        assert_eq!(
            create_goal(new_goal("Huge", 1e307), user_id, today, &connection),
            Err(Error::AmountTooLarge(1e307))
        );
        for category_id in [others_category.id, system_category.id, 999] {
            let goal = NewGoal {
                category_id: Some(category_id),
                ..new_goal("Mine", 10.0)
            };
            assert_eq!(
                create_goal(goal, user_id, today, &connection),
                Err(Error::InvalidCategory)
            );
        }
    }

    #[test]
    fn expire_goals_deactivates_goals_on_or_past_deadline() {
        let (connection, user_id) = setup();
        let created = date!(2025 - 01 - 01);
        let with_deadline = |name: &str, deadline| NewGoal {
            deadline,
            ..new_goal(name, 10.0)
        };
        create_goal(
            with_deadline("Past", Some(date!(2025 - 02 - 01))),
            user_id,
            created,
            &connection,
        )
        .unwrap();
        create_goal(
            with_deadline("Today", Some(date!(2025 - 03 - 01))),
            user_id,
            created,
            &connection,
        )
        .unwrap();
        create_goal(
            with_deadline("Future", Some(date!(2025 - 03 - 02))),
            user_id,
            created,
            &connection,
        )
        .unwrap();
        create_goal(with_deadline("Open", None), user_id, created, &connection).unwrap();

        let expired = expire_goals(user_id, date!(2025 - 03 - 01), &connection).unwrap();

        assert_eq!(expired, 2);
        let names = get_active_goals(user_id, &connection)
            .unwrap()
            .into_iter()
            .map(|goal| goal.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Future", "Open"]);
    }

    #[test]
    fn edit_goal_changes_name_and_target() {
        let (connection, user_id) = setup();
        let goal = create_goal(
            new_goal("Fuel", 100.0),
            user_id,
            date!(2025 - 01 - 01),
            &connection,
        )
        .unwrap();

        edit_goal(goal.id, "Petrol", 120.0, user_id, &connection).unwrap();

        let got = get_active_goal(goal.id, user_id, &connection).unwrap();
        assert_eq!(got.name, "Petrol");
        assert_eq!(got.target_amount, 120.0);
    }

    #[test]
    fn edit_and_delete_require_active_owned_goal() {
        let (connection, user_id) = setup();
        let other_user = create_test_user("other@bar.baz", &connection);
        let goal = create_goal(
            new_goal("Fuel", 100.0),
            user_id,
            date!(2025 - 01 - 01),
            &connection,
        )
        .unwrap();

        assert_eq!(
            edit_goal(goal.id, "Mine", 1.0, other_user, &connection),
            Err(Error::UpdateMissing("goal"))
        );
        assert_eq!(
            delete_goal(goal.id, other_user, &connection),
            Err(Error::DeleteMissing("goal"))
        );

        delete_goal(goal.id, user_id, &connection).unwrap();

        assert_eq!(
            edit_goal(goal.id, "Fuel", 1.0, user_id, &connection),
            Err(Error::UpdateMissing("goal"))
        );
        assert_eq!(
            delete_goal(goal.id, user_id, &connection),
            Err(Error::DeleteMissing("goal"))
        );
    }

    #[test]
    fn progress_counts_expenses_in_window_and_category() {
        let (connection, user_id) = setup();
        let wallet =
            create_wallet(WalletName::new_unchecked("Cash"), 1000.0, user_id, &connection)
                .unwrap();
        let food =
            create_category(CategoryName::new_unchecked("Food"), user_id, &connection).unwrap();
        let fun =
            create_category(CategoryName::new_unchecked("Fun"), user_id, &connection).unwrap();
        let today = date!(2025 - 05 - 31);
        let record = |type_, value, created_at, category_id| {
            create_transaction(
                NewTransaction {
                    type_,
                    value,
                    created_at,
                    description: String::new(),
                    wallet_id: wallet.id,
                    category_id,
                },
                user_id,
                today,
                &connection,
            )
            .unwrap();
        };
        // Before the goal started.
        record(TransactionType::Expense, 500.0, date!(2025 - 04 - 30), food.id);
        record(TransactionType::Expense, 70.0, date!(2025 - 05 - 01), food.id);
        record(TransactionType::Expense, 15.0, date!(2025 - 05 - 20), food.id);
        record(TransactionType::Expense, 40.0, date!(2025 - 05 - 10), fun.id);
        record(TransactionType::Income, 99.0, date!(2025 - 05 - 10), food.id);
        // After the deadline.
        record(TransactionType::Expense, 30.0, date!(2025 - 05 - 31), food.id);
        let goal_start = date!(2025 - 05 - 01);
        create_goal(
            NewGoal {
                name: "Food".to_owned(),
                target_amount: 100.0,
                deadline: Some(date!(2025 - 05 - 30)),
                category_id: Some(food.id),
            },
            user_id,
            goal_start,
            &connection,
        )
        .unwrap();
        create_goal(new_goal("Everything", 100.0), user_id, goal_start, &connection).unwrap();

        let progress = get_goals_progress(user_id, &connection).unwrap();

        assert_eq!(progress.len(), 2);
        let everything = &progress[0];
        assert_eq!(everything.category_name, None);
        assert_eq!(everything.current, 155.0);
        assert_eq!(everything.percentage, 100.0);
        assert_eq!(everything.real_percentage, 155.0);
        assert_eq!(everything.remaining, -55.0);
        assert_eq!(everything.status, GoalStatus::Danger);
        let food_goal = &progress[1];
        assert_eq!(food_goal.category_name.as_deref(), Some("Food"));
        assert_eq!(food_goal.current, 85.0);
        assert_eq!(food_goal.percentage, 85.0);
        assert_eq!(food_goal.remaining, 15.0);
        assert_eq!(food_goal.status, GoalStatus::Warning);
    }

    #[test]
    fn deleting_tracked_category_tracks_all_categories() {
        let (connection, user_id) = setup();
        let food =
            create_category(CategoryName::new_unchecked("Food"), user_id, &connection).unwrap();
        let goal = create_goal(
            NewGoal {
                category_id: Some(food.id),
                ..new_goal("Food", 100.0)
            },
            user_id,
            date!(2025 - 05 - 01),
            &connection,
        )
        .unwrap();

        delete_category(food.id, user_id, &connection).unwrap();

        let got = get_active_goal(goal.id, user_id, &connection).unwrap();
        assert_eq!(got.category_id, None);
    }
}
