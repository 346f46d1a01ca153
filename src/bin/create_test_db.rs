use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use pocketbook::{
    CategoryName, NewGoal, NewTransaction, ObjectiveDetails, PasswordHash, TransactionType,
    ValidatedPassword, WalletName, create_category, create_goal, create_objective,
    create_transaction, create_user, create_wallet, initialize_db,
};

/// A utility for creating a test database for pocketbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test user...");
    let password_hash = PasswordHash::new(
        &ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("Test", "test@example.com", password_hash, &connection)?;

    println!("Creating wallets and categories...");
    let cash = create_wallet(WalletName::new("Cash")?, 150.0, user.id, &connection)?;
    let bank = create_wallet(WalletName::new("Bank")?, 2400.0, user.id, &connection)?;
    let food = create_category(CategoryName::new("Food")?, user.id, &connection)?;
    let rent = create_category(CategoryName::new("Rent")?, user.id, &connection)?;
    let salary = create_category(CategoryName::new("Salary")?, user.id, &connection)?;

    println!("Creating transactions...");
    let today = OffsetDateTime::now_utc().date();
    let transactions = [
        (TransactionType::Income, 3200.0, 20, bank.id, salary.id, "Monthly pay"),
        (TransactionType::Expense, 1400.0, 18, bank.id, rent.id, "Rent"),
        (TransactionType::Expense, 86.4, 12, bank.id, food.id, "Groceries"),
        (TransactionType::Expense, 12.5, 3, cash.id, food.id, "Lunch"),
        (TransactionType::Expense, 45.0, 1, cash.id, food.id, "Takeaways"),
    ];

    for (type_, value, days_ago, wallet_id, category_id, description) in transactions {
        create_transaction(
            NewTransaction {
                type_,
                value,
                created_at: today - Duration::days(days_ago),
                description: description.to_owned(),
                wallet_id,
                category_id,
            },
            user.id,
            today,
            &connection,
        )?;
    }

    println!("Creating a goal and an objective...");
    create_goal(
        NewGoal {
            name: "Eating out".to_owned(),
            target_amount: 150.0,
            deadline: None,
            category_id: Some(food.id),
        },
        user.id,
        today - Duration::days(30),
        &connection,
    )?;
    create_objective(
        ObjectiveDetails {
            name: "Emergency fund".to_owned(),
            target_amount: 10_000.0,
            due_date: Some(today + Duration::days(365)),
            wallet_id: Some(bank.id),
            icon: Some("🛟".to_owned()),
        },
        user.id,
        &connection,
    )?;

    println!("Success! Log in with test@example.com and the password 'test'.");

    Ok(())
}
