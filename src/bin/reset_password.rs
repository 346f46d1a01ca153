//! Sets a new password for a registered user.

use std::{error::Error, io, path::PathBuf, process::exit};

use clap::Parser;
use rusqlite::Connection;

use pocketbook::{
    PasswordHash, User, ValidatedPassword, get_user_by_email, update_password,
};

/// A utility for changing the password of a registered user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// The email the user registered with.
    #[arg(long)]
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if !args.db_path.is_file() {
        fail(format!("No database file at {}", args.db_path.display()));
    }

    let connection = Connection::open(&args.db_path)?;
    let user = get_user_by_email(&args.email, &connection).unwrap_or_else(|error| {
        fail(format!("Could not find a user with the email {}: {error}", args.email))
    });
    println!("Resetting password for {}", user.email);

    let Some(password) = ask_for_new_password(&user) else {
        return Ok(());
    };

    let password_hash = PasswordHash::new(&password, PasswordHash::DEFAULT_COST)?;
    update_password(user.id, &password_hash, &connection)?;
    println!("Password updated.");

    Ok(())
}

/// Ask until a strong password is entered twice, or `None` once input runs out.
fn ask_for_new_password(user: &User) -> Option<ValidatedPassword> {
    loop {
        println!();
        let password = read_password("New password: ")?;

        let validated = match ValidatedPassword::new(&password, &[&user.username, &user.email]) {
            Ok(validated) => validated,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        if read_password("Repeat the new password: ")? == password {
            return Some(validated);
        }

        print_error("The passwords differ, try again.");
    }
}

fn read_password(prompt: &str) -> Option<String> {
    rpassword::prompt_password(prompt)
        .map_err(|error| {
            if error.kind() != io::ErrorKind::UnexpectedEof {
                print_error(format!("Could not read the password: {error}"));
            }
        })
        .ok()
}

fn print_error(message: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", message.to_string());
}

fn fail(message: String) -> ! {
    print_error(message);
    exit(1)
}
