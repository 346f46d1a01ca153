//! The app's error type, rendered either as a full page or as an htmx alert.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::{Date, Duration};

use crate::{
    alert::Alert,
    amount::MAX_AMOUNT,
    error_pages::{ForbiddenPage, InternalServerErrorPage, NotFoundPage},
    html::format_currency,
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request carried no session cookie.
    #[error("the session cookie is missing")]
    CookieMissing,

    /// A session of this length would end past the largest representable date.
    #[error("a session of {0} cannot be represented")]
    SessionTooLong(Duration),

    #[error("could not encode the session: {0}")]
    SessionEncoding(String),

    /// zxcvbn scored the password below three. Holds its advice.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// bcrypt failed. The message is for the server log only.
    #[error("hashing failed: {0}")]
    HashingError(String),

    #[error("{0} is not a valid email address")]
    InvalidEmail(String),

    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The item exists but another user owns it.
    #[error("the requested resource belongs to another user")]
    Forbidden,

    /// Holds the kind of item, e.g. "Wallet".
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),

    /// Wallet names are unique per user, inactive wallets included.
    #[error("the wallet \"{0}\" already exists")]
    DuplicateWalletName(String),

    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// The name belongs to a system category.
    #[error("the category name \"{0}\" is reserved")]
    ReservedCategoryName(String),

    /// Only active goals need unique names.
    #[error("the goal \"{0}\" already exists")]
    DuplicateGoalName(String),

    /// Zero, negative or not finite.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    #[error("{0} is not a valid initial balance, it cannot be negative")]
    NegativeInitialBalance(f64),

    /// Above [MAX_AMOUNT].
    #[error("{0} is not a valid amount, amounts cannot be more than one trillion")]
    AmountTooLarge(f64),

    /// The wallet would go below zero.
    #[error("the wallet balance {balance} cannot cover a change of {change}")]
    InsufficientBalance {
        /// The wallet balance before the change.
        balance: f64,
        /// The signed change to the balance.
        change: f64,
    },

    /// Missing, inactive or owned by another user.
    #[error("the wallet is not available")]
    InvalidWallet,

    #[error("the category is not available")]
    InvalidCategory,

    #[error("the category is used by one or more transactions")]
    CategoryInUse,

    /// Transactions cannot be dated after today.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// Also what a query that returns no rows maps to.
    #[error("the requested resource could not be found")]
    NotFound,

    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Not a canonical timezone name such as "Pacific/Auckland".
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Holds the kind of item, e.g. "goal".
    #[error("tried to update a {0} that is not in the database")]
    UpdateMissing(&'static str),

    /// Holds the kind of item, e.g. "goal".
    #[error("tried to delete a {0} that is not in the database")]
    DeleteMissing(&'static str),
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        if let rusqlite::Error::QueryReturnedNoRows = error {
            return Error::NotFound;
        }

        tracing::error!("unhandled SQL error: {error}");
        Error::SqlError(error)
    }
}

const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;

fn has_extended_code(error: &rusqlite::Error, code: i32) -> bool {
    matches!(error, rusqlite::Error::SqliteFailure(failure, _) if failure.extended_code == code)
}

pub(crate) fn is_unique_violation(error: &rusqlite::Error) -> bool {
    has_extended_code(error, SQLITE_CONSTRAINT_UNIQUE)
}

pub(crate) fn is_foreign_key_violation(error: &rusqlite::Error) -> bool {
    has_extended_code(error, SQLITE_CONSTRAINT_FOREIGNKEY)
}

fn timezone_fix(timezone: &str) -> String {
    format!(
        "The server timezone \"{timezone}\" is not recognised. \
        Set it to a canonical name such as \"Pacific/Auckland\"."
    )
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::InvalidWallet => NotFoundPage.into_response(),
            Error::Forbidden => ForbiddenPage.into_response(),
            Error::InvalidTimezone(timezone) => InternalServerErrorPage {
                description: "Invalid Timezone Settings",
                fix: &timezone_fix(&timezone),
            }
            .into_response(),
            error => {
                tracing::error!("unexpected error: {error}");
                InternalServerErrorPage::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for htmx to swap into the page.
    ///
    /// Errors the user cannot act on are logged and shown as a generic
    /// "Something went wrong" alert.
    pub fn into_alert_response(self) -> Response {
        use StatusCode as S;

        let (status, message, details): (StatusCode, String, String) = match self {
            Error::InvalidTimezone(timezone) => (
                S::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings".into(),
                timezone_fix(&timezone),
            ),
            Error::FutureDate(date) => (
                S::BAD_REQUEST,
                "Invalid transaction date".into(),
                format!("{date} is in the future. Pick today or an earlier date."),
            ),
            Error::InvalidAmount(amount) => (
                S::BAD_REQUEST,
                "Invalid amount".into(),
                format!("{amount} is not valid, enter an amount greater than zero."),
            ),
            Error::NegativeInitialBalance(amount) => (
                S::BAD_REQUEST,
                "Invalid initial balance".into(),
                format!(
                    "{} is not valid, the initial balance cannot be negative.",
                    format_currency(amount)
                ),
            ),
            Error::AmountTooLarge(amount) => (
                S::BAD_REQUEST,
                "Invalid amount".into(),
                format!(
                    "{amount} is too large, enter an amount of at most {}.",
                    format_currency(MAX_AMOUNT)
                ),
            ),
            Error::InsufficientBalance { balance, change } => (
                S::BAD_REQUEST,
                "Insufficient balance".into(),
                format!(
                    "The wallet has {} available, which cannot cover {}.",
                    format_currency(balance),
                    format_currency(change.abs())
                ),
            ),
            Error::EmptyName(kind) => (
                S::BAD_REQUEST,
                format!("Invalid {} name", kind.to_lowercase()),
                format!("{kind} name cannot be empty."),
            ),
            Error::InvalidWallet => (
                S::BAD_REQUEST,
                "Invalid wallet".into(),
                "The wallet could not be found or is no longer active.".into(),
            ),
            Error::InvalidCategory => (
                S::BAD_REQUEST,
                "Invalid category".into(),
                "Choose one of your own categories.".into(),
            ),
            Error::CategoryInUse => (
                S::BAD_REQUEST,
                "Could not delete category".into(),
                "Transactions still use this category. Move them to another category first."
                    .into(),
            ),
            Error::Forbidden => (
                S::FORBIDDEN,
                "Access denied".into(),
                "You do not have permission to change this item.".into(),
            ),
            Error::NotFound => (
                S::NOT_FOUND,
                "Not found".into(),
                "The requested item could not be found.".into(),
            ),
            Error::UpdateMissing(item) => (
                S::NOT_FOUND,
                format!("Could not update {item}"),
                format!("The {item} could not be found. It may have been deleted."),
            ),
            Error::DeleteMissing(item) => (
                S::NOT_FOUND,
                format!("Could not delete {item}"),
                format!("The {item} could not be found. Refresh the page to check if it is already gone."),
            ),
            Error::DuplicateWalletName(name) => (
                S::BAD_REQUEST,
                "Duplicate Wallet Name".into(),
                format!("You already have a wallet called {name}. Pick another name."),
            ),
            Error::DuplicateCategoryName(name) => (
                S::BAD_REQUEST,
                "Duplicate Category Name".into(),
                format!("You already have a category called {name}. Pick another name."),
            ),
            Error::ReservedCategoryName(name) => (
                S::BAD_REQUEST,
                "Reserved Category Name".into(),
                format!("{name} is used by the system. Pick another name."),
            ),
            Error::DuplicateGoalName(name) => (
                S::BAD_REQUEST,
                "Duplicate Goal Name".into(),
                format!("You already have an active goal called {name}. Pick another name."),
            ),
            error => {
                tracing::error!("unexpected error: {error}");
                (
                    S::INTERNAL_SERVER_ERROR,
                    "Something went wrong".into(),
                    "Check the server logs for details.".into(),
                )
            }
        };

        (status, Alert::Error { message, details }.into_html()).into_response()
    }
}
