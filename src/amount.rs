//! Validation and rounding of monetary amounts.

use crate::Error;

/// The largest amount a transaction, initial balance or target may hold.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Round `amount` to the nearest cent.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Round `amount` to cents and check that it is greater than zero.
///
/// # Errors
///
/// - [Error::InvalidAmount] if the rounded amount is zero, negative or not a number.
/// - [Error::AmountTooLarge] if the rounded amount is above [MAX_AMOUNT].
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    let rounded = check_upper_bound(amount)?;

    if rounded.is_nan() || rounded <= 0.0 {
        return Err(Error::InvalidAmount(amount));
    }

    Ok(rounded)
}

/// Round `amount` to cents and check that it is not negative.
///
/// # Errors
///
/// - [Error::NegativeInitialBalance] if the rounded amount is negative or not a number.
/// - [Error::AmountTooLarge] if the rounded amount is above [MAX_AMOUNT].
pub fn validate_initial_balance(amount: f64) -> Result<f64, Error> {
    let rounded = check_upper_bound(amount)?;

    if rounded.is_nan() || rounded < 0.0 {
        return Err(Error::NegativeInitialBalance(amount));
    }

    // Avoid storing "-0".
    Ok(rounded.abs())
}

fn check_upper_bound(amount: f64) -> Result<f64, Error> {
    let rounded = round_to_cents(amount);

    // Rounding overflows to infinity for very large inputs.
    if rounded > MAX_AMOUNT {
        return Err(Error::AmountTooLarge(amount));
    }

    Ok(rounded)
}
