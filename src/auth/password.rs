//! Password strength checks and bcrypt hashes.

use std::fmt;

use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A plain text password strong enough to be hashed and stored.
#[derive(Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check that zxcvbn scores `password` at least three out of four.
    ///
    /// `user_inputs` are words the password is penalised for containing,
    /// such as the account's username and email.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] carrying zxcvbn's advice.
    pub fn new(password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        let entropy = zxcvbn(password, user_inputs);

        if entropy.score() >= Score::Three {
            return Ok(Self(password.to_owned()));
        }

        let advice = entropy
            .feedback()
            .map(ToString::to_string)
            .unwrap_or_default();

        Err(Error::TooWeak(advice))
    }

    /// Skip the strength check, e.g. for seeding test data.
    pub fn new_unchecked(password: &str) -> Self {
        Self(password.to_owned())
    }
}

impl fmt::Debug for ValidatedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidatedPassword(********)")
    }
}

/// A salted bcrypt hash as stored in the user table.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used outside of tests.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt rejects the cost.
    pub fn new(password: &ValidatedPassword, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read back from the database.
    pub fn new_unchecked(hash: &str) -> Self {
        Self(hash.to_owned())
    }

    /// Whether `password` is the one this hash was made from.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, password: &str) -> Result<bool, Error> {
        bcrypt::verify(password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod password_tests {
    use crate::{Error, PasswordHash, ValidatedPassword};

    #[test]
    fn short_and_common_passwords_are_too_weak() {
        for password in ["", "imtooshort", "password1234"] {
            assert!(
                matches!(ValidatedPassword::new(password, &[]), Err(Error::TooWeak(_))),
                "want {password:?} rejected"
            );
        }
    }

    #[test]
    fn password_matching_the_username_is_too_weak() {
        let username = "kq7vz8wxj2lm";
        assert!(ValidatedPassword::new(username, &[]).is_ok());

        let result = ValidatedPassword::new(username, &[username, "kq7vz8wxj2lm@example.com"]);

        assert!(matches!(result, Err(Error::TooWeak(_))), "got {result:?}");
    }

    #[test]
    fn debug_output_hides_password() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        assert!(!format!("{password:?}").contains("hunter2"));
    }

    #[test]
    fn hash_verifies_only_its_own_password() {
        let password = ValidatedPassword::new("roostersgocockledoodledoo", &[]).unwrap();

        let hash = PasswordHash::new(&password, 4).unwrap();

        assert_eq!(hash.verify("roostersgocockledoodledoo"), Ok(true));
        assert_eq!(hash.verify("roostersgocockledoodledon't"), Ok(false));
        assert_ne!(PasswordHash::new(&password, 4).unwrap(), hash);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hash = PasswordHash::new_unchecked("not a bcrypt hash");

        assert!(matches!(hash.verify("anything"), Err(Error::HashingError(_))));
    }
}
