//! Normalisation of user entered names.

use crate::Error;

/// Trim surrounding whitespace from `raw` and reject empty names.
///
/// `kind` names the item in the error message, e.g. "Goal".
pub fn trimmed_name(raw: &str, kind: &'static str) -> Result<String, Error> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(Error::EmptyName(kind));
    }

    Ok(name.to_owned())
}

/// Trim `raw` and capitalise it: the first character upper case, the rest
/// lower case.
pub fn capitalised_name(raw: &str, kind: &'static str) -> Result<String, Error> {
    let name = trimmed_name(raw, kind)?;
    let mut chars = name.chars();

    Ok(match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => name,
    })
}
