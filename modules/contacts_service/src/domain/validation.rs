//! Field validation for incoming contact and account data

use crate::contract::{ContactDraft, ContactFilter, ContactsError};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .unwrap_or_else(|_| unreachable!("email pattern is a valid regex"))
});

pub const PASSWORD_MIN: usize = 4;
pub const PASSWORD_MAX: usize = 128;
pub const INFO_MAX: usize = 500;

/// Check a value's length in characters, inclusive on both ends
pub fn validate_length(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ContactsError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ContactsError::validation(format!(
            "{field} must be between {min} and {max} characters long"
        )));
    }
    Ok(())
}

pub fn validate_email(field: &str, value: &str) -> Result<(), ContactsError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ContactsError::validation(format!(
            "{field} is not a valid email address"
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ContactsError> {
    validate_length("password", password, PASSWORD_MIN, PASSWORD_MAX)
}

/// Validate all writable contact fields
pub fn validate_contact(draft: &ContactDraft) -> Result<(), ContactsError> {
    validate_length("first_name", &draft.first_name, 2, 50)?;
    validate_length("last_name", &draft.last_name, 2, 50)?;
    validate_length("email", &draft.email, 7, 100)?;
    validate_email("email", &draft.email)?;
    validate_length("phone_number", &draft.phone_number, 7, 20)?;
    if let Some(info) = &draft.info {
        validate_length("info", info, 0, INFO_MAX)?;
    }
    Ok(())
}

/// Offsets and page sizes are bound as signed 64-bit integers by the database driver
pub const PAGINATION_MAX: u64 = i64::MAX as u64;

pub fn validate_filter(filter: &ContactFilter) -> Result<(), ContactsError> {
    for (field, value) in [("skip", filter.skip), ("limit", filter.limit)] {
        if value > PAGINATION_MAX {
            return Err(ContactsError::validation(format!(
                "{field} must be at most {PAGINATION_MAX}"
            )));
        }
    }
    Ok(())
}
