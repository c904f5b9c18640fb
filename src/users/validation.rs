use lazy_static::lazy_static;
use regex::Regex;

use super::dto::CreateUserRequest;
use super::error::{UserError, UserResult};
use super::repo_types::UserChanges;

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// At least eight characters with an uppercase letter, a lowercase letter
/// and a digit. Whitespace is rejected.
pub(crate) fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && !password.chars().any(char::is_whitespace)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Gate applied before a user is created. Required fields are checked
/// first; the format checks stop at the first failure.
pub fn validate(user: &CreateUserRequest) -> UserResult<()> {
    if [
        &user.name,
        &user.surname,
        &user.username,
        &user.email,
        &user.password,
    ]
    .into_iter()
    .any(|f| blank(f))
    {
        return Err(UserError::AllFieldsRequired);
    }
    if !is_valid_password(&user.password) {
        return Err(UserError::InvalidPassword);
    }
    if !is_valid_email(&user.email) {
        return Err(UserError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_changes(changes: &UserChanges) -> UserResult<()> {
    let provided = [&changes.name, &changes.surname, &changes.email];
    if provided.into_iter().flatten().any(|f| blank(f)) {
        return Err(UserError::AllFieldsRequired);
    }
    if let Some(email) = &changes.email {
        if !is_valid_email(email) {
            return Err(UserError::InvalidEmail);
        }
    }
    Ok(())
}

pub fn validate_new_password(password: &str) -> UserResult<()> {
    if blank(password) {
        return Err(UserError::AllFieldsRequired);
    }
    if !is_valid_password(password) {
        return Err(UserError::InvalidPassword);
    }
    Ok(())
}
