use crate::core::error::ValidationError;
use crate::models::registration::RegisterRequest;
use std::ops::RangeInclusive;

pub const USERNAME_LENGTH: RangeInclusive<usize> = 6..=20;
pub const PASSWORD_LENGTH: RangeInclusive<usize> = 8..=36;

/// Minimum length enforced by the password format rule
const PASSWORD_FORMAT_MIN_LENGTH: usize = 8;

/// A registration request that passed every rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub username: String,
    pub password: String,
    pub favorite_club: String,
    pub news_letter: bool,
}

impl RegisterRequest {
    /// Apply the registration rules in order, stopping at the first failure.
    ///
    /// Presence of every required field is checked before any length or format rule.
    pub fn validate(self) -> Result<ValidatedRegistration, ValidationError> {
        let username = present(self.username).ok_or(ValidationError::UsernameRequired)?;
        let password = present(self.password).ok_or(ValidationError::PasswordRequired)?;
        let favorite_club =
            present(self.favorite_club).ok_or(ValidationError::FavoriteClubRequired)?;

        if !USERNAME_LENGTH.contains(&username.chars().count()) {
            return Err(ValidationError::UsernameLength);
        }

        if !PASSWORD_LENGTH.contains(&password.chars().count()) {
            return Err(ValidationError::PasswordLength);
        }

        if !is_valid_password_format(&password) {
            return Err(ValidationError::PasswordFormat);
        }

        Ok(ValidatedRegistration {
            username,
            password,
            favorite_club,
            news_letter: self.news_letter.unwrap_or(false),
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// ASCII letters and digits only, with at least one of each
pub fn is_valid_password_format(password: &str) -> bool {
    password.len() >= PASSWORD_FORMAT_MIN_LENGTH
        && password.chars().all(|c| c.is_ascii_alphanumeric())
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}
