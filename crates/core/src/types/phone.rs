//! Brazilian phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input contains no digits at all.
    #[error("phone number cannot be empty")]
    Empty,
    /// The digit count is outside the accepted range.
    #[error("phone number must have 10 or 11 digits, got {0}")]
    InvalidLength(usize),
}

/// A Brazilian phone number, stored as bare digits (DDD + number).
///
/// Parsing strips punctuation: `"(11) 98765-4321"` becomes
/// `"11987654321"`. Ten digits is a landline, eleven a mobile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string, stripping any non-digit characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits or the digit count is
    /// not 10 or 11.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        match digits.len() {
            0 => Err(PhoneError::Empty),
            10 | 11 => Ok(Self(digits)),
            n => Err(PhoneError::InvalidLength(n)),
        }
    }

    /// Returns the digits-only representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the two-digit area code (DDD).
    #[must_use]
    pub fn area_code(&self) -> &str {
        self.0.get(0..2).unwrap_or("")
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
