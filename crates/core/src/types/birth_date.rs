//! Birth date type with API wire formatting.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`BirthDate`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum BirthDateError {
    /// The input string is empty.
    #[error("birth date cannot be empty")]
    Empty,
    /// The input is not a valid `YYYY-MM-DD` date.
    #[error("birth date must be a valid YYYY-MM-DD date: {0}")]
    Invalid(String),
}

/// A birth date.
///
/// Accepts the HTML date-input format (`YYYY-MM-DD`); the registration
/// API wants `DD/MM/YYYY`, which [`BirthDate::as_api_format`] produces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// Parse a `BirthDate` from a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or not a valid calendar date.
    pub fn parse(s: &str) -> Result<Self, BirthDateError> {
        if s.trim().is_empty() {
            return Err(BirthDateError::Empty);
        }

        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|e| BirthDateError::Invalid(e.to_string()))
    }

    /// Returns the wire format the registration endpoint expects
    /// (`DD/MM/YYYY`).
    #[must_use]
    pub fn as_api_format(&self) -> String {
        self.0.format("%d/%m/%Y").to_string()
    }

    /// Returns the underlying date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BirthDate {
    type Err = BirthDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let date = BirthDate::parse("1990-03-25").unwrap();
        assert_eq!(date.as_api_format(), "25/03/1990");
    }

    #[test]
    fn test_parse_trims() {
        assert!(BirthDate::parse(" 1990-03-25 ").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(BirthDate::parse(""), Err(BirthDateError::Empty)));
        assert!(matches!(BirthDate::parse("  "), Err(BirthDateError::Empty)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            BirthDate::parse("25/03/1990"),
            Err(BirthDateError::Invalid(_))
        ));
        assert!(matches!(
            BirthDate::parse("1990-02-30"),
            Err(BirthDateError::Invalid(_))
        ));
    }
}
