//! Storefront subdomain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Subdomain`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SubdomainError {
    /// The input string is empty.
    #[error("subdomain cannot be empty")]
    Empty,
    /// The input string is too short.
    #[error("subdomain must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("subdomain must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `a-z`, `0-9`, `-`.
    #[error("subdomain contains invalid character '{0}'")]
    InvalidCharacter(char),
    /// The input starts or ends with a hyphen.
    #[error("subdomain cannot start or end with a hyphen")]
    HyphenAtEdge,
}

/// A storefront subdomain: the identifier scoping one merchant's catalog.
///
/// DNS-label rules apply: 3-63 characters of lowercase ASCII letters,
/// digits, and hyphens, with no hyphen at either edge. Input is trimmed
/// and lowercased before validation, so `" MinhaLoja "` parses to
/// `minhaloja`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Subdomain(String);

impl Subdomain {
    /// Minimum length of a subdomain.
    pub const MIN_LENGTH: usize = 3;

    /// Maximum length of a subdomain (DNS label limit).
    pub const MAX_LENGTH: usize = 63;

    /// Parse a `Subdomain` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalized input is empty, outside the
    /// 3-63 character range, contains a character other than `a-z`,
    /// `0-9`, `-`, or has a hyphen at either edge.
    pub fn parse(s: &str) -> Result<Self, SubdomainError> {
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(SubdomainError::Empty);
        }

        if normalized.len() < Self::MIN_LENGTH {
            return Err(SubdomainError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if normalized.len() > Self::MAX_LENGTH {
            return Err(SubdomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(bad) = normalized
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
        {
            return Err(SubdomainError::InvalidCharacter(bad));
        }

        if normalized.starts_with('-') || normalized.ends_with('-') {
            return Err(SubdomainError::HyphenAtEdge);
        }

        Ok(Self(normalized))
    }

    /// Returns the subdomain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Subdomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Subdomain {
    type Err = SubdomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Subdomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Subdomain::parse("minha-loja").unwrap().as_str(), "minha-loja");
        assert_eq!(Subdomain::parse("loja123").unwrap().as_str(), "loja123");
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        assert_eq!(Subdomain::parse(" MinhaLoja ").unwrap().as_str(), "minhaloja");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Subdomain::parse("  "), Err(SubdomainError::Empty)));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            Subdomain::parse("ab"),
            Err(SubdomainError::TooShort { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(64);
        assert!(matches!(
            Subdomain::parse(&long),
            Err(SubdomainError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            Subdomain::parse("minha_loja"),
            Err(SubdomainError::InvalidCharacter('_'))
        ));
        assert!(matches!(
            Subdomain::parse("loja.com"),
            Err(SubdomainError::InvalidCharacter('.'))
        ));
    }

    #[test]
    fn test_parse_hyphen_at_edge() {
        assert!(matches!(
            Subdomain::parse("-loja"),
            Err(SubdomainError::HyphenAtEdge)
        ));
        assert!(matches!(
            Subdomain::parse("loja-"),
            Err(SubdomainError::HyphenAtEdge)
        ));
    }
}
