//! Brazilian tax ID (CPF/CNPJ) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TaxId`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum TaxIdError {
    /// The input contains no digits at all.
    #[error("tax ID cannot be empty")]
    Empty,
    /// The digit count matches neither CPF (11) nor CNPJ (14).
    #[error("tax ID must have 11 (CPF) or 14 (CNPJ) digits, got {0}")]
    InvalidLength(usize),
}

/// Kind of Brazilian tax ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxIdKind {
    /// Individual taxpayer registry (11 digits).
    Cpf,
    /// Company registry (14 digits).
    Cnpj,
}

/// A Brazilian tax ID (CPF or CNPJ), stored as bare digits.
///
/// Parsing strips punctuation, so `"123.456.789-09"` and `"12345678909"`
/// produce the same value. The stored form is always digits-only - the
/// format the registration API expects.
///
/// ## Examples
///
/// ```
/// use vitrine_core::{TaxId, TaxIdKind};
///
/// let cpf = TaxId::parse("123.456.789-09").unwrap();
/// assert_eq!(cpf.as_str(), "12345678909");
/// assert_eq!(cpf.kind(), TaxIdKind::Cpf);
///
/// let cnpj = TaxId::parse("12.345.678/0001-95").unwrap();
/// assert_eq!(cnpj.kind(), TaxIdKind::Cnpj);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Parse a `TaxId` from a string, stripping any non-digit characters.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, or a digit count that
    /// is neither 11 (CPF) nor 14 (CNPJ).
    pub fn parse(s: &str) -> Result<Self, TaxIdError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        match digits.len() {
            0 => Err(TaxIdError::Empty),
            11 | 14 => Ok(Self(digits)),
            n => Err(TaxIdError::InvalidLength(n)),
        }
    }

    /// Returns the kind of this tax ID.
    #[must_use]
    pub fn kind(&self) -> TaxIdKind {
        if self.0.len() == 11 {
            TaxIdKind::Cpf
        } else {
            TaxIdKind::Cnpj
        }
    }

    /// Returns the digits-only representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `TaxId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the conventionally punctuated form
    /// (`123.456.789-09` / `12.345.678/0001-95`).
    #[must_use]
    pub fn formatted(&self) -> String {
        let d = &self.0;
        match self.kind() {
            TaxIdKind::Cpf => format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11]),
            TaxIdKind::Cnpj => format!(
                "{}.{}.{}/{}-{}",
                &d[0..2],
                &d[2..5],
                &d[5..8],
                &d[8..12],
                &d[12..14]
            ),
        }
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaxId {
    type Err = TaxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
