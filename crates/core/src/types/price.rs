//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product price: a base amount plus an optional promotional amount.
///
/// The *effective* price - what the customer actually pays - is the
/// promotional amount only when it is present **and lower** than the base
/// amount. A "promotion" at or above the base amount is ignored.
///
/// Amounts use [`Decimal`] in the currency's standard unit (reais, not
/// centavos); money never goes through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Base unit amount.
    pub amount: Decimal,
    /// Optional promotional amount.
    pub promotional: Option<Decimal>,
}

impl Price {
    /// Create a price with no promotion.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self {
            amount,
            promotional: None,
        }
    }

    /// Create a price with a promotional amount.
    #[must_use]
    pub const fn with_promotion(amount: Decimal, promotional: Decimal) -> Self {
        Self {
            amount,
            promotional: Some(promotional),
        }
    }

    /// The amount the customer pays: the promotional amount if present and
    /// lower than the base amount, else the base amount.
    #[must_use]
    pub fn effective(&self) -> Decimal {
        match self.promotional {
            Some(promo) if promo < self.amount => promo,
            _ => self.amount,
        }
    }

    /// Whether the effective price is discounted below the base amount.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.effective() < self.amount
    }

    /// Format for display (e.g., `R$ 79.90`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("R$ {:.2}", self.effective())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_effective_without_promotion() {
        let price = Price::new(dec!(100));
        assert_eq!(price.effective(), dec!(100));
        assert!(!price.is_discounted());
    }

    #[test]
    fn test_effective_with_lower_promotion() {
        let price = Price::with_promotion(dec!(100), dec!(80));
        assert_eq!(price.effective(), dec!(80));
        assert!(price.is_discounted());
    }

    #[test]
    fn test_promotion_at_or_above_base_is_ignored() {
        assert_eq!(Price::with_promotion(dec!(100), dec!(100)).effective(), dec!(100));
        assert_eq!(Price::with_promotion(dec!(100), dec!(120)).effective(), dec!(100));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::with_promotion(dec!(100), dec!(79.9)).display(), "R$ 79.90");
    }
}
