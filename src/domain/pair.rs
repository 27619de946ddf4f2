//! Currency pair
//!
//! Parses `FROM/TO` pair strings such as `USD/NGN`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::RateLockError;

/// Separator between the two currency codes of a pair
pub const PAIR_SEPARATOR: char = '/';

/// How pair strings supplied by callers are treated before lookup and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairPolicy {
    /// Use the pair exactly as supplied.
    #[default]
    Raw,
    /// Trim whitespace and uppercase both currency codes.
    Normalized,
}

/// A parsed `FROM/TO` currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub from: String,
    pub to: String,
}

impl CurrencyPair {
    /// Parse a pair string under the given policy.
    ///
    /// # Errors
    /// - `RateLockError::Validation` if the separator is missing, either code
    ///   is empty, or more than one separator is present.
    pub fn parse(pair: &str, policy: PairPolicy) -> Result<Self, RateLockError> {
        let mut parts = pair.split(PAIR_SEPARATOR);
        let from = parts.next().unwrap_or_default();
        let to = parts.next().unwrap_or_default();

        if parts.next().is_some() {
            return Err(RateLockError::Validation(format!(
                "invalid currency pair '{}': expected FROM/TO",
                pair
            )));
        }

        let (from, to) = match policy {
            PairPolicy::Raw => (from.to_string(), to.to_string()),
            PairPolicy::Normalized => (
                from.trim().to_uppercase(),
                to.trim().to_uppercase(),
            ),
        };

        if from.is_empty() || to.is_empty() {
            return Err(RateLockError::Validation(format!(
                "invalid currency pair '{}': expected FROM/TO",
                pair
            )));
        }

        Ok(Self { from, to })
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, PAIR_SEPARATOR, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_pair() {
        let pair = CurrencyPair::parse("USD/NGN", PairPolicy::Raw).unwrap();
        assert_eq!(pair.from, "USD");
        assert_eq!(pair.to, "NGN");
        assert_eq!(pair.to_string(), "USD/NGN");
    }

    #[test]
    fn test_parse_missing_separator() {
        let err = CurrencyPair::parse("USD", PairPolicy::Raw).unwrap_err();
        assert!(matches!(err, RateLockError::Validation(_)));
    }

    #[test]
    fn test_parse_empty_and_half_empty() {
        for input in ["", "/", "USD/", "/NGN"] {
            let err = CurrencyPair::parse(input, PairPolicy::Raw).unwrap_err();
            assert!(matches!(err, RateLockError::Validation(_)), "input {:?}", input);
        }
    }

    #[test]
    fn test_parse_too_many_separators() {
        let err = CurrencyPair::parse("USD/NGN/EUR", PairPolicy::Raw).unwrap_err();
        assert!(matches!(err, RateLockError::Validation(_)));
    }

    #[test]
    fn test_raw_policy_keeps_case() {
        let pair = CurrencyPair::parse("usd/Ngn", PairPolicy::Raw).unwrap();
        assert_eq!(pair.to_string(), "usd/Ngn");
    }

    #[test]
    fn test_normalized_policy() {
        let pair = CurrencyPair::parse(" usd / ngn ", PairPolicy::Normalized).unwrap();
        assert_eq!(pair.from, "USD");
        assert_eq!(pair.to, "NGN");

        // Whitespace-only codes are still empty after trimming
        assert!(CurrencyPair::parse(" /NGN", PairPolicy::Normalized).is_err());
    }
}
