//! Currency
//!
//! Read-only currency records and cross-rate pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::RateLockError;

/// A currency with its rate against the common reference unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    /// `None` when upstream data never populated the rate
    pub rate: Option<Decimal>,
}

impl Currency {
    pub fn new(code: impl Into<String>, rate: Decimal) -> Self {
        Self {
            code: code.into(),
            rate: Some(rate),
        }
    }

    /// Stored rate, or `DataIntegrity` when missing.
    pub fn require_rate(&self) -> Result<Decimal, RateLockError> {
        self.rate.ok_or_else(|| {
            RateLockError::DataIntegrity(format!("currency {} has no rate", self.code))
        })
    }
}

/// Cross rate `to.rate / from.rate`.
///
/// No spread, rounding or triangulation is applied.
pub fn cross_rate(from: &Currency, to: &Currency) -> Result<Decimal, RateLockError> {
    let from_rate = from.require_rate()?;
    let to_rate = to.require_rate()?;

    to_rate.checked_div(from_rate).ok_or_else(|| {
        RateLockError::DataIntegrity(format!(
            "cannot price {}/{}: rate of {} is {}",
            from.code, to.code, from.code, from_rate
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cross_rate() {
        let usd = Currency::new("USD", dec!(1));
        let ngn = Currency::new("NGN", dec!(1500));

        assert_eq!(cross_rate(&usd, &ngn).unwrap(), dec!(1500));
        assert_eq!(cross_rate(&ngn, &usd).unwrap(), dec!(1) / dec!(1500));
    }

    #[test]
    fn test_cross_rate_shared_base() {
        let eur = Currency::new("EUR", dec!(0.9));
        let gbp = Currency::new("GBP", dec!(0.8));

        assert_eq!(cross_rate(&eur, &gbp).unwrap(), dec!(0.8) / dec!(0.9));
    }

    #[test]
    fn test_missing_rate() {
        let usd = Currency::new("USD", dec!(1));
        let broken = Currency {
            code: "XAF".to_string(),
            rate: None,
        };

        let err = cross_rate(&usd, &broken).unwrap_err();
        assert!(matches!(err, RateLockError::DataIntegrity(_)));
        assert!(err.to_string().contains("XAF"));

        let err = cross_rate(&broken, &usd).unwrap_err();
        assert!(matches!(err, RateLockError::DataIntegrity(_)));
    }

    #[test]
    fn test_zero_from_rate() {
        let zero = Currency::new("ZRO", Decimal::ZERO);
        let usd = Currency::new("USD", dec!(1));

        let err = cross_rate(&zero, &usd).unwrap_err();
        assert!(matches!(err, RateLockError::DataIntegrity(_)));
    }
}
