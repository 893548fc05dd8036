//! Settlement currencies the payment provider supports.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes the platform settles payouts in.
///
/// Catalog currencies are open-ended (a lookup table); this closed set only
/// gates what a payout account may be denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    JPY,
    CHF,
}

/// Error parsing a currency code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyCodeError(pub String);

impl CurrencyCode {
    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::JPY => "JPY",
            Self::CHF => "CHF",
        }
    }

    /// All supported codes, for validation messages.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::USD,
            Self::EUR,
            Self::GBP,
            Self::CAD,
            Self::AUD,
            Self::JPY,
            Self::CHF,
        ]
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            "JPY" => Ok(Self::JPY),
            "CHF" => Ok(Self::CHF),
            other => Err(CurrencyCodeError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse_case_insensitive() {
        assert_eq!("usd".parse::<CurrencyCode>(), Ok(CurrencyCode::USD));
        assert_eq!("Eur".parse::<CurrencyCode>(), Ok(CurrencyCode::EUR));
    }

    #[test]
    fn test_currency_parse_rejects_unknown() {
        let err = "XTS".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err.0, "XTS");
    }

    #[test]
    fn test_currency_roundtrip_all() {
        for code in CurrencyCode::all() {
            assert_eq!(code.code().parse::<CurrencyCode>(), Ok(*code));
        }
    }
}
