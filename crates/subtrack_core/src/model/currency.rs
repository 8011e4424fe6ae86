//! Supported currency codes and display symbols.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// ISO-4217 currency supported by the app, serialized as its upper-case code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
    Chf,
    Cny,
    Inr,
    Sek,
    Nok,
    Dkk,
    Pln,
    Brl,
    Mxn,
    Krw,
    Sgd,
    Hkd,
    Nzd,
    Zar,
    Try,
}

impl Currency {
    /// Every supported currency in picker order.
    pub const ALL: [Currency; 21] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Cad,
        Currency::Aud,
        Currency::Chf,
        Currency::Cny,
        Currency::Inr,
        Currency::Sek,
        Currency::Nok,
        Currency::Dkk,
        Currency::Pln,
        Currency::Brl,
        Currency::Mxn,
        Currency::Krw,
        Currency::Sgd,
        Currency::Hkd,
        Currency::Nzd,
        Currency::Zar,
        Currency::Try,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
            Self::Chf => "CHF",
            Self::Cny => "CNY",
            Self::Inr => "INR",
            Self::Sek => "SEK",
            Self::Nok => "NOK",
            Self::Dkk => "DKK",
            Self::Pln => "PLN",
            Self::Brl => "BRL",
            Self::Mxn => "MXN",
            Self::Krw => "KRW",
            Self::Sgd => "SGD",
            Self::Hkd => "HKD",
            Self::Nzd => "NZD",
            Self::Zar => "ZAR",
            Self::Try => "TRY",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Jpy => "¥",
            Self::Cad => "CA$",
            Self::Aud => "A$",
            Self::Chf => "CHF",
            Self::Cny => "CN¥",
            Self::Inr => "₹",
            Self::Sek | Self::Nok | Self::Dkk => "kr",
            Self::Pln => "zł",
            Self::Brl => "R$",
            Self::Mxn => "MX$",
            Self::Krw => "₩",
            Self::Sgd => "S$",
            Self::Hkd => "HK$",
            Self::Nzd => "NZ$",
            Self::Zar => "R",
            Self::Try => "₺",
        }
    }

    /// Looks up a currency by its canonical upper-case code.
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        let trimmed = code.trim();
        Self::ALL
            .into_iter()
            .find(|currency| currency.code() == trimmed)
            .ok_or_else(|| ValidationError::UnknownCurrency(trimmed.to_string()))
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Display symbol for an optional currency; unset falls back to `$`.
pub fn currency_symbol(currency: Option<Currency>) -> &'static str {
    currency.map_or("$", Currency::symbol)
}

#[cfg(test)]
mod tests {
    use super::{currency_symbol, Currency};
    use crate::model::validation::ValidationError;

    #[test]
    fn serde_uses_upper_case_codes() {
        for currency in Currency::ALL {
            let json = serde_json::to_string(&currency).unwrap();
            assert_eq!(json, format!("\"{}\"", currency.code()));
        }
    }

    #[test]
    fn from_code_is_case_sensitive_after_trim() {
        assert_eq!(Currency::from_code(" EUR ").unwrap(), Currency::Eur);
        assert_eq!(
            Currency::from_code("eur"),
            Err(ValidationError::UnknownCurrency("eur".to_string()))
        );
    }

    #[test]
    fn symbol_falls_back_to_dollar() {
        assert_eq!(currency_symbol(None), "$");
        assert_eq!(currency_symbol(Some(Currency::Gbp)), "£");
    }
}
