//! Preferred display currency.

use super::{read_value, write_value};
use crate::model::currency::Currency;
use crate::repo::RepoResult;
use crate::store::{KeyValueStore, DEFAULT_CURRENCY_KEY};
use log::{info, warn};

/// Reads and writes the `default_currency` preference.
pub struct CurrencyPreference<'s> {
    store: &'s dyn KeyValueStore,
}

impl<'s> CurrencyPreference<'s> {
    pub fn new(store: &'s dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Currencies the preference may be set to.
    pub fn supported() -> &'static [Currency] {
        &Currency::ALL
    }

    /// Stored preference, or `None` when unset or invalid.
    pub fn get(&self) -> Option<Currency> {
        let code = read_value::<String>(self.store, DEFAULT_CURRENCY_KEY)?;
        match Currency::from_code(&code) {
            Ok(currency) => Some(currency),
            Err(err) => {
                warn!("event=currency_get module=prefs status=invalid error={err}");
                None
            }
        }
    }

    /// Stored preference, falling back to USD.
    pub fn get_or_default(&self) -> Currency {
        self.get().unwrap_or_default()
    }

    pub fn set(&self, currency: Currency) -> RepoResult<Currency> {
        write_value(self.store, DEFAULT_CURRENCY_KEY, currency.code())?;
        info!("event=currency_set module=prefs status=ok currency={currency}");
        Ok(currency)
    }

    /// Validates a raw currency code and stores it.
    ///
    /// # Errors
    /// - `RepoError::Validation` for unsupported codes; nothing is written.
    pub fn set_code(&self, code: &str) -> RepoResult<Currency> {
        let currency = Currency::from_code(code)?;
        self.set(currency)
    }

    /// Removes the preference so reads fall back to the default.
    pub fn clear(&self) -> RepoResult<()> {
        self.store.delete(DEFAULT_CURRENCY_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CurrencyPreference;
    use crate::model::currency::Currency;
    use crate::repo::RepoError;
    use crate::store::{MemoryStore, DEFAULT_CURRENCY_KEY};

    #[test]
    fn unset_preference_defaults_to_usd() {
        let store = MemoryStore::new();
        let pref = CurrencyPreference::new(&store);
        assert_eq!(pref.get(), None);
        assert_eq!(pref.get_or_default(), Currency::Usd);
    }

    #[test]
    fn set_stores_json_string() {
        let store = MemoryStore::new();
        let pref = CurrencyPreference::new(&store);
        pref.set(Currency::Jpy).unwrap();
        assert_eq!(store.raw(DEFAULT_CURRENCY_KEY).as_deref(), Some("\"JPY\""));
        assert_eq!(pref.get(), Some(Currency::Jpy));
    }

    #[test]
    fn invalid_code_is_rejected_on_write_and_ignored_on_read() {
        let store = MemoryStore::with_entries([(DEFAULT_CURRENCY_KEY, "\"DOGE\"")]);
        let pref = CurrencyPreference::new(&store);
        assert_eq!(pref.get(), None);
        assert_eq!(pref.get_or_default(), Currency::Usd);

        assert!(matches!(pref.set_code("DOGE"), Err(RepoError::Validation(_))));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn clear_removes_key() {
        let store = MemoryStore::new();
        let pref = CurrencyPreference::new(&store);
        pref.set_code("GBP").unwrap();
        pref.clear().unwrap();
        assert_eq!(pref.get(), None);
    }

    #[test]
    fn supported_lists_every_currency_once() {
        let supported = CurrencyPreference::supported();
        assert_eq!(supported.len(), Currency::ALL.len());
        assert_eq!(supported[0], Currency::Usd);
    }
}
