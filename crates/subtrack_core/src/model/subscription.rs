//! Subscription record and its creation input.
//!
//! # Invariants
//! - `amount` is finite and never negative.
//! - `name` is non-blank; `icon` and `list_id` are either absent or non-blank.
//! - `list_id` is not checked against existing lists; a dangling reference is
//!   read as "unassigned" by callers and cleared by list removal.

use super::currency::Currency;
use super::validation::{
    check_id, check_name, normalize_name, Validate, ValidationError, MAX_ICON_CHARS,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Billing cadence of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Yearly,
}

/// Persisted subscription record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    /// Emoji shown as avatar; `None` means the UI renders `initials()`.
    pub icon: Option<String>,
    /// Owning list, `None` when unassigned.
    pub list_id: Option<String>,
    pub frequency: Frequency,
    pub amount: f64,
    pub currency: Currency,
    #[serde(with = "iso_timestamp")]
    pub start_date: DateTime<Utc>,
}

/// Caller-supplied fields for a subscription that has no id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub name: String,
    pub icon: Option<String>,
    pub list_id: Option<String>,
    pub frequency: Frequency,
    pub amount: f64,
    pub currency: Currency,
    pub start_date: DateTime<Utc>,
}

impl NewSubscription {
    /// Attaches an id, producing the record that will be validated and stored.
    pub fn into_subscription(self, id: impl Into<String>) -> Subscription {
        Subscription {
            id: id.into(),
            name: self.name,
            icon: self.icon,
            list_id: self.list_id,
            frequency: self.frequency,
            amount: self.amount,
            currency: self.currency,
            start_date: self.start_date,
        }
    }
}

impl Subscription {
    /// Up to two upper-case letters used when no icon is set.
    pub fn initials(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            return "?".to_string();
        }
        let mut words = name.split_whitespace();
        let initials: String = match (words.next(), words.next()) {
            (Some(first), Some(second)) => first
                .chars()
                .take(1)
                .chain(second.chars().take(1))
                .collect(),
            _ => name.chars().take(2).collect(),
        };
        initials.to_uppercase()
    }

    /// Returns a copy with trimmed name/icon after validating it.
    pub(crate) fn normalized(mut self) -> Result<Self, ValidationError> {
        self.validate()?;
        self.name = normalize_name("name", &self.name)?;
        self.icon = self.icon.map(|icon| icon.trim().to_string());
        Ok(self)
    }
}

impl Validate for Subscription {
    fn validate(&self) -> Result<(), ValidationError> {
        check_id("id", &self.id)?;
        check_name("name", &self.name)?;
        if let Some(icon) = &self.icon {
            let trimmed = icon.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::EmptyIcon);
            }
            if trimmed.chars().count() > MAX_ICON_CHARS {
                return Err(ValidationError::IconTooLong {
                    max_chars: MAX_ICON_CHARS,
                });
            }
        }
        if let Some(list_id) = &self.list_id {
            if list_id.trim().is_empty() {
                return Err(ValidationError::EmptyListRef);
            }
        }
        if !self.amount.is_finite() {
            return Err(ValidationError::NonFiniteAmount);
        }
        if self.amount < 0.0 {
            return Err(ValidationError::NegativeAmount(self.amount));
        }
        Ok(())
    }
}

/// `startDate` wire format: RFC 3339 with millisecond precision in UTC.
/// Reads also accept any RFC 3339 offset and bare `YYYY-MM-DD` dates.
mod iso_timestamp {
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .ok_or_else(|| de::Error::custom(format!("invalid startDate `{trimmed}`")))
    }
}
