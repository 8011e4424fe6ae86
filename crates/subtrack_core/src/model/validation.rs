//! Centralized schema validation for persisted records.
//!
//! # Responsibility
//! - Turn an untyped JSON value into a typed record or a structured failure.
//! - Hold the field refinement rules shared by every entity.
//!
//! # Invariants
//! - Single-entity writes and whole-collection reads go through the same
//!   `parse_record` / `Validate` path.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum name length, counted in Unicode scalar values after trimming.
pub const MAX_NAME_CHARS: usize = 100;
/// Maximum icon length; emoji ZWJ sequences can span several scalars.
pub const MAX_ICON_CHARS: usize = 32;

/// Reason a record failed shape or refinement checks.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyId { field: &'static str },
    EmptyName { field: &'static str },
    NameTooLong { field: &'static str, max_chars: usize },
    EmptyIcon,
    IconTooLong { max_chars: usize },
    EmptyListRef,
    NegativeAmount(f64),
    NonFiniteAmount,
    UnknownCurrency(String),
    DuplicateId(String),
    /// Structural mismatch: missing field, wrong type, unknown enum value or
    /// unparseable date.
    Malformed(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId { field } => write!(f, "{field} must not be empty"),
            Self::EmptyName { field } => write!(f, "{field} must not be blank"),
            Self::NameTooLong { field, max_chars } => {
                write!(f, "{field} must be at most {max_chars} characters")
            }
            Self::EmptyIcon => write!(f, "icon must not be blank when set"),
            Self::IconTooLong { max_chars } => {
                write!(f, "icon must be at most {max_chars} characters")
            }
            Self::EmptyListRef => write!(f, "listId must not be empty when set"),
            Self::NegativeAmount(amount) => write!(f, "amount must be >= 0, got {amount}"),
            Self::NonFiniteAmount => write!(f, "amount must be a finite number"),
            Self::UnknownCurrency(code) => write!(f, "unsupported currency code `{code}`"),
            Self::DuplicateId(id) => write!(f, "duplicate record id `{id}`"),
            Self::Malformed(reason) => write!(f, "malformed record: {reason}"),
        }
    }
}

impl Error for ValidationError {}

/// Refinement rules a typed record must satisfy beyond its serde shape.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Parses one untyped JSON value into a validated record.
pub fn parse_record<T>(value: &Value) -> Result<T, ValidationError>
where
    T: DeserializeOwned + Validate,
{
    let record =
        T::deserialize(value).map_err(|err| ValidationError::Malformed(err.to_string()))?;
    record.validate()?;
    Ok(record)
}

pub(crate) fn check_id(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyId { field });
    }
    Ok(())
}

pub(crate) fn check_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong {
            field,
            max_chars: MAX_NAME_CHARS,
        });
    }
    Ok(())
}

/// Validates and trims a name before it is persisted.
pub(crate) fn normalize_name(field: &'static str, value: &str) -> Result<String, ValidationError> {
    check_name(field, value)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::{check_name, normalize_name, ValidationError, MAX_NAME_CHARS};

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            check_name("name", " \t\n"),
            Err(ValidationError::EmptyName { field: "name" })
        );
    }

    #[test]
    fn name_length_counts_chars_after_trim() {
        let exact = "é".repeat(MAX_NAME_CHARS);
        assert!(check_name("name", &format!("  {exact}  ")).is_ok());

        let long = "a".repeat(MAX_NAME_CHARS + 1);
        assert!(matches!(
            check_name("name", &long),
            Err(ValidationError::NameTooLong { .. })
        ));
    }

    #[test]
    fn normalize_name_trims() {
        assert_eq!(normalize_name("name", "  Streaming ").unwrap(), "Streaming");
    }
}
