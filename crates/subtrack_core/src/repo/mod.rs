//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Read, normalize, mutate and atomically rewrite whole collections.
//! - Keep `List` and `Subscription` references consistent on list removal.
//!
//! # Invariants
//! - Every write validates the full collection before it is serialized.
//! - Every read normalizes stored data and self-heals corrupt collections.
//! - Missing update/remove targets are reported as `Ok(None)`, never as errors,
//!   and leave storage untouched.

use crate::model::validation::ValidationError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod collection;
pub mod list_repo;
pub mod subscription_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error raised by repository writes.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Storage(StoreError),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}
