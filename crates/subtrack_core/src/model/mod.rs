//! Persisted domain model for subscription tracking.
//!
//! # Responsibility
//! - Define the records stored under each collection key.
//! - Own the validation rules applied on every write and every read-back.
//!
//! # Invariants
//! - Records are identified by opaque string ids assigned at creation.
//! - JSON field names are camelCase to stay compatible with stored data.

pub mod currency;
pub mod list;
pub mod subscription;
pub mod validation;
