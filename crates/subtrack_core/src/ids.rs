//! Record identity generation.
//!
//! # Invariants
//! - Generated ids are opaque, non-empty and never reused.
//! - Ids are assigned once at creation time and never rewritten.

use uuid::Uuid;

/// Source of fresh record ids, injected into repositories.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random v4 UUID ids in hyphenated lower-case form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
