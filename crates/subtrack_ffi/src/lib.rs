//! Flutter-facing bindings for the subscription persistence core.

pub mod api;
