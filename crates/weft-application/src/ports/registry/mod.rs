//! Auto-registration registries
//!
//! Entries are submitted at compile time through linkme distributed slices
//! and discovered at generation time.

pub mod aspects;
