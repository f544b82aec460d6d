//! Generated type cache
//!
//! One woven type per `(contract, implementation)` pair for the lifetime of
//! the cache owner.

mod type_cache;

pub use type_cache::{CacheKey, GeneratedTypeCache};
