//! Lock-free generated type cache
//!
//! Readers load an immutable snapshot of the map. A miss builds the woven
//! type outside of any lock and installs it with a compare-and-swap that
//! re-checks presence, so the first installed entry wins and racing builds
//! are dropped. Failed builds are never stored.

use arc_swap::ArcSwap;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use weft_application::WovenType;
use weft_domain::{Contract, Result};

/// Identity of a woven type: contract and implementation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    contract: TypeId,
    contract_name: &'static str,
    implementation: TypeId,
    implementation_name: &'static str,
}

impl CacheKey {
    /// Key of contract `C` over implementation `I`
    pub fn of<C: Contract, I: 'static>() -> Self {
        Self {
            contract: TypeId::of::<C>(),
            contract_name: C::NAME,
            implementation: TypeId::of::<I>(),
            implementation_name: type_name::<I>(),
        }
    }

    /// Contract path
    pub fn contract_name(&self) -> &'static str {
        self.contract_name
    }

    /// Implementation type name
    pub fn implementation_name(&self) -> &'static str {
        self.implementation_name
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} over {}", self.contract_name, self.implementation_name)
    }
}

type Entries = HashMap<CacheKey, Arc<WovenType>>;

/// Cache of woven types
pub struct GeneratedTypeCache {
    entries: ArcSwap<Entries>,
}

impl GeneratedTypeCache {
    /// Empty cache
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Installed woven type of `key`
    pub fn get(&self, key: &CacheKey) -> Option<Arc<WovenType>> {
        self.entries.load().get(key).cloned()
    }

    /// Installed woven type of `key`, building it with `build` on a miss
    ///
    /// `build` runs without holding any lock and may run on several threads
    /// for the same key; only the first result installed is kept and every
    /// caller receives it. An error from `build` goes to its caller only.
    pub fn get_or_create<F>(&self, key: &CacheKey, build: F) -> Result<Arc<WovenType>>
    where
        F: FnOnce() -> Result<WovenType>,
    {
        if let Some(hit) = self.get(key) {
            debug!(key = %key, "Generated type cache hit");
            return Ok(hit);
        }

        debug!(key = %key, "Generated type cache miss, building");
        let built = Arc::new(build()?);

        let mut winner = None;
        self.entries.rcu(|current| {
            if let Some(existing) = current.get(key) {
                winner = Some(Arc::clone(existing));
                Arc::clone(current)
            } else {
                let mut next = Entries::clone(current);
                next.insert(key.clone(), Arc::clone(&built));
                winner = Some(Arc::clone(&built));
                Arc::new(next)
            }
        });

        let winner = winner.unwrap_or_else(|| Arc::clone(&built));
        if Arc::ptr_eq(&winner, &built) {
            debug!(key = %key, woven_type = winner.type_name(), "Generated type installed");
        } else {
            debug!(key = %key, "Discarded duplicate build, another thread installed first");
        }
        Ok(winner)
    }

    /// Whether `key` has an installed woven type
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.load().contains_key(key)
    }

    /// Number of installed woven types
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    /// Whether nothing is installed
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Installed keys
    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries.load().keys().cloned().collect()
    }
}

impl Default for GeneratedTypeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GeneratedTypeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedTypeCache")
            .field("entries", &self.len())
            .finish()
    }
}
