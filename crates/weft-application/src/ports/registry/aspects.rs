//! Aspect Factory Registry
//!
//! Turns a [`MarkerSpec`] into a live [`Marker`]. Factories are submitted to
//! the `ASPECT_FACTORIES` distributed slice or registered on an
//! [`AspectFactoryRegistry`] instance; instance factories shadow linked ones
//! with the same name.
//!
//! ```ignore
//! #[linkme::distributed_slice(weft::ASPECT_FACTORIES)]
//! static TIMING: AspectFactoryEntry = AspectFactoryEntry {
//!     name: "timing",
//!     description: "Records call durations",
//!     factory: |_| Ok(AspectHandle::Exit(Arc::new(Timing::default()))),
//! };
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use weft_domain::{AspectHandle, Error, Marker, MarkerDeclaration, MarkerSpec, Result};

/// Factory building an aspect for one marker spec
pub type AspectFactory = fn(&MarkerSpec) -> Result<AspectHandle>;

/// Registry entry for aspect factories
pub struct AspectFactoryEntry {
    /// Aspect name referenced by marker specs
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function
    pub factory: AspectFactory,
}

#[linkme::distributed_slice]
pub static ASPECT_FACTORIES: [AspectFactoryEntry] = [..];

/// List all linked aspect factories as `(name, description)`
pub fn list_aspect_factories() -> Vec<(&'static str, &'static str)> {
    ASPECT_FACTORIES
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}

type CustomFactory = Arc<dyn Fn(&MarkerSpec) -> Result<AspectHandle> + Send + Sync>;

/// Factories available to one generator
#[derive(Clone, Default)]
pub struct AspectFactoryRegistry {
    custom: HashMap<String, CustomFactory>,
}

impl AspectFactoryRegistry {
    /// Registry backed by the linked factories only
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`
    pub fn register<N, F>(&mut self, name: N, factory: F)
    where
        N: Into<String>,
        F: Fn(&MarkerSpec) -> Result<AspectHandle> + Send + Sync + 'static,
    {
        self.custom.insert(name.into(), Arc::new(factory));
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<N, F>(mut self, name: N, factory: F) -> Self
    where
        N: Into<String>,
        F: Fn(&MarkerSpec) -> Result<AspectHandle> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Names of every available factory, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self.custom.keys().cloned().collect();
        names.extend(ASPECT_FACTORIES.iter().map(|e| e.name.to_string()));
        names.into_iter().collect()
    }

    /// Live marker for a declaration
    pub fn resolve(&self, declaration: &MarkerDeclaration) -> Result<Marker> {
        match declaration {
            MarkerDeclaration::Direct(marker) => Ok(marker.clone()),
            MarkerDeclaration::Spec(spec) => self.reconstruct(spec),
        }
    }

    /// Reconstruct a marker from its spec
    pub fn reconstruct(&self, spec: &MarkerSpec) -> Result<Marker> {
        if !spec.dropped_arguments().is_empty() {
            debug!(
                aspect = spec.aspect(),
                dropped = ?spec.dropped_arguments(),
                "Dropped marker arguments of unsupported kinds"
            );
        }

        let handle = if let Some(factory) = self.custom.get(spec.aspect()) {
            factory(spec)?
        } else if let Some(entry) = ASPECT_FACTORIES.iter().find(|e| e.name == spec.aspect()) {
            (entry.factory)(spec)?
        } else {
            return Err(Error::invalid_marker(
                spec.aspect(),
                format!("no aspect factory registered. Available factories: {:?}", self.names()),
            ));
        };

        if handle.stage() != spec.stage() {
            return Err(Error::invalid_marker(
                spec.aspect(),
                format!(
                    "factory produced a {} aspect for a {} marker",
                    handle.stage(),
                    spec.stage()
                ),
            ));
        }
        Ok(Marker::from_handle(handle, spec.order()).named(spec.aspect()))
    }
}

impl fmt::Debug for AspectFactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspectFactoryRegistry")
            .field("factories", &self.names())
            .finish()
    }
}
