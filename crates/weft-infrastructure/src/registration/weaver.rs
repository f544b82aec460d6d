//! Weaver
//!
//! Owns a [`GeneratedTypeCache`] and the [`ProxyTypeGenerator`] that fills
//! it. Every wrap of the same `(contract, implementation)` pair reuses one
//! woven type.

use super::exports::{ExportEntry, WOVEN_EXPORTS};
use crate::cache::{CacheKey, GeneratedTypeCache};
use crate::config::{ConfigLoader, WeftConfig};
use crate::logging::TracingObserver;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};
use weft_application::{
    AspectFactoryRegistry, MemberWeaver, ObjectContract, ProxyTypeGenerator, Weave, Woven,
    WovenType,
};
use weft_domain::error::Result;
use weft_domain::{
    AspectHandle, CompositionContainer, CreationPolicy, GenerationObserver, Implementation,
    MarkerSpec, Registration, RethrowPolicy,
};

static GLOBAL: LazyLock<Weaver> = LazyLock::new(|| match ConfigLoader::new().load() {
    Ok(config) => Weaver::from_config(&config),
    Err(e) => {
        warn!(error = %e, "Falling back to the default weaving configuration");
        Weaver::new()
    }
});

/// Registration surface over one generated type cache
pub struct Weaver {
    cache: GeneratedTypeCache,
    generator: ProxyTypeGenerator,
}

impl Weaver {
    /// Weaver with the default configuration
    pub fn new() -> Self {
        Self::from_config(&WeftConfig::default())
    }

    /// Weaver configured from the `weaving` section, logging through [`TracingObserver`]
    pub fn from_config(config: &WeftConfig) -> Self {
        Self::builder()
            .policy(config.weaving.rethrow_policy)
            .emit_source(config.weaving.emit_source)
            .observer(Arc::new(TracingObserver::new(
                config.weaving.log_generated_source,
            )))
            .build()
    }

    /// Start building a weaver
    pub fn builder() -> WeaverBuilder {
        WeaverBuilder::default()
    }

    /// Process-wide weaver, configured by [`ConfigLoader`] on first use
    pub fn global() -> &'static Weaver {
        &GLOBAL
    }

    /// Cache of woven types
    pub fn cache(&self) -> &GeneratedTypeCache {
        &self.cache
    }

    /// Error stage policy of woven members
    pub fn policy(&self) -> RethrowPolicy {
        self.generator.policy()
    }

    /// Woven type of `C` over `I`, generated on first use
    pub fn woven_type<C, I>(&self) -> Result<Arc<WovenType>>
    where
        C: Weave<I>,
        I: Implementation,
    {
        self.cache.get_or_create(&CacheKey::of::<C, I>(), || {
            let contract = C::descriptor()?;
            let implementation = I::descriptor();
            self.generator.generate(&contract, &implementation)
        })
    }

    /// Wrap `implementation` in a proxy of `C`
    pub fn wrap<C, I>(&self, implementation: I) -> Result<C::Proxy>
    where
        C: Weave<I>,
        I: Implementation,
    {
        self.wrap_shared::<C, I>(Arc::new(implementation))
    }

    /// Wrap an already shared implementation
    pub fn wrap_shared<C, I>(&self, implementation: Arc<I>) -> Result<C::Proxy>
    where
        C: Weave<I>,
        I: Implementation,
    {
        let woven_type = self.woven_type::<C, I>()?;
        Ok(C::assemble(Woven::new(woven_type, implementation)))
    }

    /// Wrap every implementation; all proxies share one woven type
    pub fn wrap_many<C, I, It>(&self, implementations: It) -> Result<Vec<C::Proxy>>
    where
        C: Weave<I>,
        I: Implementation,
        It: IntoIterator<Item = I>,
    {
        let woven_type = self.woven_type::<C, I>()?;
        Ok(implementations
            .into_iter()
            .map(|i| C::assemble(Woven::new(Arc::clone(&woven_type), Arc::new(i))))
            .collect())
    }

    /// Register proxies of `C` over implementations built by `factory`
    ///
    /// The woven type is generated now, so resolution cannot fail on
    /// weaving. The container receives `Arc<C::Object>` values.
    pub fn register<C, I, F>(
        &self,
        container: &mut dyn CompositionContainer,
        policy: CreationPolicy,
        factory: F,
    ) -> Result<()>
    where
        C: ObjectContract<I>,
        I: Implementation,
        F: Fn() -> I + Send + Sync + 'static,
    {
        let woven_type = self.woven_type::<C, I>()?;
        let registration = Registration {
            contract: woven_type.contract().to_string(),
            implementation: woven_type.implementation().to_string(),
            policy,
            factory: Arc::new(move || -> Result<Box<dyn Any + Send + Sync>> {
                let proxy = C::assemble(Woven::new(Arc::clone(&woven_type), Arc::new(factory())));
                let object: Arc<C::Object> = C::into_object(proxy);
                Ok(Box::new(object))
            }),
        };
        container.register(registration)
    }

    /// Register a batch of exports, returning how many were registered
    ///
    /// Stops at the first failing entry.
    pub fn register_exports<'e, E>(
        &self,
        container: &mut dyn CompositionContainer,
        entries: E,
    ) -> Result<usize>
    where
        E: IntoIterator<Item = &'e ExportEntry>,
    {
        let mut registered = 0;
        for entry in entries {
            if let Err(e) = (entry.register)(self, container, entry.policy) {
                warn!(
                    contract = entry.contract,
                    implementation = entry.implementation,
                    error = %e,
                    "Export registration failed"
                );
                return Err(e);
            }
            registered += 1;
        }
        info!(registered, "Registered woven exports");
        Ok(registered)
    }

    /// Register every export submitted to [`WOVEN_EXPORTS`]
    pub fn register_linked_exports(&self, container: &mut dyn CompositionContainer) -> Result<usize> {
        self.register_exports(container, WOVEN_EXPORTS.iter())
    }
}

impl Default for Weaver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Weaver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Weaver")
            .field("cache", &self.cache)
            .field("generator", &self.generator)
            .finish()
    }
}

/// Builder for [`Weaver`]
pub struct WeaverBuilder {
    policy: RethrowPolicy,
    emit_source: bool,
    observers: Vec<Arc<dyn GenerationObserver>>,
    factories: AspectFactoryRegistry,
    weavers: Vec<Box<dyn MemberWeaver>>,
}

impl Default for WeaverBuilder {
    fn default() -> Self {
        Self {
            policy: RethrowPolicy::default(),
            emit_source: true,
            observers: Vec::new(),
            factories: AspectFactoryRegistry::new(),
            weavers: Vec::new(),
        }
    }
}

impl WeaverBuilder {
    /// Error stage policy
    pub fn policy(mut self, policy: RethrowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Keep rendered listings on woven types
    pub fn emit_source(mut self, emit_source: bool) -> Self {
        self.emit_source = emit_source;
        self
    }

    /// Add a generation observer
    pub fn observer(mut self, observer: Arc<dyn GenerationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Replace the aspect factory registry
    pub fn factories(mut self, factories: AspectFactoryRegistry) -> Self {
        self.factories = factories;
        self
    }

    /// Register an aspect factory for marker specs named `name`
    pub fn factory<N, F>(mut self, name: N, factory: F) -> Self
    where
        N: Into<String>,
        F: Fn(&MarkerSpec) -> Result<AspectHandle> + Send + Sync + 'static,
    {
        self.factories.register(name, factory);
        self
    }

    /// Add a member weaver ahead of the default ones
    pub fn weaver(mut self, weaver: Box<dyn MemberWeaver>) -> Self {
        self.weavers.push(weaver);
        self
    }

    /// Build the weaver
    pub fn build(self) -> Weaver {
        let mut generator = ProxyTypeGenerator::new(self.policy)
            .with_factories(self.factories)
            .with_emit_source(self.emit_source);
        for observer in self.observers {
            generator = generator.with_observer(observer);
        }
        // with_weaver prepends; reverse keeps the order they were added in
        for weaver in self.weavers.into_iter().rev() {
            generator = generator.with_weaver(weaver);
        }
        Weaver {
            cache: GeneratedTypeCache::new(),
            generator,
        }
    }
}
