//! Proxy type generator
//!
//! Builds the [`WovenType`] of one `(contract, implementation)` pair:
//!
//! 1. validate the contract's slot table;
//! 2. resolve members and apply marker selectors;
//! 3. reconstruct class and member markers;
//! 4. weave every member through the matching weaver;
//! 5. render the listing and hand it to `on_code_generated` observers;
//! 6. report the attempt to `on_build_complete` observers, success or failure.
//!
//! Generation is deterministic for a given pair, so the cache may discard a
//! duplicate build produced by a racing thread.

use crate::domain_services::executor::AspectExecutor;
use crate::domain_services::resolution::resolve_members;
use crate::ports::registry::aspects::AspectFactoryRegistry;
use crate::utils::TimedOperation;
use crate::weavers::{MemberWeaver, WeaveContext, default_weavers};
use crate::woven::{WovenMember, WovenType, proxy_type_name};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use weft_domain::{
    BuildReport, ContractDescriptor, Diagnostic, Error, GeneratedSource, GenerationObserver,
    ImplementationDescriptor, Marker, MarkerDeclaration, Result, RethrowPolicy,
};

/// Builds woven types
pub struct ProxyTypeGenerator {
    executor: AspectExecutor,
    factories: AspectFactoryRegistry,
    observers: Vec<Arc<dyn GenerationObserver>>,
    weavers: Vec<Box<dyn MemberWeaver>>,
    emit_source: bool,
}

impl Default for ProxyTypeGenerator {
    fn default() -> Self {
        Self::new(RethrowPolicy::default())
    }
}

impl ProxyTypeGenerator {
    /// Generator with the default weavers and linked aspect factories
    pub fn new(policy: RethrowPolicy) -> Self {
        Self {
            executor: AspectExecutor::new(policy),
            factories: AspectFactoryRegistry::new(),
            observers: Vec::new(),
            weavers: default_weavers(),
            emit_source: true,
        }
    }

    /// Use `factories` to reconstruct marker specs
    pub fn with_factories(mut self, factories: AspectFactoryRegistry) -> Self {
        self.factories = factories;
        self
    }

    /// Add an observer
    pub fn with_observer(mut self, observer: Arc<dyn GenerationObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Keep the rendered listing on generated woven types
    pub fn with_emit_source(mut self, emit_source: bool) -> Self {
        self.emit_source = emit_source;
        self
    }

    /// Add a weaver, consulted before the ones already installed
    pub fn with_weaver(mut self, weaver: Box<dyn MemberWeaver>) -> Self {
        self.weavers.insert(0, weaver);
        self
    }

    /// Error stage policy of generated members
    pub fn policy(&self) -> RethrowPolicy {
        self.executor.policy()
    }

    /// Aspect factories used for marker specs
    pub fn factories(&self) -> &AspectFactoryRegistry {
        &self.factories
    }

    /// Generate the woven type of `contract` over `implementation`
    ///
    /// `NoMatchingMember` is returned as is; every other failure becomes
    /// `Error::Generation` carrying the diagnostics of the attempt.
    pub fn generate(
        &self,
        contract: &ContractDescriptor,
        implementation: &ImplementationDescriptor,
    ) -> Result<WovenType> {
        let timer = TimedOperation::start();
        let mut diagnostics = Vec::new();
        let outcome = self
            .build(contract, implementation, &mut diagnostics)
            .map_err(|error| match error {
                Error::NoMatchingMember { .. } | Error::Generation { .. } => error,
                other => Error::Generation {
                    contract: contract.name().to_string(),
                    implementation: implementation.type_name().to_string(),
                    message: other.to_string(),
                    diagnostics: diagnostics.clone(),
                },
            });

        let mut report = BuildReport {
            contract: contract.name().to_string(),
            implementation: implementation.type_name().to_string(),
            success: outcome.is_ok(),
            diagnostics,
            elapsed: timer.elapsed(),
        };
        if let Err(error) = &outcome {
            report.diagnostics.push(Diagnostic::error(None, error.to_string()));
        }
        for observer in &self.observers {
            observer.on_build_complete(&report);
        }

        match &outcome {
            Ok(woven) => info!(
                woven_type = woven.type_name(),
                members = woven.members().len(),
                elapsed_us = timer.elapsed_micros(),
                "Generated woven type"
            ),
            Err(error) => warn!(
                contract = contract.name(),
                implementation = implementation.type_name(),
                error = %error,
                "Woven type generation failed"
            ),
        }
        outcome
    }

    fn build(
        &self,
        contract: &ContractDescriptor,
        implementation: &ImplementationDescriptor,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<WovenType> {
        let fail = |message: String, diagnostics: &[Diagnostic]| Error::Generation {
            contract: contract.name().to_string(),
            implementation: implementation.type_name().to_string(),
            message,
            diagnostics: diagnostics.to_vec(),
        };

        for slot in 0..contract.slot_count() {
            if contract.accessor(slot).is_none() {
                return Err(fail(format!("contract has no accessor in slot {slot}"), diagnostics.as_slice()));
            }
        }

        let resolution = resolve_members(contract, implementation)?;
        for diagnostic in &resolution.diagnostics {
            warn!(contract = contract.name(), "{diagnostic}");
        }
        diagnostics.extend(resolution.diagnostics);

        let class_markers = self
            .reconstruct_all(implementation.class_markers().iter())
            .map_err(|e| {
                diagnostics.push(Diagnostic::error(None, e.to_string()));
                fail(e.to_string(), diagnostics.as_slice())
            })?;
        let context = WeaveContext {
            contract: contract.name(),
            implementation: implementation.type_name(),
            class_markers: Some(class_markers.as_slice()),
            executor: self.executor,
        };

        let mut slots: Vec<Option<WovenMember>> = vec![None; contract.slot_count()];
        let mut fragments = Vec::with_capacity(resolution.members.len());
        for resolved in &resolution.members {
            let markers = self
                .reconstruct_all(resolved.implementation.markers().iter())
                .map_err(|e| {
                    diagnostics.push(Diagnostic::error(Some(resolved.contract.name().to_string()), e.to_string()));
                    fail(e.to_string(), diagnostics.as_slice())
                })?;
            let weaver = self
                .weavers
                .iter()
                .find(|w| w.supports(resolved.contract))
                .ok_or_else(|| {
                    fail(
                        format!("no weaver supports {} '{}'", resolved.contract.kind_label(), resolved.contract.name()),
                        diagnostics.as_slice(),
                    )
                })?;
            let fragment = weaver.weave(&context, resolved.contract, &markers)?;
            debug!(weaver = weaver.name(), member = resolved.contract.name(), "Member woven");
            for member in fragment.members {
                let slot = member.descriptor().slot();
                match slots.get_mut(slot) {
                    Some(entry) => *entry = Some(member),
                    None => return Err(fail(format!("woven member slot {slot} is out of range"), diagnostics.as_slice())),
                }
            }
            fragments.push(fragment.source);
        }

        let members = slots
            .into_iter()
            .enumerate()
            .map(|(slot, member)| member.ok_or(slot))
            .collect::<std::result::Result<Vec<_>, usize>>()
            .map_err(|slot| fail(format!("no member was woven for slot {slot}"), diagnostics.as_slice()))?;

        let source = render_listing(contract.name(), implementation.type_name(), &fragments);
        let generated = GeneratedSource {
            contract: contract.name().to_string(),
            implementation: implementation.type_name().to_string(),
            type_name: proxy_type_name(contract.name(), implementation.type_name()),
            source,
        };
        for observer in &self.observers {
            observer.on_code_generated(&generated).map_err(|e| {
                fail(format!("code generation hook rejected the listing: {e}"), diagnostics.as_slice())
            })?;
        }

        Ok(WovenType::new(
            generated.contract,
            generated.implementation,
            members,
            self.emit_source.then_some(generated.source),
            diagnostics.clone(),
            self.executor.policy(),
        ))
    }

    fn reconstruct_all<'d, I>(&self, declarations: I) -> Result<Vec<Marker>>
    where
        I: Iterator<Item = &'d MarkerDeclaration>,
    {
        declarations.map(|d| self.factories.resolve(d)).collect()
    }
}

impl fmt::Debug for ProxyTypeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyTypeGenerator")
            .field("policy", &self.executor.policy())
            .field("observers", &self.observers.len())
            .field("weavers", &self.weavers.iter().map(|w| w.name()).collect::<Vec<_>>())
            .field("emit_source", &self.emit_source)
            .finish()
    }
}

fn render_listing(contract: &str, implementation: &str, fragments: &[String]) -> String {
    let type_name = proxy_type_name(contract, implementation);
    let mut source = format!(
        "// woven by weft\nstruct {type_name} {{\n    target: Arc<{implementation}>,\n    woven: Arc<WovenType>,\n}}\n\nimpl {contract} for {type_name} {{\n"
    );
    source.push_str(&fragments.join("\n"));
    source.push_str("}\n");
    source
}
