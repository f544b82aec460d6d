//! # Weft
//!
//! Aspect weaving for Rust traits. `#[weft::contract]` turns a trait into a
//! weaving contract; the [`Weaver`] wraps any implementation of it in a
//! proxy that runs entry, exit and error aspects around every call.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use weft::{EntryAspect, Implementation, ImplementationDescriptor, Marker, Weaver};
//!
//! #[weft::contract]
//! pub trait Calculator {
//!     fn add(&self, a: i32, b: i32) -> i32;
//! }
//!
//! struct Basic;
//!
//! impl Calculator for Basic {
//!     fn add(&self, a: i32, b: i32) -> i32 {
//!         a + b
//!     }
//! }
//!
//! impl Implementation for Basic {
//!     fn descriptor() -> ImplementationDescriptor {
//!         ImplementationDescriptor::builder::<Self>()
//!             .on("add", Marker::entry(CountCalls::default(), 0))
//!             .build()
//!     }
//! }
//!
//! let calculator = Weaver::global().wrap::<CalculatorContract, _>(Basic)?;
//! assert_eq!(calculator.add(2, 3), 5);
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Descriptor model, markers, aspect and observer ports, errors
//! - `application` - Aspect execution, member weavers, proxy type generation
//! - `infrastructure` - Generated type cache, configuration, logging, registration

// Lets `::weft::` paths emitted by `#[contract]` resolve inside this crate's own tests
extern crate self as weft;

/// Domain layer - descriptor model, markers and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use weft_domain::*;
}

/// Application layer - weaving engine
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use weft_application::*;
}

/// Infrastructure layer - cache, config, logging and registration surface
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use weft_infrastructure::*;
}

// Re-export commonly used types at the crate root
pub use domain::*;

pub use application::{
    ASPECT_FACTORIES, AspectChain, AspectExecutor, AspectFactory, AspectFactoryEntry,
    AspectFactoryRegistry, MemberWeaver, ObjectContract, ProxyTypeGenerator, Weave, WeaveContext,
    Woven, WovenFragment, WovenMember, WovenProxy, WovenType, list_aspect_factories,
};

pub use infrastructure::config::{LoggingConfig, WeavingConfig};
pub use infrastructure::registration::list_exports;
pub use infrastructure::{
    CacheKey, ConfigLoader, ExportEntry, GeneratedTypeCache, ServiceCatalog, TracingObserver,
    WOVEN_EXPORTS, Weaver, WeaverBuilder, WeftConfig, register_export,
};

pub use linkme;
pub use weft_macros::contract;

/// Items referenced by `#[contract]` output. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use weft_application::{ObjectContract, Weave, Woven, WovenProxy};
    pub use weft_domain::constants::{INDEXER_MEMBER_NAME, SETTER_VALUE_PARAMETER};
    pub use weft_domain::{
        Capture, CaptureOpaque, CaptureSerialize, Contract, ContractDescriptor, Direction, Fallback,
        FallbackDefault, FallbackNone, Implementation, MemberDescriptor, MemberKind, ParameterBag,
        ParameterValue, Result,
    };
}
