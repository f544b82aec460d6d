//! Application ports
//!
//! - **proxy** - Traits emitted by `#[weft::contract]` to assemble proxies
//! - **registry** - linkme registries (aspect factories)

pub mod proxy;
pub mod registry;

pub use proxy::{ObjectContract, Weave, WovenProxy};
pub use registry::aspects::{
    ASPECT_FACTORIES, AspectFactory, AspectFactoryEntry, AspectFactoryRegistry,
    list_aspect_factories,
};
