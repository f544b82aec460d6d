//! Domain Port Interfaces
//!
//! Boundary contracts between the weaving engine and the code around it.
//!
//! ## Organization
//!
//! - **aspects** - Entry, exit and error capabilities implemented by interceptors
//! - **contract** - Traits implemented by woven contracts and their implementations
//! - **container** - Composition container the registration surface writes into
//! - **observer** - Generation hooks (source produced, build finished)

/// Aspect capability traits
pub mod aspects;
/// Composition container port
pub mod container;
/// Contract and implementation traits
pub mod contract;
/// Generation observer port
pub mod observer;

pub use aspects::{EntryAspect, ErrorAspect, ExitAspect};
pub use container::{CompositionContainer, CreationPolicy, InstanceFactory, Registration};
pub use contract::{Contract, Implementation};
pub use observer::{GenerationObserver, HookError};
