//! Domain services
//!
//! - **executor** - Aspect discovery, ordering and stage execution
//! - **resolution** - Contract to implementation member resolution

pub mod executor;
pub mod resolution;

pub use executor::{AspectChain, AspectExecutor};
pub use resolution::{Resolution, ResolvedMember, resolve_members};
