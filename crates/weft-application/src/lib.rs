//! Application Layer - Weft
//!
//! Implements the weaving engine on top of the domain vocabulary.
//!
//! ## Architecture
//!
//! The application layer:
//! - Discovers, orders and runs aspect chains (`domain_services::executor`)
//! - Resolves contract members against implementation members
//! - Weaves each member kind and renders the woven type listing
//! - Defines the proxy ports implemented by `#[weft::contract]` output
//! - Hosts the aspect factory registry (linkme)
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `weft-domain`: descriptor model, markers, aspect and observer ports
//! - Pure Rust libraries for logging and plugin registration

pub mod domain_services;
pub mod ports;
pub mod use_cases;
pub mod utils;
pub mod weavers;
pub mod woven;

pub use domain_services::*;
pub use ports::*;
pub use use_cases::*;
pub use weavers::{MemberWeaver, WeaveContext, WovenFragment};
pub use woven::{Woven, WovenMember, WovenType};
