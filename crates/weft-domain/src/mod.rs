//! # Domain Layer
//!
//! Core types of the weaving subsystem. Nothing in this crate performs
//! weaving; it defines the vocabulary every other layer speaks.
//!
//! ## Module Categories
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`value_objects`] | Descriptor model, markers, parameter bag, return and fault slots |
//! | [`ports`] | Aspect capabilities, contract/implementation traits, container and observer ports |
//! | [`error`] | Error taxonomy shared by all layers |
//! | [`constants`] | Naming conventions (indexer name, setter value, generic arguments) |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::*;
pub use value_objects::*;
