//! Contract and Implementation Ports
//!
//! `Contract` is emitted by `#[weft::contract]` on a marker type named after
//! the trait (`CalculatorContract` for `trait Calculator`). `Implementation`
//! is implemented by hand on every type that gets wrapped.
//!
//! ## Example
//!
//! ```ignore
//! impl Implementation for BasicCalculator {
//!     fn descriptor() -> ImplementationDescriptor {
//!         ImplementationDescriptor::builder::<Self>()
//!             .class_marker(Marker::exit(Audit::default(), 0))
//!             .on("add", Marker::entry(Counter::default(), 1))
//!             .build()
//!     }
//! }
//! ```

use crate::error::Result;
use crate::value_objects::{ContractDescriptor, ImplementationDescriptor};

/// A trait that can be woven
pub trait Contract: 'static {
    /// Full path of the trait
    const NAME: &'static str;

    /// Describe the trait's members
    fn descriptor() -> Result<ContractDescriptor>;
}

/// A type that can be wrapped by a woven proxy
pub trait Implementation: Send + Sync + 'static {
    /// Class and member markers; evaluated once per woven type
    ///
    /// The default declares no markers and mirrors the contract's members.
    fn descriptor() -> ImplementationDescriptor
    where
        Self: Sized,
    {
        ImplementationDescriptor::builder::<Self>().build()
    }
}
