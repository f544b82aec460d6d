//! Proxy Ports
//!
//! Implemented by the code `#[weft::contract]` generates. `Weave<I>` lives on
//! the contract marker type (`CalculatorContract`), which keeps the impls
//! local to the crate declaring the trait.

use crate::woven::{Woven, WovenType};
use std::sync::Arc;
use weft_domain::{Contract, Implementation};

/// A generated proxy
pub trait WovenProxy: Send + Sync + 'static {
    /// Wrapped implementation type
    type Target;

    /// Proxy state
    fn woven(&self) -> &Woven<Self::Target>;

    /// Woven type shared by every proxy of the pair
    fn woven_type(&self) -> &Arc<WovenType> {
        self.woven().woven_type()
    }

    /// Wrapped implementation
    fn target(&self) -> &Self::Target {
        self.woven().target()
    }
}

/// A contract that can wrap implementation `I`
pub trait Weave<I: Implementation>: Contract {
    /// Proxy type implementing the contract over `I`
    type Proxy: WovenProxy<Target = I>;

    /// Build a proxy from its state
    fn assemble(woven: Woven<I>) -> Self::Proxy;
}

/// A contract whose proxies can be handed out as trait objects
///
/// Not available for traits with generic methods, which are not object safe.
pub trait ObjectContract<I: Implementation>: Weave<I> {
    /// Trait object type (`dyn Trait + Send + Sync`)
    type Object: ?Sized + Send + Sync + 'static;

    /// Erase a proxy into the contract's trait object
    fn into_object(proxy: Self::Proxy) -> Arc<Self::Object>;
}
