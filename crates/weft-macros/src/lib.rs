//! Procedural macros for Weft
//!
//! `#[weft::contract]` turns a trait into a weavable contract. For
//! `trait Calculator` it emits, next to the trait itself:
//!
//! - `CalculatorContract`, a marker type implementing `Contract` that
//!   describes every trait function (slot, member kind, parameters and
//!   directions, return and error types, generic parameters);
//! - `CalculatorProxy<I>`, implementing `Calculator` over any
//!   `I: Calculator + Implementation` by routing each call through the woven
//!   member of its slot;
//! - `Weave<I>` and, for traits without generic methods, `ObjectContract<I>`
//!   on the marker type.
//!
//! Generated code refers to `::weft::__private`, so the facade crate must be
//! reachable as `weft`.

use proc_macro::TokenStream;
use syn::{ItemTrait, parse_macro_input};

mod expand;
mod model;

/// Make a trait weavable
///
/// Trait functions are methods unless marked:
///
/// - `#[property(get)]` / `#[property(set)]`, optionally `name = "..."`
///   (defaults to the function name without its `get_` / `set_` prefix);
/// - `#[indexer(get)]` / `#[indexer(set)]`, index parameters first and the
///   value last for setters;
/// - `#[event(add)]` / `#[event(remove)]`, optionally `name = "..."`
///   (defaults to the function name without its `add_` / `remove_` prefix).
///   Events are forwarded without aspects.
///
/// `&mut T` parameters are passed through; marking one `#[out]` resets it to
/// `Default::default()` before the call. Functions returning
/// `Result<T, E>` (spelled with both arguments) are woven as fallible and
/// their error stage sees `E`, which must implement `From<weft::Fault>`.
///
/// Rejected: supertraits, trait generics, associated consts and types,
/// `async fn`, receivers other than `&self`, functions without receiver and
/// `impl Trait` arguments.
///
/// ```ignore
/// #[weft::contract]
/// pub trait Calculator {
///     fn add(&self, a: i32, b: i32) -> i32;
///     fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError>;
///     #[property(get)]
///     fn precision(&self) -> u8;
///     #[property(set)]
///     fn set_precision(&self, value: u8);
/// }
/// ```
#[proc_macro_attribute]
pub fn contract(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[weft::contract] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let item = parse_macro_input!(item as ItemTrait);
    model::ContractModel::parse(item)
        .map(|model| expand::expand(&model))
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
