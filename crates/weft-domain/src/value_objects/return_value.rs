//! Type-erased return slot shared by the aspects of one call
//!
//! An empty slot at the end of a call stands for the declared type's
//! default. Types without a default have no such value; the proxy learns
//! which case applies through the `Fallback` probe:
//!
//! ```ignore
//! use weft::__private::{Fallback, FallbackDefault as _, FallbackNone as _};
//! let fallback = (&Fallback::<T>::new()).fallback();
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// Return value of a woven call
///
/// Seeded empty. The forwarded call fills it; aspects may read, replace or
/// clear it.
#[derive(Default)]
pub struct ReturnValue {
    value: Option<Box<dyn Any + Send>>,
    type_name: Option<&'static str>,
}

impl ReturnValue {
    /// Empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous one
    pub fn set<T: Any + Send>(&mut self, value: T) {
        self.value = Some(Box::new(value));
        self.type_name = Some(std::any::type_name::<T>());
    }

    /// Borrow the value if it has type `T`
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.as_ref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Mutably borrow the value if it has type `T`
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.as_mut().and_then(|v| v.downcast_mut::<T>())
    }

    /// Take the value if it has type `T`; a value of another type stays in place
    pub fn take<T: Any>(&mut self) -> Option<T> {
        match self.value.take() {
            Some(value) => match value.downcast::<T>() {
                Ok(typed) => {
                    self.type_name = None;
                    Some(*typed)
                }
                Err(other) => {
                    self.value = Some(other);
                    None
                }
            },
            None => None,
        }
    }

    /// Reset to the default
    pub fn clear(&mut self) {
        self.value = None;
        self.type_name = None;
    }

    /// Whether the slot is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Type name of the stored value
    pub fn type_name(&self) -> Option<&'static str> {
        self.type_name
    }

    /// Cast to `T`; `Ok(None)` when empty, `Err(self)` when the type differs
    pub fn try_into_typed<T: Any>(mut self) -> Result<Option<T>, Self> {
        if self.value.is_none() {
            return Ok(None);
        }
        match self.take::<T>() {
            Some(value) => Ok(Some(value)),
            None => Err(self),
        }
    }

    /// Final cast for types with a default
    ///
    /// # Panics
    ///
    /// Panics when an aspect stored a value of another type than the member
    /// declares.
    pub fn into_typed<T: Any + Default>(self, member: &str) -> T {
        self.into_typed_or(member, Some(T::default))
    }

    /// Final cast performed by the proxy; an empty slot yields `fallback()`
    ///
    /// # Panics
    ///
    /// Panics when an aspect stored a value of another type than the member
    /// declares, or when the slot is empty and `T` has no fallback.
    pub fn into_typed_or<T: Any>(self, member: &str, fallback: Option<fn() -> T>) -> T {
        match self.try_into_typed::<T>() {
            Ok(Some(value)) => value,
            Ok(None) => match fallback {
                Some(fallback) => fallback(),
                None => panic!(
                    "return value of '{member}' is empty and {} has no default; \
                     an aspect that vetoes or swallows this member must set it",
                    std::any::type_name::<T>()
                ),
            },
            Err(slot) => panic!(
                "return value of '{member}' holds a {} but the member returns {}",
                slot.type_name.unwrap_or("<unknown>"),
                std::any::type_name::<T>()
            ),
        }
    }
}

/// Fallback probe; see the module docs
pub struct Fallback<T>(PhantomData<fn() -> T>);

impl<T> Fallback<T> {
    /// Probe for `T`
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Fallback<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Preferred fallback: `T::default`
pub trait FallbackDefault<T> {
    /// Value of an empty slot, if any
    fn fallback(&self) -> Option<fn() -> T>;
}

impl<T: Default> FallbackDefault<T> for Fallback<T> {
    fn fallback(&self) -> Option<fn() -> T> {
        Some(T::default)
    }
}

/// No fallback for types without a default
pub trait FallbackNone<T> {
    /// Value of an empty slot, if any
    fn fallback(&self) -> Option<fn() -> T>;
}

impl<T> FallbackNone<T> for &Fallback<T> {
    fn fallback(&self) -> Option<fn() -> T> {
        None
    }
}

impl fmt::Debug for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_name {
            Some(name) => write!(f, "ReturnValue({name})"),
            None => f.write_str("ReturnValue(<default>)"),
        }
    }
}
