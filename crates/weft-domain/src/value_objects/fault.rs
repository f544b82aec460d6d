//! Failure values seen by error aspects

use std::error::Error as StdError;
use std::fmt;

/// Owned, type-erased failure used as a substitute by error aspects
#[derive(Debug)]
pub struct Fault(Box<dyn StdError + Send + Sync + 'static>);

impl Fault {
    /// Wrap an error value
    pub fn new<E: StdError + Send + Sync + 'static>(error: E) -> Self {
        Self(Box::new(error))
    }

    /// Plain message fault
    pub fn msg<S: Into<String>>(message: S) -> Self {
        Self(Box::new(MessageFault(message.into())))
    }

    /// Recover the concrete error
    pub fn downcast<E: StdError + 'static>(self) -> Result<E, Self> {
        self.0.downcast::<E>().map(|e| *e).map_err(Self)
    }

    /// Borrow the concrete error
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    /// Borrow as a trait object
    pub fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Unwrap the boxed error
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.0
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

#[derive(Debug)]
struct MessageFault(String);

impl fmt::Display for MessageFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for MessageFault {}

/// The error stage's private view of a failure
///
/// Holds a borrow of the original error and an optional substitute. The
/// original is what propagates unless an aspect installs a substitute.
pub struct FaultSlot<'a> {
    original: &'a (dyn StdError + Send + Sync + 'static),
    substitute: Option<Fault>,
}

impl<'a> FaultSlot<'a> {
    /// View over `original`
    pub fn new(original: &'a (dyn StdError + Send + Sync + 'static)) -> Self {
        Self {
            original,
            substitute: None,
        }
    }

    /// Current failure: the substitute if one is installed, else the original
    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match &self.substitute {
            Some(fault) => fault.as_error(),
            None => self.original,
        }
    }

    /// The original failure
    pub fn original(&self) -> &'a (dyn StdError + Send + Sync + 'static) {
        self.original
    }

    /// Downcast the current failure
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.error().downcast_ref::<E>()
    }

    /// Install a substitute error
    pub fn substitute<E: StdError + Send + Sync + 'static>(&mut self, error: E) {
        self.substitute = Some(Fault::new(error));
    }

    /// Install a prepared substitute
    pub fn substitute_fault(&mut self, fault: Fault) {
        self.substitute = Some(fault);
    }

    /// Drop any substitute so the original propagates
    pub fn restore(&mut self) {
        self.substitute = None;
    }

    /// Whether a substitute is installed
    pub fn is_substituted(&self) -> bool {
        self.substitute.is_some()
    }

    /// Consume the slot, yielding the substitute
    pub fn into_substitute(self) -> Option<Fault> {
        self.substitute
    }
}

impl fmt::Debug for FaultSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultSlot")
            .field("error", &self.error().to_string())
            .field("substituted", &self.is_substituted())
            .finish()
    }
}
