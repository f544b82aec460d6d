//! Aspect Ports
//!
//! An aspect is any `Send + Sync` type implementing one or more of the three
//! stage capabilities. The same instance is shared by every call of every
//! proxy built from one woven type, so interior state needs its own
//! synchronization.

use crate::value_objects::{FaultSlot, MemberDescriptor, ParameterBag, ReturnValue};
use std::time::Duration;

/// Runs before the body
pub trait EntryAspect: Send + Sync {
    /// Return `false` to skip the body; `ret` then becomes the call's result
    fn on_entry(&self, member: &MemberDescriptor, params: &ParameterBag, ret: &mut ReturnValue) -> bool;
}

/// Runs after the body, whatever its outcome
pub trait ExitAspect: Send + Sync {
    /// Observe or replace the result; `duration` covers entry to exit
    fn on_exit(
        &self,
        member: &MemberDescriptor,
        params: &ParameterBag,
        ret: &mut ReturnValue,
        duration: Duration,
    );
}

/// Runs when the body fails
pub trait ErrorAspect: Send + Sync {
    /// Return `true` to rethrow (the original error, or the substitute
    /// installed in `fault`), `false` to swallow it and return `ret`
    fn on_error(
        &self,
        member: &MemberDescriptor,
        params: &ParameterBag,
        fault: &mut FaultSlot<'_>,
        ret: &mut ReturnValue,
    ) -> bool;
}
