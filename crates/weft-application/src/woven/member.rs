//! Woven member and its invocation skeleton

use crate::domain_services::executor::{AspectChain, AspectExecutor};
use crate::utils::TimedOperation;
use std::any::Any;
use std::error::Error as StdError;
use weft_domain::{Fault, FaultSlot, MemberDescriptor, ParameterBag, ReturnValue, Stage};

/// One accessor of a woven type with its ordered aspect chains
#[derive(Debug, Clone)]
pub struct WovenMember {
    descriptor: MemberDescriptor,
    entry: AspectChain,
    exit: AspectChain,
    error: AspectChain,
    executor: AspectExecutor,
    passthrough: bool,
}

impl WovenMember {
    /// Member woven with the given chains
    pub fn woven(
        descriptor: MemberDescriptor,
        entry: AspectChain,
        exit: AspectChain,
        error: AspectChain,
        executor: AspectExecutor,
    ) -> Self {
        Self {
            descriptor,
            entry,
            exit,
            error,
            executor,
            passthrough: false,
        }
    }

    /// Member forwarded without any aspect
    pub fn passthrough(descriptor: MemberDescriptor) -> Self {
        Self {
            descriptor,
            entry: AspectChain::empty(Stage::Entry),
            exit: AspectChain::empty(Stage::Exit),
            error: AspectChain::empty(Stage::Error),
            executor: AspectExecutor::default(),
            passthrough: true,
        }
    }

    /// Accessor descriptor
    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.descriptor
    }

    /// Chain of `stage`
    pub fn chain(&self, stage: Stage) -> &AspectChain {
        match stage {
            Stage::Entry => &self.entry,
            Stage::Exit => &self.exit,
            Stage::Error => &self.error,
        }
    }

    /// Whether calls skip the aspect machinery
    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    /// Invoke an infallible member returning a type with a default
    pub fn invoke<T, F>(&self, params: ParameterBag, body: F) -> T
    where
        T: Any + Send + Default,
        F: FnOnce() -> T,
    {
        self.invoke_or(params, Some(T::default), body)
    }

    /// Invoke an infallible member
    ///
    /// Entry aspects may veto the body, in which case their return value
    /// stands and no exit aspect runs. Otherwise exit aspects run after the
    /// body, also when it unwinds. A call that ends with an empty return
    /// slot yields `fallback()`.
    ///
    /// # Panics
    ///
    /// Panics when the return slot ends empty and there is no fallback, or
    /// holds a value of another type than `T`.
    pub fn invoke_or<T, F>(&self, params: ParameterBag, fallback: Option<fn() -> T>, body: F) -> T
    where
        T: Any + Send,
        F: FnOnce() -> T,
    {
        if self.passthrough {
            return body();
        }
        let mut ret = ReturnValue::new();
        let timer = TimedOperation::start();
        if self.executor.run_entry(&self.entry, &self.descriptor, &params, &mut ret) {
            let guard = ExitGuard::arm(self, &params, timer);
            let value = body();
            ret.set(value);
            guard.complete(&mut ret);
        }
        ret.into_typed_or(self.descriptor.function(), fallback)
    }

    /// Invoke a member returning `Result<T, E>` where `T` has a default
    pub fn invoke_fallible<T, E, F>(&self, params: ParameterBag, body: F) -> Result<T, E>
    where
        T: Any + Send + Default,
        E: StdError + Send + Sync + 'static + From<Fault>,
        F: FnOnce() -> Result<T, E>,
    {
        self.invoke_fallible_or(params, Some(T::default), body)
    }

    /// Invoke a member returning `Result<T, E>`
    ///
    /// A failure goes through the error stage. When the stage rethrows, the
    /// caller gets the original error unless an aspect installed a
    /// substitute; a substitute of type `E` is returned as is, any other
    /// substitute goes through `E::from`. When the stage swallows, the
    /// return value stands, falling back to `fallback()` when empty.
    ///
    /// # Panics
    ///
    /// Same as [`WovenMember::invoke_or`].
    pub fn invoke_fallible_or<T, E, F>(
        &self,
        params: ParameterBag,
        fallback: Option<fn() -> T>,
        body: F,
    ) -> Result<T, E>
    where
        T: Any + Send,
        E: StdError + Send + Sync + 'static + From<Fault>,
        F: FnOnce() -> Result<T, E>,
    {
        if self.passthrough {
            return body();
        }
        let mut ret = ReturnValue::new();
        let timer = TimedOperation::start();
        if self.executor.run_entry(&self.entry, &self.descriptor, &params, &mut ret) {
            let guard = ExitGuard::arm(self, &params, timer);
            match body() {
                Ok(value) => ret.set(value),
                Err(error) => {
                    let mut fault = FaultSlot::new(&error);
                    let rethrow = self
                        .executor
                        .run_error(&self.error, &self.descriptor, &params, &mut fault, &mut ret);
                    let substitute = fault.into_substitute();
                    if rethrow {
                        guard.complete(&mut ret);
                        return Err(match substitute {
                            None => error,
                            Some(fault) => fault.downcast::<E>().unwrap_or_else(E::from),
                        });
                    }
                }
            }
            guard.complete(&mut ret);
        }
        Ok(ret.into_typed_or(self.descriptor.function(), fallback))
    }

    fn run_exit(&self, params: &ParameterBag, ret: &mut ReturnValue, timer: TimedOperation) {
        self.executor
            .run_exit(&self.exit, &self.descriptor, params, ret, timer.elapsed());
    }
}

/// Runs the exit stage exactly once: explicitly through `complete`, or on drop
/// while unwinding out of the body
struct ExitGuard<'a> {
    member: &'a WovenMember,
    params: &'a ParameterBag,
    timer: TimedOperation,
    armed: bool,
}

impl<'a> ExitGuard<'a> {
    fn arm(member: &'a WovenMember, params: &'a ParameterBag, timer: TimedOperation) -> Self {
        Self {
            member,
            params,
            timer,
            armed: true,
        }
    }

    fn complete(mut self, ret: &mut ReturnValue) {
        self.armed = false;
        self.member.run_exit(self.params, ret, self.timer);
    }
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut ret = ReturnValue::new();
            self.member.run_exit(self.params, &mut ret, self.timer);
        }
    }
}
