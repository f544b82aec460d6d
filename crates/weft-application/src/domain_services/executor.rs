//! Aspect executor
//!
//! Discovers the markers that apply to a member, orders them, and runs the
//! entry, exit and error stages of the invocation skeleton. Execution is
//! strictly sequential on the caller's thread; aspect panics propagate.

use std::time::Duration;
use tracing::debug;
use weft_domain::{
    AspectHandle, FaultSlot, Marker, MemberDescriptor, ParameterBag, ReturnValue, RethrowPolicy,
    Stage,
};

/// Ordered markers of one stage
#[derive(Debug, Clone)]
pub struct AspectChain {
    stage: Stage,
    markers: Vec<Marker>,
}

impl AspectChain {
    /// Chain without aspects
    pub fn empty(stage: Stage) -> Self {
        Self {
            stage,
            markers: Vec::new(),
        }
    }

    /// Stage of the chain
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Markers in execution order
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Number of aspects
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the chain has no aspects
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// `order:name` labels in execution order
    pub fn labels(&self) -> Vec<String> {
        self.markers
            .iter()
            .map(|m| format!("{}:{}", m.order(), m.name()))
            .collect()
    }
}

/// Runs aspect chains according to a rethrow policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AspectExecutor {
    policy: RethrowPolicy,
}

impl AspectExecutor {
    /// Executor using `policy` for the error stage
    pub fn new(policy: RethrowPolicy) -> Self {
        Self { policy }
    }

    /// Error stage policy
    pub fn policy(&self) -> RethrowPolicy {
        self.policy
    }

    /// Build the chain of `stage`
    ///
    /// Class markers (when a target type is known) come first, then member
    /// markers; the union is sorted by ascending order. The sort is stable,
    /// so equal orders keep discovery order.
    pub fn discover(class_markers: Option<&[Marker]>, member_markers: &[Marker], stage: Stage) -> AspectChain {
        let mut markers: Vec<Marker> = class_markers
            .unwrap_or_default()
            .iter()
            .chain(member_markers)
            .filter(|m| m.stage() == stage)
            .cloned()
            .collect();
        markers.sort_by_key(Marker::order);
        AspectChain { stage, markers }
    }

    /// Run entry aspects; the first `false` stops the chain and vetoes the body
    pub fn run_entry(
        &self,
        chain: &AspectChain,
        member: &MemberDescriptor,
        params: &ParameterBag,
        ret: &mut ReturnValue,
    ) -> bool {
        for marker in chain.markers() {
            if let AspectHandle::Entry(aspect) = marker.handle()
                && !aspect.on_entry(member, params, ret)
            {
                debug!(
                    member = member.function(),
                    aspect = marker.name(),
                    "Entry aspect vetoed the call"
                );
                return false;
            }
        }
        true
    }

    /// Run every exit aspect
    pub fn run_exit(
        &self,
        chain: &AspectChain,
        member: &MemberDescriptor,
        params: &ParameterBag,
        ret: &mut ReturnValue,
        duration: Duration,
    ) {
        for marker in chain.markers() {
            if let AspectHandle::Exit(aspect) = marker.handle() {
                aspect.on_exit(member, params, ret, duration);
            }
        }
    }

    /// Run every error aspect and return the rethrow decision
    ///
    /// An empty chain rethrows.
    pub fn run_error(
        &self,
        chain: &AspectChain,
        member: &MemberDescriptor,
        params: &ParameterBag,
        fault: &mut FaultSlot<'_>,
        ret: &mut ReturnValue,
    ) -> bool {
        let mut rethrow = true;
        for marker in chain.markers() {
            if let AspectHandle::Error(aspect) = marker.handle() {
                let decision = aspect.on_error(member, params, fault, ret);
                rethrow = self.policy.combine(rethrow, decision);
            }
        }
        debug!(
            member = member.function(),
            rethrow,
            substituted = fault.is_substituted(),
            "Error stage settled"
        );
        rethrow
    }
}
