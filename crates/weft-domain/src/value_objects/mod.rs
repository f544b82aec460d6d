//! Value objects of the weaving domain
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`descriptor`] | Contract members, parameters and their directions |
//! | [`implementation`] | Implementation members and marker selectors |
//! | [`marker`] | Interceptor markers and their reconstructible form |
//! | [`parameters`] | Per-call parameter bag |
//! | [`return_value`] | Type-erased return slot shared with aspects |
//! | [`fault`] | Failure view handed to error aspects |
//! | [`generated`] | Diagnostics, generated source and build reports |
//! | [`policy`] | Error stage rethrow policy |

pub mod descriptor;
pub mod fault;
pub mod generated;
pub mod implementation;
pub mod marker;
pub mod parameters;
pub mod policy;
pub mod return_value;

pub use descriptor::{
    ContractDescriptor, ContractDescriptorBuilder, ContractMember, Direction, MemberDescriptor,
    MemberKind, ParameterDescriptor, normalize_type_name,
};
pub use fault::{Fault, FaultSlot};
pub use generated::{BuildReport, Diagnostic, GeneratedSource, Severity};
pub use implementation::{
    ImplementationDescriptor, ImplementationDescriptorBuilder, ImplementationMember,
    ImplementationMemberKind, MemberSelector,
};
pub use marker::{AspectHandle, Marker, MarkerArgument, MarkerDeclaration, MarkerSpec, Stage};
pub use parameters::{Capture, CaptureOpaque, CaptureSerialize, ParameterBag, ParameterValue};
pub use policy::RethrowPolicy;
pub use return_value::{Fallback, FallbackDefault, FallbackNone, ReturnValue};
