//! Member resolution
//!
//! Maps every contract member to the implementation member that backs it and
//! attaches selector markers to implementation members.
//!
//! Matching rules, in order:
//! 1. same name, kind and normalized parameter types;
//! 2. same name, kind, parameter count and generic arity, when exactly one
//!    implementation member qualifies (tolerates renamed type parameters);
//! 3. otherwise `Error::NoMatchingMember`, listing the candidates when the
//!    fallback was ambiguous.

use tracing::debug;
use weft_domain::{
    ContractDescriptor, ContractMember, Diagnostic, Error, ImplementationDescriptor,
    ImplementationMember, ImplementationMemberKind, Result,
};

/// A contract member paired with its implementation member
#[derive(Debug, Clone)]
pub struct ResolvedMember<'a> {
    /// Contract side
    pub contract: &'a ContractMember,
    /// Implementation side, selector markers applied
    pub implementation: ImplementationMember,
}

/// Output of [`resolve_members`]
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// One entry per contract member, in contract order
    pub members: Vec<ResolvedMember<'a>>,
    /// Diagnostics collected while resolving
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve every member of `contract` against `implementation`
pub fn resolve_members<'a>(
    contract: &'a ContractDescriptor,
    implementation: &ImplementationDescriptor,
) -> Result<Resolution<'a>> {
    let mut candidates = implementation.members_for(contract.members());
    let mut diagnostics = Vec::new();

    for selector in implementation.selectors() {
        let mut matched = false;
        for member in candidates.iter_mut().filter(|m| selector.matches(m)) {
            member.push_markers(selector.markers().iter().cloned());
            matched = true;
        }
        if !matched {
            diagnostics.push(Diagnostic::warning(
                Some(selector.describe()),
                format!(
                    "markers attached to '{}' match no member of '{}'",
                    selector.describe(),
                    implementation.type_name()
                ),
            ));
        }
    }

    let mut members = Vec::with_capacity(contract.members().len());
    for member in contract.members() {
        let resolved = match_member(contract.name(), implementation.type_name(), member, &candidates)?;
        debug!(
            contract = contract.name(),
            member = member.name(),
            resolved = %resolved,
            "Resolved contract member"
        );
        members.push(ResolvedMember {
            contract: member,
            implementation: resolved.clone(),
        });
    }

    Ok(Resolution {
        members,
        diagnostics,
    })
}

fn match_member<'c>(
    contract: &str,
    implementation: &str,
    member: &ContractMember,
    candidates: &'c [ImplementationMember],
) -> Result<&'c ImplementationMember> {
    let kind = ImplementationMemberKind::of(member);
    let types = member.parameter_types();
    let named: Vec<&ImplementationMember> = candidates
        .iter()
        .filter(|c| c.kind() == kind && c.name() == member.name())
        .collect();

    if let Some(exact) = named.iter().copied().find(|c| {
        c.parameter_types()
            .iter()
            .map(String::as_str)
            .eq(types.iter().copied())
    }) {
        return Ok(exact);
    }

    let shaped: Vec<&ImplementationMember> = named
        .into_iter()
        .filter(|c| c.parameter_types().len() == types.len() && c.generic_arity() == member.generic_arity())
        .collect();

    match shaped.as_slice() {
        [only] => {
            debug!(
                member = member.name(),
                "Resolved by arity fallback (type parameter names differ)"
            );
            Ok(*only)
        }
        [] => Err(Error::no_matching_member(contract, implementation, member.signature())),
        ambiguous => Err(Error::NoMatchingMember {
            contract: contract.to_string(),
            implementation: implementation.to_string(),
            member: member.signature(),
            candidates: ambiguous.iter().map(|c| c.signature()).collect(),
        }),
    }
}
