//! Method weaver

use super::{MemberWeaver, WeaveContext, WovenFragment, render_accessor, weave_accessor};
use tracing::debug;
use weft_domain::{ContractMember, Error, Marker, Result};

/// Weaves ordinary and generic methods
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodWeaver;

impl MemberWeaver for MethodWeaver {
    fn name(&self) -> &'static str {
        "method"
    }

    fn supports(&self, member: &ContractMember) -> bool {
        matches!(member, ContractMember::Method(_))
    }

    fn weave(
        &self,
        context: &WeaveContext<'_>,
        member: &ContractMember,
        markers: &[Marker],
    ) -> Result<WovenFragment> {
        let ContractMember::Method(descriptor) = member else {
            return Err(Error::internal(format!(
                "method weaver received {} '{}'",
                member.kind_label(),
                member.name()
            )));
        };

        let woven = weave_accessor(context, descriptor, markers);
        debug!(
            contract = context.contract,
            method = descriptor.function(),
            generic_arity = descriptor.generic_arity(),
            "Woven method"
        );

        let mut source = String::new();
        render_accessor(&mut source, &woven);
        Ok(WovenFragment {
            members: vec![woven],
            source,
        })
    }
}
