//! Indexer weaver

use super::{MemberWeaver, WeaveContext, WovenFragment, render_accessor, weave_accessor};
use tracing::debug;
use weft_domain::constants::INDEXER_MEMBER_NAME;
use weft_domain::{ContractMember, Error, Marker, Result};

/// Weaves indexer getters and setters
///
/// Index parameters join the parameter bag like ordinary parameters; the
/// setter's value is exposed as `value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexerWeaver;

impl MemberWeaver for IndexerWeaver {
    fn name(&self) -> &'static str {
        "indexer"
    }

    fn supports(&self, member: &ContractMember) -> bool {
        matches!(member, ContractMember::Indexer { .. })
    }

    fn weave(
        &self,
        context: &WeaveContext<'_>,
        member: &ContractMember,
        markers: &[Marker],
    ) -> Result<WovenFragment> {
        let ContractMember::Indexer { getter, setter } = member else {
            return Err(Error::internal(format!(
                "indexer weaver received {} '{}'",
                member.kind_label(),
                member.name()
            )));
        };

        let mut source = format!(
            "    // {INDEXER_MEMBER_NAME}[{}]\n",
            member.parameter_types().join(", ")
        );
        let mut members = Vec::with_capacity(2);
        for accessor in getter.iter().chain(setter.iter()) {
            let woven = weave_accessor(context, accessor, markers);
            render_accessor(&mut source, &woven);
            members.push(woven);
        }
        debug!(contract = context.contract, accessors = members.len(), "Woven indexer");

        Ok(WovenFragment { members, source })
    }
}
