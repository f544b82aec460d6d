//! Event weaver

use super::{MemberWeaver, WeaveContext, WovenFragment, render_accessor};
use crate::woven::WovenMember;
use tracing::debug;
use weft_domain::{ContractMember, Error, Marker, Result};

/// Forwards event subscription accessors without weaving
///
/// Markers on events are ignored; the accessors are still listed in the
/// woven type as pass-through members.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventWeaver;

impl MemberWeaver for EventWeaver {
    fn name(&self) -> &'static str {
        "event"
    }

    fn supports(&self, member: &ContractMember) -> bool {
        matches!(member, ContractMember::Event { .. })
    }

    fn weave(
        &self,
        context: &WeaveContext<'_>,
        member: &ContractMember,
        markers: &[Marker],
    ) -> Result<WovenFragment> {
        let ContractMember::Event { name, add, remove } = member else {
            return Err(Error::internal(format!(
                "event weaver received {} '{}'",
                member.kind_label(),
                member.name()
            )));
        };
        if !markers.is_empty() {
            debug!(contract = context.contract, event = %name, "Markers on events are ignored");
        }

        let mut source = format!("    // event {name}\n");
        let mut members = Vec::with_capacity(2);
        for accessor in add.iter().chain(remove.iter()) {
            let woven = WovenMember::passthrough(accessor.clone());
            render_accessor(&mut source, &woven);
            members.push(woven);
        }

        Ok(WovenFragment { members, source })
    }
}
