//! Property weaver

use super::{MemberWeaver, WeaveContext, WovenFragment, render_accessor, weave_accessor};
use tracing::debug;
use weft_domain::{ContractMember, Error, Marker, Result};

/// Weaves property getters and setters
///
/// Both accessors share the property's markers. Setters expose their value
/// to aspects as `value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyWeaver;

impl MemberWeaver for PropertyWeaver {
    fn name(&self) -> &'static str {
        "property"
    }

    fn supports(&self, member: &ContractMember) -> bool {
        matches!(member, ContractMember::Property { .. })
    }

    fn weave(
        &self,
        context: &WeaveContext<'_>,
        member: &ContractMember,
        markers: &[Marker],
    ) -> Result<WovenFragment> {
        let ContractMember::Property { name, getter, setter } = member else {
            return Err(Error::internal(format!(
                "property weaver received {} '{}'",
                member.kind_label(),
                member.name()
            )));
        };

        let accessors = match (getter.is_some(), setter.is_some()) {
            (true, true) => "get; set;",
            (true, false) => "get;",
            (false, true) => "set;",
            (false, false) => "",
        };
        let mut source = format!("    // property {name} {{ {accessors} }}\n");
        let mut members = Vec::with_capacity(2);
        for accessor in getter.iter().chain(setter.iter()) {
            let woven = weave_accessor(context, accessor, markers);
            render_accessor(&mut source, &woven);
            members.push(woven);
        }
        debug!(contract = context.contract, property = %name, accessors = members.len(), "Woven property");

        Ok(WovenFragment { members, source })
    }
}
