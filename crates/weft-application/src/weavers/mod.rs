//! Member weavers
//!
//! One weaver per member kind. Each turns a resolved contract member and its
//! markers into the woven accessors of the member plus a listing fragment.
//!
//! | Weaver | Member kind |
//! |--------|-------------|
//! | [`MethodWeaver`] | Methods, including generic methods and `&mut` / `#[out]` parameters |
//! | [`PropertyWeaver`] | Property getter and setter |
//! | [`IndexerWeaver`] | Indexer getter and setter |
//! | [`EventWeaver`] | Event add and remove (pass-through) |

mod event;
mod indexer;
mod method;
mod property;

pub use event::EventWeaver;
pub use indexer::IndexerWeaver;
pub use method::MethodWeaver;
pub use property::PropertyWeaver;

use crate::domain_services::executor::AspectExecutor;
use crate::woven::WovenMember;
use weft_domain::constants::GENERIC_ARGUMENT_PREFIX;
use weft_domain::{ContractMember, Direction, Marker, MemberDescriptor, Result, Stage};

/// Inputs shared by every weaver of one generation attempt
#[derive(Debug, Clone, Copy)]
pub struct WeaveContext<'a> {
    /// Contract name
    pub contract: &'a str,
    /// Implementation name
    pub implementation: &'a str,
    /// Class-level markers; `None` when no target type is known
    pub class_markers: Option<&'a [Marker]>,
    /// Executor the woven members run with
    pub executor: AspectExecutor,
}

/// Woven accessors of one contract member and their listing
#[derive(Debug, Clone)]
pub struct WovenFragment {
    /// Woven accessors, one per accessor slot of the member
    pub members: Vec<WovenMember>,
    /// Listing fragment
    pub source: String,
}

/// Weaves one kind of contract member
pub trait MemberWeaver: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this weaver handles `member`
    fn supports(&self, member: &ContractMember) -> bool;

    /// Weave `member` with its member-level markers
    fn weave(
        &self,
        context: &WeaveContext<'_>,
        member: &ContractMember,
        markers: &[Marker],
    ) -> Result<WovenFragment>;
}

/// The weavers every generator starts with
pub fn default_weavers() -> Vec<Box<dyn MemberWeaver>> {
    vec![
        Box::new(MethodWeaver),
        Box::new(PropertyWeaver),
        Box::new(IndexerWeaver),
        Box::new(EventWeaver),
    ]
}

/// Weave one accessor with class and member markers
pub(crate) fn weave_accessor(
    context: &WeaveContext<'_>,
    descriptor: &MemberDescriptor,
    markers: &[Marker],
) -> WovenMember {
    WovenMember::woven(
        descriptor.clone(),
        AspectExecutor::discover(context.class_markers, markers, Stage::Entry),
        AspectExecutor::discover(context.class_markers, markers, Stage::Exit),
        AspectExecutor::discover(context.class_markers, markers, Stage::Error),
        context.executor,
    )
}

/// Render one accessor of the proxy listing
pub(crate) fn render_accessor(out: &mut String, member: &WovenMember) {
    let descriptor = member.descriptor();
    if member.is_passthrough() {
        line(out, "    // pass-through");
    } else {
        line(
            out,
            &format!(
                "    // entry [{}] exit [{}] error [{}]",
                member.chain(Stage::Entry).labels().join(", "),
                member.chain(Stage::Exit).labels().join(", "),
                member.chain(Stage::Error).labels().join(", ")
            ),
        );
    }

    line(out, &format!("    fn {} {{", signature_with_receiver(descriptor)));
    let arguments: Vec<&str> = descriptor.parameters().iter().map(|p| p.name()).collect();
    let forward = format!("self.target.{}({})", descriptor.function(), arguments.join(", "));

    if member.is_passthrough() {
        line(out, &format!("        {forward}"));
        line(out, "    }");
        return;
    }

    for parameter in descriptor.parameters() {
        if parameter.direction() == Direction::Out {
            line(out, &format!("        *{} = Default::default();", parameter.name()));
        }
    }
    let mut bag: Vec<String> = (0..descriptor.parameters().len())
        .map(|i| {
            let name = descriptor.parameters()[i].name();
            match descriptor.bag_name(i) {
                bag_name if bag_name == name => name.to_string(),
                bag_name => format!("{bag_name} = {name}"),
            }
        })
        .collect();
    bag.extend(
        descriptor
            .generics()
            .iter()
            .enumerate()
            .map(|(i, g)| format!("{GENERIC_ARGUMENT_PREFIX}{} = type {g}", i + 1)),
    );
    let invoke = if descriptor.is_fallible() {
        "invoke_fallible"
    } else {
        "invoke"
    };
    line(out, &format!("        let params = bag![{}];", bag.join(", ")));
    line(
        out,
        &format!("        self.woven.member({}).{invoke}(params, || {forward})", descriptor.slot()),
    );
    line(out, "    }");
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn signature_with_receiver(descriptor: &MemberDescriptor) -> String {
    let generics = if descriptor.generics().is_empty() {
        String::new()
    } else {
        format!("<{}>", descriptor.generics().join(", "))
    };
    let mut parameters = vec!["&self".to_string()];
    parameters.extend(
        descriptor
            .parameters()
            .iter()
            .map(|p| format!("{}: {}", p.name(), p.type_name())),
    );
    let returns = match (descriptor.return_type(), descriptor.error_type()) {
        (ok, Some(err)) => format!(" -> Result<{}, {err}>", ok.unwrap_or("()")),
        (Some(ok), None) => format!(" -> {ok}"),
        (None, None) => String::new(),
    };
    format!(
        "{}{generics}({}){returns}",
        descriptor.function(),
        parameters.join(", ")
    )
}
