//! Contract model
//!
//! Parses the annotated trait into accessors, one per trait function, and
//! strips the helper attributes (`#[property]`, `#[indexer]`, `#[event]`,
//! `#[out]`) from the trait that is emitted again.

use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{
    Attribute, Error, FnArg, GenericArgument, GenericParam, Ident, ItemTrait, Lifetime, LitStr,
    Pat, PathArguments, Result, ReturnType, Signature, TraitItem, TraitItemFn, Type,
    TypeParamBound,
};

/// Accessor kind, mirrors `weft_domain::MemberKind`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Method,
    PropertyGet,
    PropertySet,
    IndexerGet,
    IndexerSet,
    EventAdd,
    EventRemove,
}

impl Kind {
    /// Variant name of `MemberKind`
    pub(crate) fn variant(self) -> &'static str {
        match self {
            Self::Method => "Method",
            Self::PropertyGet => "PropertyGet",
            Self::PropertySet => "PropertySet",
            Self::IndexerGet => "IndexerGet",
            Self::IndexerSet => "IndexerSet",
            Self::EventAdd => "EventAdd",
            Self::EventRemove => "EventRemove",
        }
    }

    pub(crate) fn is_setter(self) -> bool {
        matches!(self, Self::PropertySet | Self::IndexerSet)
    }

    pub(crate) fn is_event(self) -> bool {
        matches!(self, Self::EventAdd | Self::EventRemove)
    }
}

/// Parameter direction, mirrors `weft_domain::Direction`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    In,
    Ref,
    Out,
}

impl Direction {
    pub(crate) fn variant(self) -> &'static str {
        match self {
            Self::In => "In",
            Self::Ref => "Ref",
            Self::Out => "Out",
        }
    }
}

pub(crate) struct Param {
    pub ident: Ident,
    pub ty: Type,
    pub direction: Direction,
}

pub(crate) enum Output {
    Unit,
    Value(Type),
    Fallible { ok: Type, err: Type },
}

/// One trait function
pub(crate) struct Accessor {
    pub slot: usize,
    /// Member name; `None` for indexers, which share the conventional name
    pub name: Option<String>,
    pub kind: Kind,
    /// Signature with helper attributes removed
    pub sig: Signature,
    pub params: Vec<Param>,
    /// Type parameters, in declaration order
    pub type_params: Vec<Ident>,
    /// Type and const parameters forwarded with a turbofish
    pub forwarded_generics: Vec<Ident>,
    pub output: Output,
}

pub(crate) struct ContractModel {
    /// The trait as emitted, helper attributes removed
    pub item: ItemTrait,
    pub accessors: Vec<Accessor>,
}

impl ContractModel {
    pub(crate) fn parse(mut item: ItemTrait) -> Result<Self> {
        if !item.generics.params.is_empty() || item.generics.where_clause.is_some() {
            return Err(Error::new(
                item.generics.span(),
                "#[weft::contract] does not support generic traits",
            ));
        }
        if !item.supertraits.is_empty() {
            return Err(Error::new(
                item.supertraits.span(),
                "#[weft::contract] does not support supertraits",
            ));
        }
        if let Some(unsafety) = &item.unsafety {
            return Err(Error::new(unsafety.span(), "#[weft::contract] does not support unsafe traits"));
        }
        if let Some(auto) = &item.auto_token {
            return Err(Error::new(auto.span(), "#[weft::contract] does not support auto traits"));
        }

        let mut accessors = Vec::with_capacity(item.items.len());
        for trait_item in &mut item.items {
            match trait_item {
                TraitItem::Fn(function) => {
                    let slot = accessors.len();
                    accessors.push(parse_function(slot, function)?);
                }
                TraitItem::Const(constant) => {
                    return Err(Error::new(
                        constant.span(),
                        "contracts cannot declare associated consts",
                    ));
                }
                TraitItem::Type(associated) => {
                    return Err(Error::new(
                        associated.span(),
                        "contracts cannot declare associated types",
                    ));
                }
                other => {
                    return Err(Error::new(other.span(), "contracts may only declare functions"));
                }
            }
        }

        Ok(Self { item, accessors })
    }

    /// Whether the trait can be used as `dyn Trait`
    pub(crate) fn is_object_safe(&self) -> bool {
        self.accessors.iter().all(|a| a.forwarded_generics.is_empty())
    }
}

fn parse_function(slot: usize, function: &mut TraitItemFn) -> Result<Accessor> {
    let (kind, explicit_name) = take_member_attribute(&mut function.attrs)?;
    let sig = &mut function.sig;

    if let Some(asyncness) = &sig.asyncness {
        return Err(Error::new(asyncness.span(), "contracts cannot declare async functions"));
    }
    if let Some(unsafety) = &sig.unsafety {
        return Err(Error::new(unsafety.span(), "contracts cannot declare unsafe functions"));
    }
    if let Some(abi) = &sig.abi {
        return Err(Error::new(abi.span(), "contracts cannot declare extern functions"));
    }
    if let Some(variadic) = &sig.variadic {
        return Err(Error::new(variadic.span(), "contracts cannot declare variadic functions"));
    }
    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some()
                && receiver.mutability.is_none()
                && receiver.colon_token.is_none() => {}
        Some(FnArg::Receiver(receiver)) => {
            return Err(Error::new(receiver.span(), "contract functions take `&self`"));
        }
        _ => {
            return Err(Error::new(
                sig.ident.span(),
                "contract functions need a `&self` receiver",
            ));
        }
    }

    let mut params = Vec::new();
    for input in sig.inputs.iter_mut().skip(1) {
        let FnArg::Typed(typed) = input else {
            return Err(Error::new(Span::call_site(), "unexpected second receiver"));
        };
        let out = take_out_attribute(&mut typed.attrs)?;
        let ident = match typed.pat.as_ref() {
            Pat::Ident(pat) if pat.by_ref.is_none() && pat.subpat.is_none() => pat.ident.clone(),
            other => {
                return Err(Error::new(other.span(), "contract parameters must be plain identifiers"));
            }
        };
        if contains_impl_trait(&typed.ty) {
            return Err(Error::new(
                typed.ty.span(),
                "contract parameters cannot use `impl Trait`; declare a type parameter instead",
            ));
        }
        let is_mut_ref = matches!(typed.ty.as_ref(), Type::Reference(r) if r.mutability.is_some());
        let direction = match (out, is_mut_ref) {
            (true, true) => Direction::Out,
            (true, false) => {
                return Err(Error::new(typed.ty.span(), "#[out] parameters must be `&mut T`"));
            }
            (false, true) => Direction::Ref,
            (false, false) => Direction::In,
        };
        params.push(Param {
            ident,
            ty: (*typed.ty).clone(),
            direction,
        });
    }

    let mut type_params = Vec::new();
    let mut forwarded_generics = Vec::new();
    for param in &sig.generics.params {
        match param {
            GenericParam::Type(ty) => {
                type_params.push(ty.ident.clone());
                forwarded_generics.push(ty.ident.clone());
            }
            GenericParam::Const(constant) => forwarded_generics.push(constant.ident.clone()),
            GenericParam::Lifetime(_) => {}
        }
    }
    if kind != Kind::Method && !forwarded_generics.is_empty() {
        return Err(Error::new(
            sig.generics.span(),
            "only methods may declare type parameters",
        ));
    }

    let output = parse_output(&sig.output)?;
    check_shape(kind, sig, &params, &output)?;

    let function_name = sig.ident.to_string();
    let name = match kind {
        Kind::Method => Some(function_name),
        Kind::IndexerGet | Kind::IndexerSet => None,
        Kind::PropertyGet => Some(explicit_name.unwrap_or_else(|| strip(&function_name, "get_"))),
        Kind::PropertySet => Some(explicit_name.unwrap_or_else(|| strip(&function_name, "set_"))),
        Kind::EventAdd => Some(explicit_name.unwrap_or_else(|| strip(&function_name, "add_"))),
        Kind::EventRemove => Some(explicit_name.unwrap_or_else(|| strip(&function_name, "remove_"))),
    };

    Ok(Accessor {
        slot,
        name,
        kind,
        sig: sig.clone(),
        params,
        type_params,
        forwarded_generics,
        output,
    })
}

fn strip(function_name: &str, prefix: &str) -> String {
    function_name
        .strip_prefix(prefix)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(function_name)
        .to_string()
}

fn check_shape(kind: Kind, sig: &Signature, params: &[Param], output: &Output) -> Result<()> {
    let returns = !matches!(output, Output::Unit);
    let arity = params.len();
    let problem = match kind {
        Kind::Method => None,
        Kind::PropertyGet if arity != 0 || !returns => {
            Some("a property getter takes no parameters and returns a value")
        }
        Kind::PropertySet if arity != 1 || returns => {
            Some("a property setter takes exactly one value and returns nothing")
        }
        Kind::IndexerGet if arity == 0 || !returns => {
            Some("an indexer getter takes at least one index and returns a value")
        }
        Kind::IndexerSet if arity < 2 || returns => {
            Some("an indexer setter takes at least one index plus a value and returns nothing")
        }
        Kind::EventAdd | Kind::EventRemove if arity != 1 || returns => {
            Some("an event accessor takes exactly one handler and returns nothing")
        }
        _ => None,
    };
    match problem {
        Some(problem) => Err(Error::new(sig.span(), problem)),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Property,
    Indexer,
    Event,
}

impl Family {
    fn of(attr: &Attribute) -> Option<Self> {
        let path = attr.path();
        if path.is_ident("property") {
            Some(Self::Property)
        } else if path.is_ident("indexer") {
            Some(Self::Indexer)
        } else if path.is_ident("event") {
            Some(Self::Event)
        } else {
            None
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::Indexer => "indexer",
            Self::Event => "event",
        }
    }

    fn access(self, key: &str) -> Option<Kind> {
        match (self, key) {
            (Self::Property, "get") => Some(Kind::PropertyGet),
            (Self::Property, "set") => Some(Kind::PropertySet),
            (Self::Indexer, "get") => Some(Kind::IndexerGet),
            (Self::Indexer, "set") => Some(Kind::IndexerSet),
            (Self::Event, "add") => Some(Kind::EventAdd),
            (Self::Event, "remove") => Some(Kind::EventRemove),
            _ => None,
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::Property | Self::Indexer => "`get` or `set`",
            Self::Event => "`add` or `remove`",
        }
    }
}

/// Remove the member attribute, if any, and return the kind it declares
fn take_member_attribute(attrs: &mut Vec<Attribute>) -> Result<(Kind, Option<String>)> {
    let mut found: Option<(Kind, Option<String>)> = None;
    let mut kept = Vec::with_capacity(attrs.len());
    for attr in attrs.drain(..) {
        let Some(family) = Family::of(&attr) else {
            kept.push(attr);
            continue;
        };
        if found.is_some() {
            return Err(Error::new(
                attr.span(),
                "a contract function takes at most one of #[property], #[indexer] and #[event]",
            ));
        }
        found = Some(parse_member_attribute(family, &attr)?);
    }
    *attrs = kept;
    Ok(found.unwrap_or((Kind::Method, None)))
}

fn parse_member_attribute(family: Family, attr: &Attribute) -> Result<(Kind, Option<String>)> {
    let mut kind = None;
    let mut name = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") && family != Family::Indexer {
            let value: LitStr = meta.value()?.parse()?;
            name = Some(value.value());
            return Ok(());
        }
        let key = meta.path.get_ident().map(ToString::to_string).unwrap_or_default();
        let Some(access) = family.access(&key) else {
            return Err(meta.error(format!(
                "unsupported #[{}] argument, expected {}",
                family.label(),
                family.expected()
            )));
        };
        if kind.replace(access).is_some() {
            return Err(meta.error("accessor kind declared twice"));
        }
        Ok(())
    })?;
    let kind = kind.ok_or_else(|| {
        Error::new(
            attr.span(),
            format!("#[{}] expects {}", family.label(), family.expected()),
        )
    })?;
    Ok((kind, name))
}

fn take_out_attribute(attrs: &mut Vec<Attribute>) -> Result<bool> {
    let Some(position) = attrs.iter().position(|a| a.path().is_ident("out")) else {
        return Ok(false);
    };
    let attr = attrs.remove(position);
    attr.meta.require_path_only()?;
    Ok(true)
}

fn contains_impl_trait(ty: &Type) -> bool {
    match ty {
        Type::ImplTrait(_) => true,
        Type::Reference(reference) => contains_impl_trait(&reference.elem),
        Type::Paren(paren) => contains_impl_trait(&paren.elem),
        Type::Group(group) => contains_impl_trait(&group.elem),
        Type::Slice(slice) => contains_impl_trait(&slice.elem),
        Type::Array(array) => contains_impl_trait(&array.elem),
        Type::Ptr(ptr) => contains_impl_trait(&ptr.elem),
        Type::Tuple(tuple) => tuple.elems.iter().any(contains_impl_trait),
        Type::Path(path) => path.path.segments.iter().any(|segment| match &segment.arguments {
            PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| {
                matches!(arg, GenericArgument::Type(inner) if contains_impl_trait(inner))
            }),
            _ => false,
        }),
        _ => false,
    }
}

fn parse_output(output: &ReturnType) -> Result<Output> {
    let ReturnType::Type(_, ty) = output else {
        return Ok(Output::Unit);
    };
    if borrows(ty) {
        return Err(Error::new(
            ty.span(),
            "contract methods must return owned `'static` values",
        ));
    }
    if matches!(ty.as_ref(), Type::Tuple(tuple) if tuple.elems.is_empty()) {
        return Ok(Output::Unit);
    }
    Ok(match result_arguments(ty) {
        Some((ok, err)) => Output::Fallible {
            ok: ok.clone(),
            err: err.clone(),
        },
        None => Output::Value((**ty).clone()),
    })
}

/// Whether `ty` holds a reference or lifetime other than `'static`
fn borrows(ty: &Type) -> bool {
    let non_static = |lifetime: &Lifetime| lifetime.ident != "static";
    match ty {
        Type::Reference(reference) => reference.lifetime.as_ref().is_none_or(non_static) || borrows(&reference.elem),
        Type::Paren(paren) => borrows(&paren.elem),
        Type::Group(group) => borrows(&group.elem),
        Type::Slice(slice) => borrows(&slice.elem),
        Type::Array(array) => borrows(&array.elem),
        Type::Ptr(ptr) => borrows(&ptr.elem),
        Type::Tuple(tuple) => tuple.elems.iter().any(borrows),
        Type::TraitObject(object) => object.bounds.iter().any(|bound| match bound {
            TypeParamBound::Lifetime(lifetime) => non_static(lifetime),
            _ => false,
        }),
        Type::Path(path) => path.path.segments.iter().any(|segment| match &segment.arguments {
            PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| match arg {
                GenericArgument::Lifetime(lifetime) => non_static(lifetime),
                GenericArgument::Type(inner) => borrows(inner),
                _ => false,
            }),
            _ => false,
        }),
        _ => false,
    }
}

/// `(T, E)` of a type spelled `Result<T, E>`
fn result_arguments(ty: &Type) -> Option<(&Type, &Type)> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut types = args.args.iter();
    match (types.next(), types.next(), types.next()) {
        (Some(GenericArgument::Type(ok)), Some(GenericArgument::Type(err)), None) => Some((ok, err)),
        _ => None,
    }
}
