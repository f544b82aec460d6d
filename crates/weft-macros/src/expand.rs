//! Code generation for `#[weft::contract]`

use crate::model::{Accessor, ContractModel, Direction, Output};
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::Ident;

// mirrors weft_domain::constants::GENERIC_ARGUMENT_PREFIX
const GENERIC_ARGUMENT_PREFIX: &str = "T";

pub(crate) fn expand(model: &ContractModel) -> TokenStream {
    let item = &model.item;
    let vis = &item.vis;
    let trait_ident = &item.ident;
    let trait_name = trait_ident.to_string();
    let contract_ident = format_ident!("{}Contract", trait_ident);
    let proxy_ident = format_ident!("{}Proxy", trait_ident);
    let proxy_name = proxy_ident.to_string();
    let contract_doc = format!("Weaving contract of [`{trait_name}`]");
    let proxy_doc = format!("Woven proxy implementing [`{trait_name}`] over `I`");

    let members = model.accessors.iter().map(member_descriptor);
    let methods = model
        .accessors
        .iter()
        .map(|accessor| proxy_method(trait_ident, accessor));

    let object_contract = model.is_object_safe().then(|| {
        quote! {
            impl<I> ::weft::__private::ObjectContract<I> for #contract_ident
            where
                I: #trait_ident + ::weft::__private::Implementation,
            {
                type Object = dyn #trait_ident + ::core::marker::Send + ::core::marker::Sync;

                fn into_object(proxy: Self::Proxy) -> ::std::sync::Arc<Self::Object> {
                    ::std::sync::Arc::new(proxy)
                }
            }
        }
    });

    quote! {
        #item

        #[doc = #contract_doc]
        #[derive(Debug, Clone, Copy, Default)]
        #vis struct #contract_ident;

        impl ::weft::__private::Contract for #contract_ident {
            const NAME: &'static str = ::core::concat!(::core::module_path!(), "::", #trait_name);

            fn descriptor() -> ::weft::__private::Result<::weft::__private::ContractDescriptor> {
                ::weft::__private::ContractDescriptor::builder(
                    <Self as ::weft::__private::Contract>::NAME,
                )
                #(.member(#members))*
                .build()
            }
        }

        #[doc = #proxy_doc]
        #vis struct #proxy_ident<I> {
            inner: ::weft::__private::Woven<I>,
        }

        impl<I> ::core::clone::Clone for #proxy_ident<I> {
            fn clone(&self) -> Self {
                Self {
                    inner: ::core::clone::Clone::clone(&self.inner),
                }
            }
        }

        impl<I> ::core::fmt::Debug for #proxy_ident<I> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(#proxy_name).field("woven", &self.inner).finish()
            }
        }

        impl<I> #trait_ident for #proxy_ident<I>
        where
            I: #trait_ident + ::weft::__private::Implementation,
        {
            #(#methods)*
        }

        impl<I> ::weft::__private::WovenProxy for #proxy_ident<I>
        where
            I: ::weft::__private::Implementation,
        {
            type Target = I;

            fn woven(&self) -> &::weft::__private::Woven<I> {
                &self.inner
            }
        }

        impl<I> ::weft::__private::Weave<I> for #contract_ident
        where
            I: #trait_ident + ::weft::__private::Implementation,
        {
            type Proxy = #proxy_ident<I>;

            fn assemble(woven: ::weft::__private::Woven<I>) -> Self::Proxy {
                #proxy_ident { inner: woven }
            }
        }

        #object_contract
    }
}

fn type_name<T: ToTokens>(ty: &T) -> String {
    ty.to_token_stream().to_string()
}

/// `MemberDescriptor` expression of one accessor
fn member_descriptor(accessor: &Accessor) -> TokenStream {
    let slot = accessor.slot;
    let name = match &accessor.name {
        Some(name) => quote!(#name),
        None => quote!(::weft::__private::INDEXER_MEMBER_NAME),
    };
    let function = accessor.sig.ident.to_string();
    let kind = format_ident!("{}", accessor.kind.variant());
    let generics = accessor.type_params.iter().map(ToString::to_string);
    let parameters = accessor.params.iter().map(|param| {
        let name = param.ident.to_string();
        let ty = type_name(&param.ty);
        let direction = format_ident!("{}", param.direction.variant());
        quote!(.parameter(#name, #ty, ::weft::__private::Direction::#direction))
    });
    let output = match &accessor.output {
        Output::Unit => quote!(),
        Output::Value(ty) => {
            let ty = type_name(ty);
            quote!(.returns(#ty))
        }
        Output::Fallible { ok, err } => {
            let ok = type_name(ok);
            let err = type_name(err);
            quote!(.returns(#ok).fallible(#err))
        }
    };

    quote! {
        ::weft::__private::MemberDescriptor::new(
            #slot,
            #name,
            #function,
            ::weft::__private::MemberKind::#kind,
        )
        #(.generic(#generics))*
        #(#parameters)*
        #output
    }
}

/// Proxy implementation of one trait function
fn proxy_method(trait_ident: &Ident, accessor: &Accessor) -> TokenStream {
    let sig = &accessor.sig;
    let function = &sig.ident;
    let arguments = accessor.params.iter().map(|param| &param.ident);
    let turbofish = if accessor.forwarded_generics.is_empty() {
        quote!()
    } else {
        let generics = &accessor.forwarded_generics;
        quote!(::<#(#generics),*>)
    };
    let call = quote! {
        <I as #trait_ident>::#function #turbofish(self.inner.target(), #(#arguments),*)
    };

    if accessor.kind.is_event() {
        return quote! {
            #sig {
                #call
            }
        };
    }

    let slot = accessor.slot;
    let capacity = accessor.params.len() + accessor.type_params.len();
    let resets = accessor
        .params
        .iter()
        .filter(|param| param.direction == Direction::Out)
        .map(|param| {
            let ident = &param.ident;
            quote!(*#ident = ::core::default::Default::default();)
        });
    let last = accessor.params.len().saturating_sub(1);
    let captures = accessor.params.iter().enumerate().map(|(index, param)| {
        let ident = &param.ident;
        let bag_name = if accessor.kind.is_setter() && index == last {
            quote!(::weft::__private::SETTER_VALUE_PARAMETER)
        } else {
            let name = ident.to_string();
            quote!(#name)
        };
        let captured = match param.direction {
            Direction::In => quote!(&#ident),
            Direction::Ref | Direction::Out => quote!(&*#ident),
        };
        quote! {
            __weft_params.insert(#bag_name, (&::weft::__private::Capture(#captured)).capture());
        }
    });
    let generic_arguments = accessor.type_params.iter().enumerate().map(|(index, ty)| {
        let key = format!("{GENERIC_ARGUMENT_PREFIX}{}", index + 1);
        quote! {
            __weft_params.insert(#key, ::weft::__private::ParameterValue::type_of::<#ty>());
        }
    });
    let (invoke, returned) = match &accessor.output {
        Output::Fallible { ok, .. } => (quote!(invoke_fallible_or), quote!(#ok)),
        Output::Value(ty) => (quote!(invoke_or), quote!(#ty)),
        Output::Unit => (quote!(invoke_or), quote!(())),
    };

    quote! {
        #sig {
            #(#resets)*
            #[allow(unused_mut)]
            let mut __weft_params = ::weft::__private::ParameterBag::with_capacity(#capacity);
            {
                #[allow(unused_imports)]
                use ::weft::__private::{CaptureOpaque as _, CaptureSerialize as _};
                #(#captures)*
            }
            #(#generic_arguments)*
            let __weft_fallback = {
                #[allow(unused_imports)]
                use ::weft::__private::{FallbackDefault as _, FallbackNone as _};
                (&::weft::__private::Fallback::<#returned>::new()).fallback()
            };
            self.inner.member(#slot).#invoke(__weft_params, __weft_fallback, || #call)
        }
    }
}
