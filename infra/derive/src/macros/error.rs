use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Fields, FieldsNamed, Ident, ItemEnum, Type};

struct VariantInfo<'a> {
    ident: &'a Ident,
    has_context: bool,
    source_ty: Option<&'a Type>,
}

pub fn expand(input: &ItemEnum) -> TokenStream {
    let name = &input.ident;
    let ext_trait = format_ident!("{}Ext", name);

    let mut variants = Vec::with_capacity(input.variants.len());
    for variant in &input.variants {
        let Fields::Named(fields) = &variant.fields else {
            return syn::Error::new_spanned(
                variant,
                "moneta_error requires named fields for message/context handling",
            )
            .to_compile_error();
        };
        let info = VariantInfo {
            ident: &variant.ident,
            has_context: field_named(fields, "context"),
            source_ty: source_type(fields),
        };
        if info.source_ty.is_some() && !info.has_context {
            return syn::Error::new_spanned(
                variant,
                "moneta_error requires `context: Option<Cow<'static, str>>` alongside a source",
            )
            .to_compile_error();
        }
        variants.push(info);
    }

    let context_impl = expand_context_trait(name, &ext_trait, &variants);
    let source_impls = variants.iter().filter_map(|v| expand_source_impls(name, &ext_trait, v));
    let internal_impls = expand_internal_impls(name, &variants);

    quote! {
        #[derive(Debug, ::thiserror::Error)]
        #input

        #context_impl
        #(#source_impls)*
        #internal_impls

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    }
}

fn expand_context_trait(
    name: &Ident,
    ext_trait: &Ident,
    variants: &[VariantInfo<'_>],
) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let ident = v.ident;
        quote! { #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });
    // A fallthrough arm is only needed when some variant has no context field.
    let fallthrough = if variants.iter().all(|v| v.has_context) {
        quote! {}
    } else {
        quote! { _ => {} }
    };

    quote! {
        pub trait #ext_trait<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext_trait<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut e| {
                    match &mut e {
                        #(#arms)*
                        #fallthrough
                    }
                    e
                })
            }
        }
    }
}

fn expand_source_impls(
    name: &Ident,
    ext_trait: &Ident,
    v: &VariantInfo<'_>,
) -> Option<TokenStream> {
    let source_ty = v.source_ty?;
    let v_ident = v.ident;

    Some(quote! {
        #[automatically_derived]
        impl From<#source_ty> for #name {
            #[inline]
            fn from(source: #source_ty) -> Self { Self::#v_ident { source, context: None } }
        }

        impl<T> #ext_trait<T> for std::result::Result<T, #source_ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|source| #name::#v_ident { source, context: Some(context.into()) })
            }
        }
    })
}

fn expand_internal_impls(name: &Ident, variants: &[VariantInfo<'_>]) -> TokenStream {
    if !variants.iter().any(|v| v.ident == "Internal") {
        return quote!();
    }

    quote! {
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    }
}

fn field_named(fields: &FieldsNamed, name: &str) -> bool {
    fields.named.iter().any(|field| field.ident.as_ref().is_some_and(|ident| ident == name))
}

fn source_type(fields: &FieldsNamed) -> Option<&Type> {
    fields
        .named
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == "source"))
        .map(|field| &field.ty)
}
