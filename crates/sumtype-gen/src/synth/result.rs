//! Result synthesis.
//!
//! `#[result(Ok, Err)]` becomes `enum Name { Ok(Ok), Err(Err) }` and
//! `#[result(Err)]` becomes `enum Name { Ok, Err(Err) }` whose success side is
//! the runtime's `Unit`. Both implement `Fallible`, which carries every
//! combinator.
//!
//! Conversions: `From<Ok>` (two-parameter form only) and `From<Err>` always.
//! When either side is a union, each of its variant types also converts
//! straight into the result, unless the two sides share a component. A side
//! that is not a union is its own single component. On any overlap no
//! variant-level conversion is emitted for either side.

use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;
use tracing::debug;

use super::{Context, split_attrs};
use crate::model::{TypeRef, TypeSpec};

/// Variant-level conversions a result receives from a union on one side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentConversions {
    pub ok: Vec<TypeRef>,
    pub err: Vec<TypeRef>,
    /// True when the two sides share a variant type and every
    /// variant-level conversion was dropped.
    pub suppressed: bool,
}

/// Work out which union variant types convert directly into the result.
pub fn component_conversions(
    ok: Option<&TypeRef>,
    err: &TypeRef,
    module_path: &[String],
    ctx: &Context<'_>,
) -> ComponentConversions {
    let union_variants = |side: Option<&TypeRef>| -> Option<Vec<TypeRef>> {
        side.and_then(|ty| ctx.catalog.union_for(ty, module_path))
            .map(|union| union.variants.clone())
    };
    let ok_union = union_variants(ok);
    let err_union = union_variants(Some(err));

    // A side that is not a union counts as a single component.
    let ok_components = ok_union
        .clone()
        .unwrap_or_else(|| ok.cloned().into_iter().collect());
    let err_components = err_union.clone().unwrap_or_else(|| vec![err.clone()]);

    if ok_components.iter().any(|c| err_components.contains(c)) {
        return ComponentConversions {
            suppressed: true,
            ..ComponentConversions::default()
        };
    }

    ComponentConversions {
        ok: ok_union.unwrap_or_default(),
        err: err_union.unwrap_or_default(),
        suppressed: false,
    }
}

pub fn render_result(spec: &TypeSpec, ctx: &Context<'_>) -> syn::Result<TokenStream> {
    let runtime = ctx.runtime;
    let name = &spec.shell.ident;
    let vis = &spec.shell.vis;
    let shell = split_attrs(&spec.shell.attrs)?;
    let attrs = &shell.attrs;

    let (ok, err) = match spec.variants.as_slice() {
        [err] => (None, err),
        [ok, err] => (Some(ok), err),
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "a result lists one or two types",
            ));
        }
    };
    let err_ty = &err.ty;
    let unit: Type = syn::parse_quote!(#runtime::Unit);
    let ok_ty: &Type = ok.map(|ok| &ok.ty).unwrap_or(&unit);

    let conversions = component_conversions(ok, err, &spec.module_path, ctx);
    debug!(
        result = %name,
        ok_components = conversions.ok.len(),
        err_components = conversions.err.len(),
        suppressed = conversions.suppressed,
        "rendering result"
    );

    let body = match ok {
        Some(_) => quote! {
            #(#attrs)*
            #vis enum #name {
                Ok(#ok_ty),
                Err(#err_ty),
            }

            impl #name {
                pub fn ok(value: #ok_ty) -> Self {
                    #name::Ok(value)
                }

                pub fn err(error: #err_ty) -> Self {
                    #name::Err(error)
                }
            }

            impl #runtime::Fallible for #name {
                type Ok = #ok_ty;
                type Err = #err_ty;

                fn from_ok(ok: #ok_ty) -> Self {
                    #name::Ok(ok)
                }

                fn from_err(err: #err_ty) -> Self {
                    #name::Err(err)
                }

                fn into_outcome(self) -> #runtime::Outcome<#ok_ty, #err_ty> {
                    match self {
                        #name::Ok(ok) => #runtime::Outcome::Ok(ok),
                        #name::Err(err) => #runtime::Outcome::Err(err),
                    }
                }

                fn as_outcome(&self) -> #runtime::Outcome<&#ok_ty, &#err_ty> {
                    match self {
                        #name::Ok(ok) => #runtime::Outcome::Ok(ok),
                        #name::Err(err) => #runtime::Outcome::Err(err),
                    }
                }
            }

            impl ::core::convert::From<#ok_ty> for #name {
                fn from(value: #ok_ty) -> Self {
                    #name::Ok(value)
                }
            }
        },
        None => quote! {
            #(#attrs)*
            #vis enum #name {
                Ok,
                Err(#err_ty),
            }

            impl #name {
                pub fn ok() -> Self {
                    #name::Ok
                }

                pub fn err(error: #err_ty) -> Self {
                    #name::Err(error)
                }
            }

            impl #runtime::Fallible for #name {
                type Ok = #ok_ty;
                type Err = #err_ty;

                fn from_ok(_: #ok_ty) -> Self {
                    #name::Ok
                }

                fn from_err(err: #err_ty) -> Self {
                    #name::Err(err)
                }

                fn into_outcome(self) -> #runtime::Outcome<#ok_ty, #err_ty> {
                    match self {
                        #name::Ok => #runtime::Outcome::Ok(#runtime::Unit),
                        #name::Err(err) => #runtime::Outcome::Err(err),
                    }
                }

                fn as_outcome(&self) -> #runtime::Outcome<&#ok_ty, &#err_ty> {
                    match self {
                        #name::Ok => #runtime::Outcome::Ok(&#runtime::Unit),
                        #name::Err(err) => #runtime::Outcome::Err(err),
                    }
                }
            }
        },
    };

    let ok_components = conversions.ok.iter().map(|component| {
        quote! {
            impl ::core::convert::From<#component> for #name {
                fn from(value: #component) -> Self {
                    #name::Ok(<#ok_ty as ::core::convert::From<#component>>::from(value))
                }
            }
        }
    });
    let err_components = conversions.err.iter().map(|component| {
        quote! {
            impl ::core::convert::From<#component> for #name {
                fn from(value: #component) -> Self {
                    #name::Err(<#err_ty as ::core::convert::From<#component>>::from(value))
                }
            }
        }
    });

    let case_insensitive = ctx.case_insensitive;
    let serialize_impl = shell.serialize.then(|| {
        quote! {
            impl #runtime::serde::Serialize for #name {
                fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
                where
                    S: #runtime::serde::Serializer,
                {
                    #runtime::codec::serialize_result(serializer, <Self as #runtime::Fallible>::as_outcome(self))
                }
            }
        }
    });
    let deserialize_impl = shell.deserialize.then(|| {
        quote! {
            impl<'de> #runtime::serde::Deserialize<'de> for #name {
                fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
                where
                    D: #runtime::serde::Deserializer<'de>,
                {
                    let options = #runtime::CodecOptions { case_insensitive: #case_insensitive };
                    #runtime::serde::de::DeserializeSeed::deserialize(
                        #runtime::ResultSeed::<Self>::new(options),
                        deserializer,
                    )
                }
            }
        }
    });

    Ok(quote! {
        #body

        impl ::core::convert::From<#err_ty> for #name {
            fn from(error: #err_ty) -> Self {
                #name::Err(error)
            }
        }

        #(#ok_components)*
        #(#err_components)*
        #serialize_impl
        #deserialize_impl
    })
}
