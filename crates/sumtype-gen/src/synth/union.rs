//! Union synthesis.
//!
//! For `#[union(T0, .., Tn)] pub struct Name;` this emits:
//!
//! - `pub enum Name { V0(T0), .., Vn(Tn) }`; the variants are the converting
//!   constructors
//! - `From<Ti> for Name` for every variant type
//! - `match_with`, `match_ref` and `switch`, one handler per variant in
//!   declaration order
//! - one forwarding method per property every variant shares
//! - `TaggedUnion`, and the envelope codec when serde derives were requested

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::Type;
use tracing::debug;

use super::{Context, split_attrs};
use crate::model::{TypeRef, TypeSpec};
use crate::naming::{handler_name, variant_idents};
use crate::scan::{Access, Property};

/// Inherent names a projected property must not shadow.
const RESERVED: &[&str] = &["match_with", "match_ref", "switch", "from"];

/// Wire tag per variant: the short tag unless another variant shares it.
pub fn wire_tags(variants: &[TypeRef]) -> Vec<String> {
    let short: Vec<String> = variants.iter().map(TypeRef::short_tag).collect();
    variants
        .iter()
        .zip(&short)
        .map(|(variant, tag)| {
            if short.iter().filter(|other| *other == tag).count() > 1 {
                variant.canonical.clone()
            } else {
                tag.clone()
            }
        })
        .collect()
}

/// Properties that every variant exposes with the same name and type, in the
/// first variant's order. Each entry carries one accessor per variant.
pub fn shared_properties<'a>(spec: &TypeSpec, ctx: &'a Context<'_>) -> Vec<(&'a Property, Vec<Access>)> {
    let per_variant: Option<Vec<_>> = spec
        .variants
        .iter()
        .map(|variant| ctx.catalog.properties_of(variant, &spec.module_path))
        .collect();
    let Some(per_variant) = per_variant else {
        return Vec::new();
    };
    let Some((first, rest)) = per_variant.split_first() else {
        return Vec::new();
    };

    first
        .values()
        .filter(|property| !RESERVED.contains(&property.name.to_string().as_str()))
        .filter_map(|property| {
            let mut accesses = vec![property.access];
            for other in rest {
                let matching = other.get(&property.name.to_string())?;
                if matching.exposed != property.exposed {
                    return None;
                }
                accesses.push(matching.access);
            }
            Some((property, accesses))
        })
        .collect()
}

pub fn render_union(spec: &TypeSpec, ctx: &Context<'_>) -> syn::Result<TokenStream> {
    let runtime = ctx.runtime;
    let name = &spec.shell.ident;
    let vis = &spec.shell.vis;
    let shell = split_attrs(&spec.shell.attrs)?;
    let attrs = &shell.attrs;

    let types: Vec<&Type> = spec.variants.iter().map(|v| &v.ty).collect();
    let idents: Vec<Ident> = variant_idents(types.iter().copied())
        .iter()
        .map(|ident| format_ident!("{}", ident))
        .collect();
    let handlers: Vec<Ident> = idents
        .iter()
        .map(|ident| format_ident!("{}", handler_name(&ident.to_string())))
        .collect();
    let tags = wire_tags(&spec.variants);
    let expected: Vec<&str> = spec.variants.iter().map(|v| v.canonical.as_str()).collect();
    let indices: Vec<usize> = (0..types.len()).collect();
    let arity = types.len();

    let properties = shared_properties(spec, ctx);
    debug!(union = %name, variants = arity, shared = properties.len(), "rendering union");
    let projections = properties.iter().map(|(property, accesses)| {
        let prop = &property.name;
        let exposed = &property.exposed;
        let readers = accesses.iter().map(|access| match access {
            Access::Field => quote! { |value| &value.#prop },
            Access::Getter => quote! { |value| value.#prop() },
        });
        quote! {
            pub fn #prop(&self) -> #exposed {
                self.match_ref(#(#readers),*)
            }
        }
    });

    let codec = render_codec(spec, ctx, &idents, &types, shell.serialize, shell.deserialize);

    Ok(quote! {
        #(#attrs)*
        #vis enum #name {
            #( #idents(#types), )*
        }

        impl #name {
            /// Consume the union and hand the payload to the handler of the
            /// active variant.
            pub fn match_with<R>(self, #( #handlers: impl ::core::ops::FnOnce(#types) -> R, )*) -> R {
                match self {
                    #( #name::#idents(value) => #handlers(value), )*
                }
            }

            /// Borrowing form of `match_with`.
            pub fn match_ref<'a, R>(&'a self, #( #handlers: impl ::core::ops::FnOnce(&'a #types) -> R, )*) -> R {
                match self {
                    #( #name::#idents(value) => #handlers(value), )*
                }
            }

            /// Run the action of the active variant.
            pub fn switch(&self, #( #handlers: impl ::core::ops::FnOnce(&#types), )*) {
                match self {
                    #( #name::#idents(value) => #handlers(value), )*
                }
            }

            #(#projections)*
        }

        #(
            impl ::core::convert::From<#types> for #name {
                fn from(value: #types) -> Self {
                    #name::#idents(value)
                }
            }
        )*

        impl #runtime::TaggedUnion for #name {
            const VARIANTS: &'static [&'static str] = &[#(#tags),*];

            fn tag(&self) -> usize {
                match self {
                    #( #name::#idents(_) => #indices, )*
                }
            }

            fn value(&self) -> &dyn ::core::any::Any {
                match self {
                    #( #name::#idents(value) => value as &dyn ::core::any::Any, )*
                }
            }

            fn from_payload(
                tag: usize,
                payload: ::std::boxed::Box<dyn ::core::any::Any>,
            ) -> ::core::result::Result<Self, #runtime::UnionError> {
                match tag {
                    #(
                        #indices => payload
                            .downcast::<#types>()
                            .map(|value| #name::#idents(*value))
                            .map_err(|_| #runtime::UnionError::PayloadMismatch { tag, expected: #expected }),
                    )*
                    _ => ::core::result::Result::Err(#runtime::UnionError::TagOutOfRange { tag, arity: #arity }),
                }
            }
        }

        #codec
    })
}

fn render_codec(
    spec: &TypeSpec,
    ctx: &Context<'_>,
    idents: &[Ident],
    types: &[&Type],
    serialize: bool,
    deserialize: bool,
) -> TokenStream {
    let runtime = ctx.runtime;
    let name = &spec.shell.ident;
    let indices: Vec<usize> = (0..types.len()).collect();
    let arity = types.len();
    let case_insensitive = ctx.case_insensitive;

    let serialize_impl = serialize.then(|| {
        quote! {
            impl #runtime::serde::Serialize for #name {
                fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
                where
                    S: #runtime::serde::Serializer,
                {
                    let tag = <Self as #runtime::TaggedUnion>::variant_name(self);
                    match self {
                        #( #name::#idents(value) => #runtime::codec::serialize_envelope(serializer, tag, value), )*
                    }
                }
            }
        }
    });

    let deserialize_impl = deserialize.then(|| {
        quote! {
            impl #runtime::UnionCodec for #name {
                fn decode_variant<'de, D>(tag: usize, deserializer: D) -> ::core::result::Result<Self, D::Error>
                where
                    D: #runtime::serde::Deserializer<'de>,
                {
                    match tag {
                        #(
                            #indices => <#types as #runtime::serde::Deserialize<'de>>::deserialize(deserializer)
                                .map(#name::#idents),
                        )*
                        _ => ::core::result::Result::Err(<D::Error as #runtime::serde::de::Error>::custom(
                            #runtime::UnionError::TagOutOfRange { tag, arity: #arity },
                        )),
                    }
                }
            }

            impl<'de> #runtime::serde::Deserialize<'de> for #name {
                fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
                where
                    D: #runtime::serde::Deserializer<'de>,
                {
                    let options = #runtime::CodecOptions { case_insensitive: #case_insensitive };
                    #runtime::serde::de::DeserializeSeed::deserialize(
                        #runtime::UnionSeed::<Self>::new(options),
                        deserializer,
                    )
                }
            }
        }
    });

    quote! {
        #serialize_impl
        #deserialize_impl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::scan::{TypeCatalog, scan_file};
    use crate::synth::testing::flat;

    fn render(src: &str) -> String {
        let file = syn::parse_file(src).unwrap();
        let mut catalog = TypeCatalog::new();
        let declarations = scan_file(&file, &mut catalog).unwrap();
        let spec = resolve(declarations.last().unwrap(), &catalog).unwrap();
        let runtime: syn::Path = syn::parse_str("::sumtype_core").unwrap();
        let ctx = Context {
            runtime: &runtime,
            case_insensitive: false,
            catalog: &catalog,
        };
        let tokens = render_union(&spec, &ctx).unwrap();
        // The output must be a valid item list.
        syn::parse2::<syn::File>(tokens.clone()).unwrap();
        flat(&tokens)
    }

    fn type_refs(srcs: &[&str]) -> Vec<TypeRef> {
        srcs.iter().map(|s| TypeRef::new(syn::parse_str(s).unwrap())).collect()
    }

    #[test]
    fn test_wire_tags_fall_back_on_collision() {
        let tags = wire_tags(&type_refs(&["a::Circle", "b::Circle", "Vec<u8>", "i32"]));

        assert_eq!(tags, vec!["a::Circle", "b::Circle", "Vec<u8>", "i32"]);
        assert_eq!(wire_tags(&type_refs(&["geo::Circle", "i32"])), vec!["Circle", "i32"]);
    }

    #[test]
    fn test_enum_and_conversions() {
        let out = render("#[derive(Debug)] #[union(String, i32, Vec<u8>)] pub struct Value;");

        assert!(out.contains("#[derive(Debug)]pubenumValue{String(String),I32(i32),VecU8(Vec<u8>),}"));
        assert!(out.contains("impl::core::convert::From<i32>forValue"));
        assert!(out.contains("impl::core::convert::From<Vec<u8>>forValue"));
        assert!(!out.contains("#[union"));
    }

    #[test]
    fn test_dispatch_takes_handlers_in_order() {
        let out = render("#[union(String, i32)] pub struct Value;");

        assert!(out.contains("pubfnmatch_with<R>(self,on_string:impl::core::ops::FnOnce(String)->R,on_i32:impl::core::ops::FnOnce(i32)->R,)->R"));
        assert!(out.contains("pubfnswitch(&self,on_string:impl::core::ops::FnOnce(&String),on_i32:impl::core::ops::FnOnce(&i32),)"));
    }

    #[test]
    fn test_tagged_union_impl() {
        let out = render("#[union(String, i32)] pub struct Value;");

        assert!(out.contains("constVARIANTS:&'static[&'staticstr]=&[\"String\",\"i32\"];"));
        assert!(out.contains("Value::I32(value)=>valueas&dyn::core::any::Any"));
        assert!(out.contains("arity:2usize"));
    }

    #[test]
    fn test_codec_only_when_requested() {
        let plain = render("#[union(String, i32)] pub struct Value;");
        assert!(!plain.contains("serde::Serialize"));

        let out = render("#[derive(Clone, Serialize, Deserialize)] #[union(String, i32)] pub struct Value;");
        assert!(out.contains("#[derive(Clone)]"));
        assert!(out.contains("impl::sumtype_core::serde::SerializeforValue"));
        assert!(out.contains("impl::sumtype_core::UnionCodecforValue"));
        assert!(out.contains("case_insensitive:false"));
    }

    #[test]
    fn test_shared_properties_are_projected() {
        let out = render(
            r#"
            pub struct Circle { pub radius: f64, pub label: String }
            impl Circle { pub fn area(&self) -> f64 { 0.0 } }
            pub struct Square { pub side: f64, pub label: String }
            impl Square {
                pub fn area(&self) -> f64 { 0.0 }
                pub fn radius(&self) -> f64 { 0.0 }
            }
            #[union(Circle, Square)] pub struct Shape;
            "#,
        );

        assert!(out.contains("pubfnlabel(&self)->&String{self.match_ref(|value|&value.label,|value|&value.label)}"));
        assert!(out.contains("pubfnarea(&self)->f64{self.match_ref(|value|value.area(),|value|value.area())}"));
        // `&f64` field against `f64` getter: different types, not projected.
        assert!(!out.contains("pubfnradius"));
        assert!(!out.contains("pubfnside"));
    }

    #[test]
    fn test_no_projection_with_unknown_variant() {
        let out = render(
            r#"
            pub struct Circle { pub label: String }
            #[union(Circle, i32)] pub struct Shape;
            "#,
        );

        assert!(!out.contains("pubfnlabel"));
    }
}
