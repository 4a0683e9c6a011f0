//! Code synthesis for validated declarations.
//!
//! Each synthesizer turns a [`TypeSpec`](crate::model::TypeSpec) into the
//! token stream that replaces the declaration shell: the enum itself, its
//! inherent methods, conversions, the runtime trait impl and, when the shell
//! asked for serde derives, the envelope codec impls.

pub mod result;
pub mod union;

use syn::punctuated::Punctuated;
use syn::{Attribute, Path, Token};

use crate::scan::{TypeCatalog, is_marker};

pub use result::render_result;
pub use union::render_union;

/// Everything a synthesizer needs beyond the declaration itself.
pub struct Context<'a> {
    /// Where generated code finds the runtime crate.
    pub runtime: &'a Path,
    /// Baked into generated `Deserialize` impls.
    pub case_insensitive: bool,
    pub catalog: &'a TypeCatalog,
}

/// Shell attributes split into what is carried onto the enum and which
/// serde derives were intercepted.
#[derive(Debug, Default)]
pub(crate) struct ShellAttrs {
    pub attrs: Vec<Attribute>,
    pub serialize: bool,
    pub deserialize: bool,
}

impl ShellAttrs {
    fn intercepted(&self) -> bool {
        self.serialize || self.deserialize
    }
}

pub(crate) fn split_attrs(attrs: &[Attribute]) -> syn::Result<ShellAttrs> {
    let mut split = ShellAttrs::default();

    for attr in attrs {
        if is_marker(attr) {
            continue;
        }
        if !attr.path().is_ident("derive") {
            split.attrs.push(attr.clone());
            continue;
        }

        let derives = attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)?;
        let mut kept: Punctuated<Path, Token![,]> = Punctuated::new();
        for path in derives {
            match path.segments.last().map(|s| s.ident.to_string()).as_deref() {
                Some("Serialize") => split.serialize = true,
                Some("Deserialize") => split.deserialize = true,
                _ => kept.push(path),
            }
        }
        if !kept.is_empty() {
            split.attrs.push(syn::parse_quote!(#[derive(#kept)]));
        }
    }

    // Container attributes for serde's derive have no meaning without it.
    if split.intercepted() {
        split.attrs.retain(|attr| !attr.path().is_ident("serde"));
    }

    Ok(split)
}
