//! Declarations as read from source, and the validated variant sets derived
//! from them.

use std::fmt;

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Attribute, Fields, Generics, Ident, Type, Visibility};

/// Marker attribute declaring a union.
pub const UNION_MARKER: &str = "union";
/// Marker attribute declaring a result.
pub const RESULT_MARKER: &str = "result";

/// A type as written in a declaration, plus its identity key.
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub ty: Type,
    /// Token text with all whitespace removed; two types are the same type
    /// exactly when their canonical texts are equal.
    pub canonical: String,
}

impl TypeRef {
    pub fn new(ty: Type) -> Self {
        let canonical = canonical_text(&ty);
        Self { ty, canonical }
    }

    /// Tag used on the wire: the last path segment with its generic
    /// arguments, or the canonical text for anything that is not a path.
    pub fn short_tag(&self) -> String {
        match &self.ty {
            Type::Path(path) if path.qself.is_none() => match path.path.segments.last() {
                Some(last) => strip_whitespace(&last.to_token_stream().to_string()),
                None => self.canonical.clone(),
            },
            _ => self.canonical.clone(),
        }
    }

    /// Last path segment identifier when the type is a plain path without
    /// generic arguments.
    pub fn simple_ident(&self) -> Option<&Ident> {
        match &self.ty {
            Type::Path(path) if path.qself.is_none() => {
                let last = path.path.segments.last()?;
                last.arguments.is_none().then_some(&last.ident)
            }
            _ => None,
        }
    }

    /// Leading path segments, for `a::b::Shape` this is `["a", "b"]`.
    pub fn path_prefix(&self) -> Vec<String> {
        match &self.ty {
            Type::Path(path) if path.qself.is_none() => {
                let count = path.path.segments.len().saturating_sub(1);
                path.path
                    .segments
                    .iter()
                    .take(count)
                    .map(|s| s.ident.to_string())
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for TypeRef {}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl ToTokens for TypeRef {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.ty.to_tokens(tokens);
    }
}

pub fn canonical_text(tokens: &impl ToTokens) -> String {
    strip_whitespace(&tokens.to_token_stream().to_string())
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Union,
    Result,
}

impl DeclKind {
    pub fn marker(self) -> &'static str {
        match self {
            DeclKind::Union => UNION_MARKER,
            DeclKind::Result => RESULT_MARKER,
        }
    }

    /// Accepted number of listed types.
    pub fn arity_range(self) -> std::ops::RangeInclusive<usize> {
        match self {
            DeclKind::Union => 2..=5,
            DeclKind::Result => 1..=2,
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclKind::Union => f.write_str("union"),
            DeclKind::Result => f.write_str("result"),
        }
    }
}

/// One level of nesting around a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    /// An inline `mod name { .. }`.
    Module(String),
    /// The body of a function or method.
    Function(String),
    /// Any other item body, e.g. a `const` initializer block.
    Other(String),
}

impl Container {
    /// Only modules can hold generated items.
    pub fn is_extensible(&self) -> bool {
        matches!(self, Container::Module(_))
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Module(name) => write!(f, "module `{name}`"),
            Container::Function(name) => write!(f, "function `{name}`"),
            Container::Other(name) => write!(f, "`{name}`"),
        }
    }
}

/// The struct a marker attribute was placed on.
#[derive(Debug, Clone)]
pub struct Shell {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub ident: Ident,
    pub generics: Generics,
    pub fields: Fields,
}

impl Shell {
    /// True when the struct already has a shape of its own.
    pub fn has_representation(&self) -> bool {
        !matches!(self.fields, Fields::Unit) || !self.generics.params.is_empty()
    }
}

/// A marked struct found in source.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclKind,
    pub shell: Shell,
    /// Types listed in the marker attribute, in order.
    pub types: Vec<TypeRef>,
    /// Enclosing containers, outermost first.
    pub scope: Vec<Container>,
}

impl Declaration {
    pub fn name(&self) -> String {
        self.shell.ident.to_string()
    }

    /// Module path when every container is a module.
    pub fn module_path(&self) -> Option<Vec<String>> {
        self.scope
            .iter()
            .map(|c| match c {
                Container::Module(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Key shared by the scanner and the expander to refer to this
    /// declaration.
    pub fn key(&self) -> String {
        declaration_key(&self.scope, &self.shell.ident)
    }
}

pub fn declaration_key(scope: &[Container], ident: &Ident) -> String {
    let mut key = String::new();
    for container in scope {
        match container {
            Container::Module(name) => key.push_str(&format!("mod {name}/")),
            Container::Function(name) => key.push_str(&format!("fn {name}/")),
            Container::Other(name) => key.push_str(&format!("{name}/")),
        }
    }
    key.push_str(&ident.to_string());
    key
}

/// A declaration that passed validation: the ordered, distinct variant
/// types bound to their owner.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub kind: DeclKind,
    pub shell: Shell,
    pub module_path: Vec<String>,
    pub variants: Vec<TypeRef>,
}

impl TypeSpec {
    pub fn name(&self) -> String {
        self.shell.ident.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn type_ref(src: &str) -> TypeRef {
        TypeRef::new(syn::parse_str(src).unwrap())
    }

    #[test]
    fn test_identity_ignores_whitespace() {
        assert_eq!(type_ref("Vec<u8>"), type_ref("Vec < u8 >"));
        assert_ne!(type_ref("String"), type_ref("std::string::String"));
    }

    #[rstest]
    #[case("Circle", "Circle")]
    #[case("shapes::Circle", "Circle")]
    #[case("Vec<u8>", "Vec<u8>")]
    #[case("std::collections::HashMap<String, i32>", "HashMap<String,i32>")]
    #[case("(i32, bool)", "(i32,bool)")]
    fn test_short_tag(#[case] src: &str, #[case] expected: &str) {
        assert_eq!(type_ref(src).short_tag(), expected);
    }

    #[test]
    fn test_simple_ident_and_prefix() {
        let shape = type_ref("geo::shapes::Shape");
        assert_eq!(shape.simple_ident().map(|i| i.to_string()), Some("Shape".to_string()));
        assert_eq!(shape.path_prefix(), vec!["geo", "shapes"]);
        assert!(type_ref("Vec<u8>").simple_ident().is_none());
    }

    #[test]
    fn test_module_path_requires_modules_only() {
        let shell: syn::ItemStruct = syn::parse_str("struct Shape;").unwrap();
        let mut decl = Declaration {
            kind: DeclKind::Union,
            shell: Shell {
                attrs: shell.attrs,
                vis: shell.vis,
                ident: shell.ident,
                generics: shell.generics,
                fields: shell.fields,
            },
            types: vec![],
            scope: vec![Container::Module("geo".into())],
        };
        assert_eq!(decl.module_path(), Some(vec!["geo".to_string()]));
        assert_eq!(decl.key(), "mod geo/Shape");

        decl.scope.push(Container::Function("build".into()));
        assert_eq!(decl.module_path(), None);
    }
}
