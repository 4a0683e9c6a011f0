//! Identifier derivation for generated items.
//!
//! A [`Name`] is a list of words that can be rendered in the cases generated
//! code needs: `TitleCase` for enum variants and `snake_case` for closure
//! parameters.

use std::fmt;

use syn::{GenericArgument, PathArguments, Type};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub words: Vec<String>,
}

impl Name {
    pub fn new(words: &[&str]) -> Self {
        Name {
            words: words.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Split an identifier in any common case into words.
    ///
    /// An uppercase letter starts a new word unless it continues an acronym
    /// (`HTTPServer` is `http server`).
    pub fn from(name: &str) -> Self {
        let chars: Vec<char> = name.chars().collect();
        let mut words = Vec::new();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if c == '_' || c == '-' || c == ':' || c == '.' {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                continue;
            }
            if c.is_uppercase() && !current.is_empty() {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                if !prev.is_uppercase() || next_is_lower {
                    words.push(std::mem::take(&mut current));
                }
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }

        Name { words }
    }

    /// Words of a type, outermost first: `Vec<u8>` is `vec u8`.
    ///
    /// Only the last path segment of each path contributes.
    pub fn from_type(ty: &Type) -> Self {
        let mut words = Vec::new();
        collect_type_words(ty, &mut words);
        if words.is_empty() {
            words.push("variant".to_string());
        }
        Name { words }
    }

    pub fn to_snake_case(&self) -> String {
        self.words.join("_").to_lowercase()
    }

    pub fn to_title_case(&self) -> String {
        self.words
            .iter()
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    None => String::new(),
                    Some(f) => f.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                }
            })
            .collect::<Vec<String>>()
            .join("")
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_snake_case())
    }
}

fn collect_type_words(ty: &Type, words: &mut Vec<String>) {
    match ty {
        Type::Path(path) => {
            if let Some(last) = path.path.segments.last() {
                words.extend(Name::from(&last.ident.to_string()).words);
                if let PathArguments::AngleBracketed(args) = &last.arguments {
                    for arg in &args.args {
                        if let GenericArgument::Type(inner) = arg {
                            collect_type_words(inner, words);
                        }
                    }
                }
            }
        }
        Type::Reference(reference) => collect_type_words(&reference.elem, words),
        Type::Paren(paren) => collect_type_words(&paren.elem, words),
        Type::Group(group) => collect_type_words(&group.elem, words),
        Type::Slice(slice) => {
            collect_type_words(&slice.elem, words);
            words.push("slice".to_string());
        }
        Type::Array(array) => {
            collect_type_words(&array.elem, words);
            words.push("array".to_string());
        }
        Type::Ptr(ptr) => {
            collect_type_words(&ptr.elem, words);
            words.push("ptr".to_string());
        }
        Type::Tuple(tuple) if tuple.elems.is_empty() => words.push("unit".to_string()),
        Type::Tuple(tuple) => {
            for elem in &tuple.elems {
                collect_type_words(elem, words);
            }
            words.push("tuple".to_string());
        }
        _ => {}
    }
}

/// Type-derived variant identifiers, made unique by an index suffix.
pub fn variant_idents<'a>(types: impl IntoIterator<Item = &'a Type>) -> Vec<String> {
    let mut idents: Vec<String> = Vec::new();
    for (index, ty) in types.into_iter().enumerate() {
        let base = Name::from_type(ty).to_title_case();
        let ident = if idents.contains(&base) {
            format!("{base}{index}")
        } else {
            base
        };
        idents.push(ident);
    }
    idents
}

/// Closure parameter name for a variant identifier: `VecU8` is `on_vec_u8`.
pub fn handler_name(variant: &str) -> String {
    format!("on_{}", Name::from(variant).to_snake_case())
}
