//! Variant set resolution.
//!
//! Validation runs the rules in a fixed order and stops at the first one a
//! declaration breaks:
//!
//! 1. placement: every enclosing container is a module
//! 2. base type: the shell is a plain unit struct
//! 3. arity: 2..=5 types for unions, 1..=2 for results
//! 4. no `dyn Any`
//! 5. no trait types (unions only)
//! 6. no type listed twice
//!
//! A declaration that passes becomes a [`TypeSpec`] with its types in
//! declaration order.

use syn::{GenericArgument, PathArguments, Type, TypeParamBound};
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::model::{DeclKind, Declaration, TypeRef, TypeSpec};
use crate::scan::TypeCatalog;

/// Pointer-like wrappers looked through when classifying a type.
const WRAPPERS: &[&str] = &["Box", "Rc", "Arc"];

pub fn resolve(decl: &Declaration, catalog: &TypeCatalog) -> Result<TypeSpec, Diagnostic> {
    let name = decl.name();
    let kind = decl.kind;
    let fail = |code: DiagnosticCode, message: String| Diagnostic::new(kind, code, name.clone(), message);

    let module_path = match decl.module_path() {
        Some(path) => path,
        None => {
            let container = decl
                .scope
                .iter()
                .find(|c| !c.is_extensible())
                .map(|c| c.to_string())
                .unwrap_or_default();
            return Err(fail(
                DiagnosticCode::TopLevelError,
                format!("{kind} `{name}` must be declared at module level, not inside {container}"),
            ));
        }
    };

    if decl.shell.has_representation() {
        return Err(fail(
            DiagnosticCode::WrongBaseType,
            format!("{kind} `{name}` must be a unit struct without fields or generic parameters"),
        ));
    }

    let arity = kind.arity_range();
    if !arity.contains(&decl.types.len()) {
        return Err(fail(
            DiagnosticCode::InvalidArity,
            format!(
                "{kind} `{name}` lists {} type(s); expected {} to {}",
                decl.types.len(),
                arity.start(),
                arity.end()
            ),
        ));
    }

    if let Some(any) = decl.types.iter().find(|t| is_top_type(&t.ty)) {
        return Err(fail(
            DiagnosticCode::ObjectNotValidType,
            format!("{kind} `{name}` uses `{any}`; conversions to or from `dyn Any` are not allowed"),
        ));
    }

    let interface = match kind {
        DeclKind::Union => decl.types.iter().find(|t| is_interface(&t.ty, catalog)),
        DeclKind::Result => None,
    };
    if let Some(interface) = interface {
        return Err(fail(
            DiagnosticCode::InterfaceNotValidType,
            format!("union `{name}` uses trait type `{interface}`; conversions to or from a trait are not allowed"),
        ));
    }

    if let Some(repeated) = first_repeated(&decl.types) {
        let message = match kind {
            DeclKind::Union => format!("union `{name}` lists `{repeated}` more than once"),
            DeclKind::Result => format!("result `{name}` uses `{repeated}` for both Ok and Err"),
        };
        return Err(fail(DiagnosticCode::RepeatedTypeSymbols, message));
    }

    debug!(declaration = %name, %kind, variants = decl.types.len(), "resolved variant set");
    Ok(TypeSpec {
        kind,
        shell: decl.shell.clone(),
        module_path,
        variants: decl.types.clone(),
    })
}

fn first_repeated(types: &[TypeRef]) -> Option<&TypeRef> {
    types
        .iter()
        .enumerate()
        .find(|(i, ty)| types[..*i].contains(ty))
        .map(|(_, ty)| ty)
}

/// Strip references, parentheses and smart pointers.
fn peel(ty: &Type) -> &Type {
    match ty {
        Type::Reference(reference) => peel(&reference.elem),
        Type::Paren(paren) => peel(&paren.elem),
        Type::Group(group) => peel(&group.elem),
        Type::Path(path) if path.qself.is_none() => {
            let Some(last) = path.path.segments.last() else {
                return ty;
            };
            if !WRAPPERS.iter().any(|w| last.ident == *w) {
                return ty;
            }
            let PathArguments::AngleBracketed(args) = &last.arguments else {
                return ty;
            };
            match args.args.iter().collect::<Vec<_>>().as_slice() {
                [GenericArgument::Type(inner)] => peel(inner),
                _ => ty,
            }
        }
        _ => ty,
    }
}

fn names_any(bound: &TypeParamBound) -> bool {
    match bound {
        TypeParamBound::Trait(trait_bound) => trait_bound
            .path
            .segments
            .last()
            .is_some_and(|s| s.ident == "Any" && s.arguments.is_none()),
        _ => false,
    }
}

/// `dyn Any`, possibly boxed, referenced or with auto-trait bounds.
pub fn is_top_type(ty: &Type) -> bool {
    match peel(ty) {
        Type::TraitObject(object) => object.bounds.iter().any(names_any),
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .is_some_and(|s| s.ident == "Any" && s.arguments.is_none()),
        _ => false,
    }
}

/// A trait object, an `impl Trait`, or the bare name of a scanned trait.
pub fn is_interface(ty: &Type, catalog: &TypeCatalog) -> bool {
    match peel(ty) {
        Type::TraitObject(_) | Type::ImplTrait(_) => true,
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .is_some_and(|s| s.arguments.is_none() && catalog.is_trait(&s.ident.to_string())),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan_file;
    use rstest::rstest;

    fn resolve_all(src: &str) -> Vec<Result<TypeSpec, Diagnostic>> {
        let file = syn::parse_file(src).unwrap();
        let mut catalog = TypeCatalog::new();
        let declarations = scan_file(&file, &mut catalog).unwrap();
        declarations.iter().map(|d| resolve(d, &catalog)).collect()
    }

    fn code_of(src: &str) -> Option<DiagnosticCode> {
        resolve_all(src).remove(0).err().map(|d| d.code)
    }

    #[test]
    fn test_valid_union_keeps_order() {
        let spec = resolve_all("#[union(String, i32, Vec<u8>)] pub struct Value;")
            .remove(0)
            .unwrap();

        let names: Vec<String> = spec.variants.iter().map(|t| t.canonical.clone()).collect();
        assert_eq!(names, vec!["String", "i32", "Vec<u8>"]);
        assert!(spec.module_path.is_empty());
    }

    #[test]
    fn test_nested_module_is_allowed() {
        let spec = resolve_all("mod a { mod b { #[result(i32, String)] pub struct Parsed; } }")
            .remove(0)
            .unwrap();

        assert_eq!(spec.module_path, vec!["a", "b"]);
    }

    #[rstest]
    #[case::inside_fn("fn f() { #[union(i32, u8)] struct U; }", DiagnosticCode::TopLevelError)]
    #[case::inside_method("struct S; impl S { fn f() { #[result(u8)] struct R; } }", DiagnosticCode::TopLevelError)]
    #[case::fields("#[union(i32, u8)] struct U { x: i32 }", DiagnosticCode::WrongBaseType)]
    #[case::tuple("#[result(i32, u8)] struct R(i32);", DiagnosticCode::WrongBaseType)]
    #[case::generics("#[union(i32, u8)] struct U<T>;", DiagnosticCode::WrongBaseType)]
    #[case::one_variant("#[union(i32)] struct U;", DiagnosticCode::InvalidArity)]
    #[case::six_variants("#[union(u8, u16, u32, u64, i8, i16)] struct U;", DiagnosticCode::InvalidArity)]
    #[case::empty_result("#[result] struct R;", DiagnosticCode::InvalidArity)]
    #[case::dyn_any("#[union(i32, Box<dyn Any>)] struct U;", DiagnosticCode::ObjectNotValidType)]
    #[case::any_send("#[result(std::sync::Arc<dyn std::any::Any + Send>)] struct R;", DiagnosticCode::ObjectNotValidType)]
    #[case::dyn_trait("#[union(i32, Box<dyn std::fmt::Debug>)] struct U;", DiagnosticCode::InterfaceNotValidType)]
    #[case::impl_trait("#[union(i32, impl Clone)] struct U;", DiagnosticCode::InterfaceNotValidType)]
    #[case::scanned_trait("trait Shape {} #[union(i32, Shape)] struct U;", DiagnosticCode::InterfaceNotValidType)]
    #[case::repeated("#[union(i32, String, i32)] struct U;", DiagnosticCode::RepeatedTypeSymbols)]
    #[case::repeated_spacing("#[union(Vec<u8>, Vec < u8 >)] struct U;", DiagnosticCode::RepeatedTypeSymbols)]
    #[case::ok_equals_err("#[result(String, String)] struct R;", DiagnosticCode::RepeatedTypeSymbols)]
    fn test_rejections(#[case] src: &str, #[case] expected: DiagnosticCode) {
        assert_eq!(code_of(src), Some(expected));
    }

    #[test]
    fn test_trait_objects_are_fine_in_results() {
        let spec = resolve_all("#[result(Box<dyn std::error::Error>)] pub struct Saved;").remove(0);

        assert!(spec.is_ok());
    }

    #[test]
    fn test_precedence_first_rule_wins() {
        // Placement beats everything else.
        assert_eq!(
            code_of("fn f() { #[union(i32, i32)] struct U { x: u8 } }"),
            Some(DiagnosticCode::TopLevelError)
        );
        // Base type beats repeated types.
        assert_eq!(
            code_of("#[union(i32, i32)] struct U(u8);"),
            Some(DiagnosticCode::WrongBaseType)
        );
        // Top type beats trait types and repetition.
        assert_eq!(
            code_of("#[union(Box<dyn Debug>, dyn Any, dyn Any)] struct U;"),
            Some(DiagnosticCode::ObjectNotValidType)
        );
    }

    #[test]
    fn test_diagnostic_carries_ids_and_name() {
        let diagnostic = resolve_all("#[result(u8, u8)] pub struct Same;")
            .remove(0)
            .unwrap_err();

        assert_eq!(diagnostic.id, "SUM0004");
        assert_eq!(diagnostic.type_name, "Same");
        assert!(diagnostic.message.contains("`u8`"));
    }

    #[test]
    fn test_each_declaration_is_independent() {
        let results = resolve_all(
            r#"
            #[union(i32, i32)] pub struct Bad;
            #[union(i32, String)] pub struct Good;
            "#,
        );

        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }

    #[rstest]
    #[case("dyn Any", true)]
    #[case("&dyn Any", true)]
    #[case("Box<dyn Any + Send + Sync>", true)]
    #[case("Any", true)]
    #[case("Vec<Box<dyn Any>>", false)]
    #[case("AnyThing", false)]
    fn test_top_type_spellings(#[case] src: &str, #[case] expected: bool) {
        let ty: Type = syn::parse_str(src).unwrap();
        assert_eq!(is_top_type(&ty), expected);
    }
}
