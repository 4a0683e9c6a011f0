//! Read-only pass over declaration files.
//!
//! Scanning collects everything the expander needs to know before it touches
//! any file: the marked declarations with their enclosing containers, the
//! traits that are declared (interfaces, for validation), the properties each
//! struct exposes (for shared-property projection), and, once unions are
//! resolved, the variant sets of every valid union (for result conversions).

use indexmap::{IndexMap, IndexSet};
use syn::punctuated::Punctuated;
use syn::visit::{self, Visit};
use syn::{
    Attribute, Fields, FnArg, ImplItem, ImplItemFn, ItemConst, ItemFn, ItemImpl, ItemMod,
    ItemStatic, ItemStruct, ItemTrait, Meta, ReturnType, Token, TraitItemFn, Type, Visibility,
};
use tracing::trace;

use crate::model::{
    Container, DeclKind, Declaration, RESULT_MARKER, Shell, TypeRef, TypeSpec, UNION_MARKER,
};

/// How a projected property is read from a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// `&value.name`
    Field,
    /// `value.name()`
    Getter,
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: syn::Ident,
    /// Type the projection returns: `&T` for fields, the return type for
    /// getters.
    pub exposed: TypeRef,
    pub access: Access,
}

/// A union that passed validation.
#[derive(Debug, Clone)]
pub struct UnionInfo {
    pub name: String,
    pub module_path: Vec<String>,
    pub variants: Vec<TypeRef>,
}

/// Properties of one struct, keyed by property name.
#[derive(Debug, Clone)]
struct StructProperties {
    module_path: Vec<String>,
    properties: IndexMap<String, Property>,
}

/// Facts gathered from every scanned file.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    traits: IndexSet<String>,
    properties: IndexMap<String, Vec<StructProperties>>,
    unions: IndexMap<String, Vec<UnionInfo>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when a trait named `name` is declared in a scanned file.
    pub fn is_trait(&self, name: &str) -> bool {
        self.traits.contains(name)
    }

    /// Properties of a plain named type as seen from module `from`, in
    /// declaration order.
    pub fn properties_of(&self, ty: &TypeRef, from: &[String]) -> Option<&IndexMap<String, Property>> {
        let ident = ty.simple_ident()?;
        let candidates = self.properties.get(&ident.to_string())?;
        resolve_scoped(candidates, |s| &s.module_path, ty, from).map(|s| &s.properties)
    }

    pub fn register_union(&mut self, spec: &TypeSpec) {
        trace!(union = %spec.name(), "registering union");
        self.unions.entry(spec.name()).or_default().push(UnionInfo {
            name: spec.name(),
            module_path: spec.module_path.clone(),
            variants: spec.variants.clone(),
        });
    }

    /// The valid union `ty` names, as seen from module `from`.
    ///
    /// Returns `None` when `ty` is not a union or when the name is ambiguous.
    pub fn union_for(&self, ty: &TypeRef, from: &[String]) -> Option<&UnionInfo> {
        let ident = ty.simple_ident()?;
        let candidates = self.unions.get(&ident.to_string())?;
        resolve_scoped(candidates, |u| &u.module_path, ty, from)
    }

    fn add_property(&mut self, owner: String, module_path: Vec<String>, property: Property) {
        let structs = self.properties.entry(owner).or_default();
        let index = match structs.iter().position(|s| s.module_path == module_path) {
            Some(index) => index,
            None => {
                structs.push(StructProperties {
                    module_path,
                    properties: IndexMap::new(),
                });
                structs.len() - 1
            }
        };
        structs[index]
            .properties
            .insert(property.name.to_string(), property);
    }
}

/// Pick the entry `ty` refers to among same-named `candidates`.
///
/// The written path prefix must be a suffix of the entry's module. Several
/// matches are narrowed to the one declared at `from` plus that prefix.
fn resolve_scoped<'a, T>(
    candidates: &'a [T],
    module_of: impl Fn(&T) -> &Vec<String>,
    ty: &TypeRef,
    from: &[String],
) -> Option<&'a T> {
    let prefix: Vec<String> = ty
        .path_prefix()
        .into_iter()
        .filter(|s| s != "crate" && s != "self" && s != "super")
        .collect();

    let matching: Vec<&T> = candidates
        .iter()
        .filter(|c| module_of(c).ends_with(&prefix))
        .collect();

    match matching.as_slice() {
        [single] => Some(*single),
        [] => None,
        many => {
            let mut expected = from.to_vec();
            expected.extend(prefix.iter().cloned());
            many.iter().copied().find(|c| *module_of(c) == expected)
        }
    }
}

/// Collect the declarations of `file` and record its traits and properties
/// in `catalog`.
///
/// Fails only when a marker attribute cannot be read as a list of types.
pub fn scan_file(file: &syn::File, catalog: &mut TypeCatalog) -> syn::Result<Vec<Declaration>> {
    let mut scanner = Scanner {
        catalog,
        scope: Vec::new(),
        declarations: Vec::new(),
        error: None,
    };
    scanner.visit_file(file);
    match scanner.error {
        Some(error) => Err(error),
        None => Ok(scanner.declarations),
    }
}

/// The marker attribute on a struct, if any.
pub fn find_marker(attrs: &[Attribute]) -> Option<(DeclKind, &Attribute)> {
    attrs.iter().find_map(|attr| {
        if attr.path().is_ident(UNION_MARKER) {
            Some((DeclKind::Union, attr))
        } else if attr.path().is_ident(RESULT_MARKER) {
            Some((DeclKind::Result, attr))
        } else {
            None
        }
    })
}

pub fn is_marker(attr: &Attribute) -> bool {
    attr.path().is_ident(UNION_MARKER) || attr.path().is_ident(RESULT_MARKER)
}

/// Types listed in a marker; a bare `#[union]` lists none.
fn marker_types(attr: &Attribute) -> syn::Result<Vec<TypeRef>> {
    match &attr.meta {
        Meta::Path(_) => Ok(Vec::new()),
        Meta::List(list) => {
            let types = list.parse_args_with(Punctuated::<Type, Token![,]>::parse_terminated)?;
            Ok(types.into_iter().map(TypeRef::new).collect())
        }
        Meta::NameValue(nv) => Err(syn::Error::new_spanned(
            nv,
            "expected a parenthesized list of types",
        )),
    }
}

struct Scanner<'a> {
    catalog: &'a mut TypeCatalog,
    scope: Vec<Container>,
    declarations: Vec<Declaration>,
    error: Option<syn::Error>,
}

impl Scanner<'_> {
    fn within<F: FnOnce(&mut Self)>(&mut self, container: Container, f: F) {
        self.scope.push(container);
        f(self);
        self.scope.pop();
    }

    /// Enclosing modules, or `None` inside a function or other item.
    fn module_path(&self) -> Option<Vec<String>> {
        self.scope
            .iter()
            .map(|c| match c {
                Container::Module(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Module of the type an `impl` block names, relative to the file root.
    fn owner_module(&self, path: &syn::Path) -> Option<Vec<String>> {
        let mut module = self.module_path()?;
        let segments: Vec<&syn::PathSegment> = path.segments.iter().collect();
        let parents = segments.split_last().map(|(_, parents)| parents).unwrap_or_default();
        for segment in parents {
            match segment.ident.to_string().as_str() {
                "crate" => module.clear(),
                "self" => {}
                "super" => {
                    module.pop();
                }
                other => module.push(other.to_string()),
            }
        }
        Some(module)
    }

    fn record_fields(&mut self, node: &ItemStruct) {
        if !node.generics.params.is_empty() {
            return;
        }
        let Some(module_path) = self.module_path() else {
            return;
        };
        let Fields::Named(named) = &node.fields else {
            return;
        };
        for field in &named.named {
            let (Visibility::Public(_), Some(name)) = (&field.vis, &field.ident) else {
                continue;
            };
            let ty = &field.ty;
            let exposed: Type = syn::parse_quote!(&#ty);
            self.catalog.add_property(
                node.ident.to_string(),
                module_path.clone(),
                Property {
                    name: name.clone(),
                    exposed: TypeRef::new(exposed),
                    access: Access::Field,
                },
            );
        }
    }

    fn record_getters(&mut self, node: &ItemImpl) {
        if node.trait_.is_some() || !node.generics.params.is_empty() {
            return;
        }
        let Type::Path(self_ty) = &*node.self_ty else {
            return;
        };
        let Some(owner) = self_ty.path.segments.last() else {
            return;
        };
        if !owner.arguments.is_none() {
            return;
        }
        let Some(module_path) = self.owner_module(&self_ty.path) else {
            return;
        };
        for item in &node.items {
            let ImplItem::Fn(method) = item else {
                continue;
            };
            if let Some(exposed) = getter_type(method) {
                self.catalog.add_property(
                    owner.ident.to_string(),
                    module_path.clone(),
                    Property {
                        name: method.sig.ident.clone(),
                        exposed,
                        access: Access::Getter,
                    },
                );
            }
        }
    }
}

/// Return type of `pub fn name(&self) -> T` with no other parameters.
fn getter_type(method: &ImplItemFn) -> Option<TypeRef> {
    let sig = &method.sig;
    if !matches!(method.vis, Visibility::Public(_))
        || !sig.generics.params.is_empty()
        || sig.asyncness.is_some()
        || sig.unsafety.is_some()
        || sig.inputs.len() != 1
    {
        return None;
    }
    let Some(FnArg::Receiver(receiver)) = sig.inputs.first() else {
        return None;
    };
    if receiver.reference.is_none() || receiver.mutability.is_some() {
        return None;
    }
    let ReturnType::Type(_, ty) = &sig.output else {
        return None;
    };
    if matches!(**ty, Type::ImplTrait(_)) {
        return None;
    }
    let exposed = TypeRef::new((**ty).clone());
    // A getter returning `Self` means something different on every variant.
    if exposed.canonical.split(|c: char| !c.is_alphanumeric() && c != '_').any(|w| w == "Self") {
        return None;
    }
    Some(exposed)
}

impl<'ast> Visit<'ast> for Scanner<'_> {
    fn visit_item_mod(&mut self, node: &'ast ItemMod) {
        self.within(Container::Module(node.ident.to_string()), |s| {
            visit::visit_item_mod(s, node)
        });
    }

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        self.within(Container::Function(node.sig.ident.to_string()), |s| {
            visit::visit_item_fn(s, node)
        });
    }

    fn visit_impl_item_fn(&mut self, node: &'ast ImplItemFn) {
        self.within(Container::Function(node.sig.ident.to_string()), |s| {
            visit::visit_impl_item_fn(s, node)
        });
    }

    fn visit_trait_item_fn(&mut self, node: &'ast TraitItemFn) {
        self.within(Container::Function(node.sig.ident.to_string()), |s| {
            visit::visit_trait_item_fn(s, node)
        });
    }

    fn visit_item_const(&mut self, node: &'ast ItemConst) {
        self.within(Container::Other(format!("const {}", node.ident)), |s| {
            visit::visit_item_const(s, node)
        });
    }

    fn visit_item_static(&mut self, node: &'ast ItemStatic) {
        self.within(Container::Other(format!("static {}", node.ident)), |s| {
            visit::visit_item_static(s, node)
        });
    }

    fn visit_item_trait(&mut self, node: &'ast ItemTrait) {
        self.catalog.traits.insert(node.ident.to_string());
        visit::visit_item_trait(self, node);
    }

    fn visit_item_impl(&mut self, node: &'ast ItemImpl) {
        self.record_getters(node);
        visit::visit_item_impl(self, node);
    }

    fn visit_item_struct(&mut self, node: &'ast ItemStruct) {
        let Some((kind, attr)) = find_marker(&node.attrs) else {
            self.record_fields(node);
            return;
        };
        match marker_types(attr) {
            Ok(types) => self.declarations.push(Declaration {
                kind,
                shell: Shell {
                    attrs: node.attrs.clone(),
                    vis: node.vis.clone(),
                    ident: node.ident.clone(),
                    generics: node.generics.clone(),
                    fields: node.fields.clone(),
                },
                types,
                scope: self.scope.clone(),
            }),
            Err(error) => {
                if self.error.is_none() {
                    self.error = Some(error);
                }
            }
        }
    }
}
