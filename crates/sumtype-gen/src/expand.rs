//! Rewriting declaration files.
//!
//! A [`Session`] collects every source first so that the catalog is complete
//! before anything is generated: unions are resolved across all sources
//! before any result, which lets a result in one file convert from the
//! variants of a union declared in another.
//!
//! Each valid declaration shell is replaced by its generated items. A
//! rejected declaration keeps its shell, loses its marker attribute and
//! yields a [`Diagnostic`]; the rest of the file is generated as usual.

use std::path::PathBuf;

use indexmap::IndexMap;
use quote::ToTokens;
use syn::visit_mut::{self, VisitMut};
use syn::{Item, ItemStruct};
use tracing::{debug, warn};

use crate::config::GenConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::model::{Container, DeclKind, Declaration, TypeSpec, declaration_key};
use crate::resolver::resolve;
use crate::scan::{TypeCatalog, find_marker, is_marker, scan_file};
use crate::synth::{Context, render_result, render_union};

/// Outcome of expanding one source.
#[derive(Debug, Clone)]
pub struct Expansion {
    /// Where the source came from, when it was read from disk.
    pub path: Option<PathBuf>,
    pub file: syn::File,
    /// One per rejected declaration, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Names of the generated types, in source order.
    pub generated: Vec<String>,
}

impl Expansion {
    /// Render the expanded file, one item per paragraph.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for attr in &self.file.attrs {
            out.push_str(&attr.to_token_stream().to_string());
            out.push('\n');
        }
        for item in &self.file.items {
            out.push_str(&item.to_token_stream().to_string());
            out.push_str("\n\n");
        }
        out
    }
}

struct SourceUnit {
    origin: String,
    path: Option<PathBuf>,
    file: syn::File,
    declarations: Vec<Declaration>,
}

type Resolutions = IndexMap<String, std::result::Result<TypeSpec, Diagnostic>>;

/// A set of sources expanded together.
#[derive(Default)]
pub struct Session {
    catalog: TypeCatalog,
    units: Vec<SourceUnit>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and scan a source held in memory.
    pub fn add_source(&mut self, origin: impl Into<String>, src: &str) -> Result<()> {
        self.push(origin.into(), None, src)
    }

    /// Read, parse and scan a source file.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let src = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        self.push(path.display().to_string(), Some(path), &src)
    }

    fn push(&mut self, origin: String, path: Option<PathBuf>, src: &str) -> Result<()> {
        let file = syn::parse_file(src).map_err(|e| Error::syn(origin.clone(), e))?;
        let declarations =
            scan_file(&file, &mut self.catalog).map_err(|e| Error::syn(origin.clone(), e))?;
        debug!(source = %origin, declarations = declarations.len(), "scanned source");
        self.units.push(SourceUnit {
            origin,
            path,
            file,
            declarations,
        });
        Ok(())
    }

    /// Validate and generate every declaration of every source.
    pub fn expand(mut self, config: &GenConfig) -> Result<Vec<Expansion>> {
        let runtime = config.runtime()?;

        let mut resolutions: Vec<Resolutions> = Vec::with_capacity(self.units.len());
        for unit in &self.units {
            let mut resolved = Resolutions::new();
            for decl in unit.declarations.iter().filter(|d| d.kind == DeclKind::Union) {
                let outcome = resolve(decl, &self.catalog);
                if let Ok(spec) = &outcome {
                    self.catalog.register_union(spec);
                }
                resolved.insert(decl.key(), outcome);
            }
            resolutions.push(resolved);
        }
        for (unit, resolved) in self.units.iter().zip(resolutions.iter_mut()) {
            for decl in unit.declarations.iter().filter(|d| d.kind == DeclKind::Result) {
                resolved.insert(decl.key(), resolve(decl, &self.catalog));
            }
        }

        let ctx = Context {
            runtime: &runtime,
            case_insensitive: config.case_insensitive,
            catalog: &self.catalog,
        };

        let mut expansions = Vec::with_capacity(self.units.len());
        for (unit, resolved) in self.units.into_iter().zip(resolutions) {
            expansions.push(expand_unit(unit, &resolved, &ctx)?);
        }
        Ok(expansions)
    }
}

fn expand_unit(unit: SourceUnit, resolved: &Resolutions, ctx: &Context<'_>) -> Result<Expansion> {
    let SourceUnit {
        origin,
        path,
        mut file,
        declarations,
    } = unit;

    let mut diagnostics = Vec::new();
    for decl in &declarations {
        if let Some(Err(diagnostic)) = resolved.get(&decl.key()) {
            let diagnostic = match &path {
                Some(path) => diagnostic.clone().with_file(path),
                None => diagnostic.clone(),
            };
            warn!(
                source = %origin,
                id = diagnostic.id,
                declaration = %diagnostic.type_name,
                "{}",
                diagnostic.message
            );
            diagnostics.push(diagnostic);
        }
    }

    let mut generated = Vec::new();
    let items = std::mem::take(&mut file.items);
    file.items = expand_items(items, &mut Vec::new(), resolved, ctx, &mut generated)
        .map_err(|e| Error::syn(origin.clone(), e))?;
    MarkerStripper.visit_file_mut(&mut file);

    debug!(source = %origin, generated = generated.len(), diagnostics = diagnostics.len(), "expanded source");
    Ok(Expansion {
        path,
        file,
        diagnostics,
        generated,
    })
}

fn expand_items(
    items: Vec<Item>,
    scope: &mut Vec<Container>,
    resolved: &Resolutions,
    ctx: &Context<'_>,
    generated: &mut Vec<String>,
) -> syn::Result<Vec<Item>> {
    let mut out = Vec::with_capacity(items.len());

    for item in items {
        match item {
            Item::Struct(shell) if find_marker(&shell.attrs).is_some() => {
                let key = declaration_key(scope, &shell.ident);
                match resolved.get(&key) {
                    Some(Ok(spec)) => {
                        let tokens = match spec.kind {
                            DeclKind::Union => render_union(spec, ctx)?,
                            DeclKind::Result => render_result(spec, ctx)?,
                        };
                        let rendered: syn::File = syn::parse2(tokens)?;
                        out.extend(rendered.items);
                        generated.push(spec.name());
                    }
                    _ => out.push(Item::Struct(shell)),
                }
            }
            Item::Mod(mut module) => {
                if let Some((brace, content)) = module.content.take() {
                    scope.push(Container::Module(module.ident.to_string()));
                    let content = expand_items(content, scope, resolved, ctx, generated);
                    scope.pop();
                    module.content = Some((brace, content?));
                }
                out.push(Item::Mod(module));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

/// Drops marker attributes left on shells that were not generated.
struct MarkerStripper;

impl VisitMut for MarkerStripper {
    fn visit_item_struct_mut(&mut self, node: &mut ItemStruct) {
        node.attrs.retain(|attr| !is_marker(attr));
        visit_mut::visit_item_struct_mut(self, node);
    }
}

/// Expand a single source on its own.
pub fn expand_source(src: &str, config: &GenConfig) -> Result<Expansion> {
    let mut session = Session::new();
    session.add_source("<input>", src)?;
    // One source in, one expansion out.
    Ok(session.expand(config)?.remove(0))
}
