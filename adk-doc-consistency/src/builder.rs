//! Reference table builder for Rust source trees.
//!
//! Walks one or more source roots, parses every `.rs` file with `syn` and
//! records the facts documentation usually makes claims about: which public
//! fields a struct has and their types, public method signatures, field
//! defaults set in `impl Default`, and public constants.
//!
//! Subject paths are `Type.member` (or just `NAME` for constants) without the
//! module prefix, matching how guides refer to them.

use crate::error::{CheckError, Result};
use crate::model::{FactKind, SourceLocation, SymbolFact, canonical_code};
use crate::reference::ReferenceTable;
use quote::ToTokens;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use syn::spanned::Spanned;
use syn::{
    Expr, Fields, ImplItem, Item, ItemConst, ItemImpl, ItemStruct, Member, Stmt, Type, Visibility,
};
use tracing::{debug, info, instrument, warn};
use walkdir::{DirEntry, WalkDir};

/// Builds a [`ReferenceTable`] from Rust sources.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTableBuilder {
    roots: Vec<PathBuf>,
    skip_unparseable: bool,
}

impl ReferenceTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source root (a directory or a single `.rs` file).
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.roots.push(path.into());
        self
    }

    /// Log and skip files that fail to parse instead of failing the build.
    pub fn skip_unparseable(mut self, skip: bool) -> Self {
        self.skip_unparseable = skip;
        self
    }

    /// Scan all roots. Facts are sorted by subject path, then kind, and
    /// ambiguous keys are dropped (see [`resolve_collisions`]).
    #[instrument(skip(self), fields(roots = self.roots.len()))]
    pub fn build(&self) -> Result<ReferenceTable> {
        let mut facts = Vec::new();

        for root in &self.roots {
            let files = find_rust_files(root)?;
            info!("Found {} Rust files under {}", files.len(), root.display());

            for file in files {
                let source = std::fs::read_to_string(&file)?;
                match facts_from_source(&source, &file.display().to_string()) {
                    Ok(file_facts) => {
                        debug!("Extracted {} facts from {}", file_facts.len(), file.display());
                        facts.extend(file_facts);
                    }
                    Err(e) if self.skip_unparseable => {
                        warn!("Skipping {}: {}", file.display(), e);
                    }
                    Err(e) => {
                        return Err(CheckError::SourceParse { path: file, message: e.to_string() });
                    }
                }
            }
        }

        Ok(ReferenceTable::from_facts(resolve_collisions(facts)))
    }
}

/// Collapse facts that share a `(path, kind)` key and sort the result.
///
/// Paths carry no module prefix, so two same-named types in different
/// modules land on one key. When their values disagree the key is dropped
/// with a warning, and claims about it come out UNVERIFIABLE.
pub fn resolve_collisions(facts: Vec<SymbolFact>) -> Vec<SymbolFact> {
    let mut grouped: BTreeMap<(String, FactKind), Vec<SymbolFact>> = BTreeMap::new();
    for fact in facts {
        grouped.entry((fact.subject_path.clone(), fact.kind)).or_default().push(fact);
    }

    let mut resolved = Vec::with_capacity(grouped.len());
    for ((path, kind), mut group) in grouped {
        let first = group.remove(0);
        let conflicting: Vec<&SymbolFact> =
            group.iter().filter(|other| !first.value.matches(&other.value, kind)).collect();

        if conflicting.is_empty() {
            resolved.push(first);
        } else {
            let origins: Vec<String> = std::iter::once(&first)
                .chain(conflicting)
                .filter_map(|fact| fact.origin.as_ref().map(ToString::to_string))
                .collect();
            warn!(
                "Dropping ambiguous {} fact for '{}' (defined at {})",
                kind,
                path,
                origins.join(", ")
            );
        }
    }
    resolved
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| name == "target" || name.starts_with('.'))
}

fn find_rust_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root).sort_by_file_name().into_iter();
    for entry in walker.filter_entry(|e| !is_skipped_dir(e)) {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "rs") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Extract facts from one Rust source file. `label` becomes the document name
/// of each fact's origin.
pub fn facts_from_source(source: &str, label: &str) -> syn::Result<Vec<SymbolFact>> {
    let file = syn::parse_file(source)?;
    let mut facts = Vec::new();
    collect_items(&file.items, label, &mut facts);
    Ok(facts)
}

fn collect_items(items: &[Item], label: &str, facts: &mut Vec<SymbolFact>) {
    for item in items {
        match item {
            Item::Struct(item_struct) if is_public(&item_struct.vis) => {
                struct_facts(item_struct, label, facts);
            }
            Item::Impl(item_impl) => impl_facts(item_impl, label, facts),
            Item::Const(item_const) if is_public(&item_const.vis) => {
                const_fact(item_const, label, facts);
            }
            Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    collect_items(nested, label, facts);
                }
            }
            _ => {}
        }
    }
}

fn is_public(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

fn origin(label: &str, node: &impl Spanned) -> SourceLocation {
    let span = node.span();
    SourceLocation::new(label, span.start().line, span.end().line)
}

fn render(tokens: &impl ToTokens) -> String {
    canonical_code(&tokens.to_token_stream().to_string())
}

fn struct_facts(item_struct: &ItemStruct, label: &str, facts: &mut Vec<SymbolFact>) {
    let Fields::Named(named) = &item_struct.fields else {
        return;
    };
    let type_name = item_struct.ident.to_string();

    for field in &named.named {
        let Some(ident) = &field.ident else { continue };
        if !is_public(&field.vis) {
            continue;
        }
        let path = format!("{}.{}", type_name, ident);
        let location = origin(label, field);
        facts.push(
            SymbolFact::new(path.clone(), FactKind::FieldExists, true)
                .with_origin(location.clone()),
        );
        facts.push(
            SymbolFact::new(path, FactKind::FieldType, render(&field.ty)).with_origin(location),
        );
    }
}

fn self_type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(type_path) => type_path.path.segments.last().map(|seg| seg.ident.to_string()),
        _ => None,
    }
}

fn impl_facts(item_impl: &ItemImpl, label: &str, facts: &mut Vec<SymbolFact>) {
    let Some(type_name) = self_type_name(&item_impl.self_ty) else {
        return;
    };
    let trait_name = item_impl
        .trait_
        .as_ref()
        .and_then(|(_, path, _)| path.segments.last())
        .map(|seg| seg.ident.to_string());

    for item in &item_impl.items {
        let ImplItem::Fn(method) = item else { continue };

        // Trait impls may repeat per type (`From<A>`, `From<B>`), so only
        // inherent `pub` methods have a unique `Type.method` path.
        if trait_name.is_none() && is_public(&method.vis) {
            let sig = &method.sig;
            facts.push(
                SymbolFact::new(
                    format!("{}.{}", type_name, sig.ident),
                    FactKind::MethodSignature,
                    render(sig),
                )
                .with_origin(origin(label, method)),
            );
        }

        if trait_name.as_deref() == Some("Default") && method.sig.ident == "default" {
            if let Some(Stmt::Expr(Expr::Struct(init), None)) = method.block.stmts.last() {
                for field in &init.fields {
                    if let Member::Named(ident) = &field.member {
                        facts.push(
                            SymbolFact::new(
                                format!("{}.{}", type_name, ident),
                                FactKind::DefaultValue,
                                render(&field.expr),
                            )
                            .with_origin(origin(label, field)),
                        );
                    }
                }
            }
        }
    }
}

fn const_fact(item_const: &ItemConst, label: &str, facts: &mut Vec<SymbolFact>) {
    let value = render(&item_const.expr);
    facts.push(
        SymbolFact::new(item_const.ident.to_string(), FactKind::DefaultValue, value)
            .with_origin(origin(label, item_const)),
    );
}
