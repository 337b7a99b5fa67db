//! Name resolution for raw type references
//!
//! Java resolves a simple type name through enclosing scopes first
//! (type parameters, local types, the enclosing types and their member
//! types), then single-type imports, then the current package, then
//! on-demand imports.
//! Anything still unresolved keeps the name as written.

use crate::models::ReferenceOccurrence;
use crate::parsers::{RawReference, ReferenceKind, SourceUnit};
use rustc_hash::{FxHashMap, FxHashSet};

/// Every type name declared anywhere in the project, top-level or nested.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// Canonical names (`pkg.Outer$Inner`)
    known: FxHashSet<String>,
    /// Source-form names (`pkg.Outer.Inner`) to canonical names
    by_dotted: FxHashMap<String, String>,
}

impl SymbolTable {
    pub fn from_units(units: &[SourceUnit]) -> Self {
        let mut table = Self::default();
        for declaration in units.iter().flat_map(|u| u.declarations.iter()) {
            table.insert(&declaration.name);
        }
        table
    }

    fn insert(&mut self, canonical: &str) {
        self.known.insert(canonical.to_string());
        self.by_dotted
            .insert(canonical.replace('$', "."), canonical.to_string());
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// Canonical form of a project type written in canonical or dotted form
    pub fn canonical(&self, name: &str) -> Option<&str> {
        if let Some(known) = self.known.get(name) {
            return Some(known.as_str());
        }
        self.by_dotted.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

/// Resolves references of one source unit against the project's symbols
pub struct Resolver<'a> {
    table: &'a SymbolTable,
    unit: &'a SourceUnit,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a SymbolTable, unit: &'a SourceUnit) -> Self {
        Self { table, unit }
    }

    /// Turn every raw reference of the unit into an occurrence.
    ///
    /// Static receivers that do not name a project type are dropped: they
    /// are most likely variables or fields.
    pub fn occurrences(&self) -> Vec<ReferenceOccurrence> {
        self.unit
            .references
            .iter()
            .filter_map(|reference| {
                let target = self.resolve_reference(reference)?;
                let source = &self.unit.declarations[reference.owner].name;
                Some(ReferenceOccurrence::new(source.as_str(), target))
            })
            .collect()
    }

    fn resolve_reference(&self, reference: &RawReference) -> Option<String> {
        match reference.kind {
            ReferenceKind::Primitive => Some(reference.name.clone()),
            ReferenceKind::Type | ReferenceKind::Annotation => {
                Some(self.resolve(&reference.name, reference.scope))
            }
            ReferenceKind::StaticReceiver => self
                .resolve_simple(&reference.name, reference.scope)
                .filter(|name| self.table.is_known(name)),
        }
    }

    /// Resolve a simple or dotted name as seen from `scope`
    pub fn resolve(&self, name: &str, scope: usize) -> String {
        let Some((head, rest)) = name.split_once('.') else {
            return self
                .resolve_simple(name, scope)
                .unwrap_or_else(|| name.to_string());
        };

        // `Outer.Inner` where `Outer` is a project type in scope
        if let Some(outer) = self.resolve_simple(head, scope) {
            if self.table.is_known(&outer) {
                return format!("{}${}", outer, rest.replace('.', "$"));
            }
        }

        // Fully qualified
        self.table
            .canonical(name)
            .map(str::to_string)
            .unwrap_or_else(|| name.to_string())
    }

    /// Resolve a simple name, or `None` when nothing in scope declares it
    pub fn resolve_simple(&self, name: &str, scope: usize) -> Option<String> {
        if let Some(found) = self.resolve_in_scopes(name, scope) {
            return Some(found);
        }

        for import in self.unit.imports.iter().filter(|i| !i.on_demand) {
            let imported = import.path.rsplit('.').next().unwrap_or(&import.path);
            if imported == name {
                let resolved = self
                    .table
                    .canonical(&import.path)
                    .unwrap_or(&import.path);
                return Some(resolved.to_string());
            }
        }

        let same_package = self.unit.qualify(name);
        if self.table.is_known(&same_package) {
            return Some(same_package);
        }

        for import in self.unit.imports.iter().filter(|i| i.on_demand) {
            let candidate = format!("{}.{}", import.path, name);
            if let Some(resolved) = self.table.canonical(&candidate) {
                return Some(resolved.to_string());
            }
        }

        None
    }

    /// Type parameters, local types, enclosing types, and their member types
    fn resolve_in_scopes(&self, name: &str, scope: usize) -> Option<String> {
        let mut current = Some(scope);
        while let Some(index) = current {
            let scope = self.unit.scopes.get(index)?;

            if scope.type_params.iter().any(|p| p == name) {
                return Some(name.to_string());
            }

            let local = scope.local_types.iter().find(|(simple, _)| simple == name);
            if let Some((_, binary_name)) = local {
                return Some(binary_name.clone());
            }

            if let Some(type_name) = &scope.type_name {
                if scope.simple_name.as_deref() == Some(name) {
                    return Some(type_name.clone());
                }
                let member = format!("{}${}", type_name, name);
                if self.table.is_known(&member) {
                    return Some(member);
                }
            }

            current = scope.parent;
        }
        None
    }
}
