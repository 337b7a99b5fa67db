//! Source code parsers using tree-sitter
//!
//! A parser turns one source file into a [`SourceUnit`]: the types it
//! declares, the imports in effect, and every raw type reference found
//! inside a declared type. Names are resolved later, once every file of
//! the project has been parsed.

mod java;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use java::parse_source as parse_java_source;

/// Errors raised while parsing a single source file
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to load the Java grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("tree-sitter produced no syntax tree for {}", .0.display())]
    NoTree(PathBuf),
}

/// Parser settings that change how declarations are attributed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Member types are declared types of their own
    pub nested_types: bool,
}

/// Parse a file and extract its declarations and raw references
pub fn parse_file(path: &Path, options: ParseOptions) -> Result<SourceUnit, ParseError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "java" => java::parse(path, options),
        _ => Ok(SourceUnit::new(path)),
    }
}

/// Get all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["java"]
}

/// A named type declared in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    /// Qualified name; member types use `Outer$Inner`
    pub name: String,
    /// Part of the project universe (top-level, or a member type when
    /// nested types are enabled)
    pub declared: bool,
    pub line: u32,
}

/// An import statement (static imports are not recorded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Dotted path without the trailing `.*`
    pub path: String,
    /// `import pkg.*;`
    pub on_demand: bool,
}

/// A lexical scope that can introduce type names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub parent: Option<usize>,
    /// Binary name of the type this scope belongs to; local types use
    /// `Outer$1Local`, which never names a declared type
    pub type_name: Option<String>,
    /// Simple name of the type this scope belongs to
    pub simple_name: Option<String>,
    /// Type parameters introduced here
    pub type_params: Vec<String>,
    /// Local types declared directly in this scope, as (simple name, binary name)
    pub local_types: Vec<(String, String)>,
}

/// How a reference appeared in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A type in a type position (`Foo`, `a.b.Foo`, `Outer.Inner`)
    Type,
    /// A primitive type or `void`; never resolved
    Primitive,
    /// An annotation name
    Annotation,
    /// An identifier used as the receiver of a member access (`Foo.bar()`);
    /// only kept when it names a known project type
    StaticReceiver,
}

/// A type reference before name resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    /// Index into [`SourceUnit::declarations`] of the declared type it counts toward
    pub owner: usize,
    /// Name as written, dotted for qualified references
    pub name: String,
    pub kind: ReferenceKind,
    /// Index into [`SourceUnit::scopes`] where the reference appears
    pub scope: usize,
}

/// Everything the collector needs from one file
#[derive(Debug, Clone, Default)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub package: Option<String>,
    pub imports: Vec<Import>,
    pub declarations: Vec<TypeDeclaration>,
    /// Scope arena; index 0 is the file scope
    pub scopes: Vec<Scope>,
    pub references: Vec<RawReference>,
    /// tree-sitter had to recover from syntax errors
    pub has_errors: bool,
}

impl SourceUnit {
    /// Create an empty unit with only the file scope
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            scopes: vec![Scope::default()],
            ..Default::default()
        }
    }

    /// Qualify a top-level simple name with this unit's package
    pub fn qualify(&self, simple_name: &str) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, simple_name),
            None => simple_name.to_string(),
        }
    }

    /// Declarations that belong to the project universe
    pub fn declared_types(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.declarations.iter().filter(|d| d.declared)
    }

    /// Check if the unit has nothing in it
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.references.is_empty()
    }
}
