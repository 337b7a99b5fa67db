//! Java parser using tree-sitter
//!
//! Extracts the package, imports, declared types, and every type reference
//! inside a declared type from Java source code.

use super::{
    Import, ParseError, ParseOptions, RawReference, ReferenceKind, Scope, SourceUnit,
    TypeDeclaration,
};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Named type declarations; their bodies can hold member types
const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

/// Parse a Java file
pub fn parse(path: &Path, options: ParseOptions) -> Result<SourceUnit, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    // Legacy encodings are common in old Java trees; identifiers are ASCII in practice
    let source = String::from_utf8_lossy(&bytes);

    parse_source(&source, path, options)
}

/// Parse Java source code directly (useful for testing)
pub fn parse_source(
    source: &str,
    path: &Path,
    options: ParseOptions,
) -> Result<SourceUnit, ParseError> {
    let mut parser = Parser::new();
    let language = tree_sitter_java::LANGUAGE;
    parser.set_language(&language.into())?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::NoTree(path.to_path_buf()))?;

    let root = tree.root_node();
    let mut unit = SourceUnit::new(path);
    unit.has_errors = root.has_error();

    let mut extractor = Extractor {
        source: source.as_bytes(),
        options,
        unit,
    };
    extractor.extract_header(&root);
    extractor.visit(&root, Context::file());

    Ok(extractor.unit)
}

/// Where the walk currently is
#[derive(Debug, Clone, Copy)]
struct Context {
    /// Current scope in the unit's scope arena
    scope: usize,
    /// Declaration index that references count toward
    owner: Option<usize>,
    /// Innermost named (non-local) type, used to name member types
    enclosing: Option<usize>,
}

impl Context {
    fn file() -> Self {
        Self {
            scope: 0,
            owner: None,
            enclosing: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    TopLevel,
    Member(usize),
    Local,
}

struct Extractor<'a> {
    source: &'a [u8],
    options: ParseOptions,
    unit: SourceUnit,
}

impl Extractor<'_> {
    fn text(&self, node: &Node) -> Option<String> {
        node.utf8_text(self.source).ok().map(str::to_string)
    }

    /// Package declaration and non-static imports
    fn extract_header(&mut self, root: &Node) {
        for child in root.children(&mut root.walk()) {
            match child.kind() {
                "package_declaration" => {
                    self.unit.package = self.dotted_name_child(&child);
                }
                "import_declaration" => {
                    let mut is_static = false;
                    let mut on_demand = false;
                    for part in child.children(&mut child.walk()) {
                        match part.kind() {
                            "static" => is_static = true,
                            "asterisk" => on_demand = true,
                            _ => {}
                        }
                    }
                    if is_static {
                        continue;
                    }
                    if let Some(path) = self.dotted_name_child(&child) {
                        self.unit.imports.push(Import { path, on_demand });
                    }
                }
                _ => {}
            }
        }
    }

    /// First `identifier` or `scoped_identifier` child, as text
    fn dotted_name_child(&self, node: &Node) -> Option<String> {
        node.named_children(&mut node.walk())
            .find(|c| c.kind() == "scoped_identifier" || c.kind() == "identifier")
            .and_then(|c| self.text(&c))
    }

    fn visit(&mut self, node: &Node, ctx: Context) {
        match node.kind() {
            "package_declaration" | "import_declaration" | "module_declaration"
            | "line_comment" | "block_comment" => {}
            kind if TYPE_DECLARATION_KINDS.contains(&kind) => {
                self.visit_type_declaration(node, ctx)
            }
            "method_declaration" | "constructor_declaration" => {
                self.visit_generic_member(node, ctx)
            }
            "block" | "constructor_body" => {
                let scope = self.push_scope(ctx.scope, None, None, Vec::new());
                self.visit_children(node, Context { scope, ..ctx });
            }
            "type_parameter" => self.visit_type_parameter(node, ctx),
            "type_identifier" => {
                if let Some(name) = self.text(node) {
                    self.record(ctx, name, ReferenceKind::Type);
                }
            }
            "scoped_type_identifier" => {
                let name = self.scoped_type_name(node);
                self.record(ctx, name, ReferenceKind::Type);
                self.visit_scoped_type_extras(node, ctx);
            }
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
                if let Some(name) = self.text(node) {
                    self.record(ctx, name, ReferenceKind::Primitive);
                }
            }
            "marker_annotation" | "annotation" => self.visit_annotation(node, ctx),
            "method_invocation" | "field_access" => {
                if let Some(object) = node.child_by_field_name("object") {
                    self.record_static_receiver(&object, ctx);
                }
                self.visit_children(node, ctx);
            }
            "method_reference" => {
                if let Some(receiver) = node.named_child(0) {
                    self.record_static_receiver(&receiver, ctx);
                }
                self.visit_children(node, ctx);
            }
            _ => self.visit_children(node, ctx),
        }
    }

    fn visit_children(&mut self, node: &Node, ctx: Context) {
        for child in node.children(&mut node.walk()) {
            self.visit(&child, ctx);
        }
    }

    fn record(&mut self, ctx: Context, name: String, kind: ReferenceKind) {
        let Some(owner) = ctx.owner else {
            return;
        };
        self.unit.references.push(RawReference {
            owner,
            name,
            kind,
            scope: ctx.scope,
        });
    }

    /// `Foo.bar()`, `Foo.BAR`, `Foo::bar`: an uppercase bare identifier
    /// before the dot is most likely a type
    fn record_static_receiver(&mut self, node: &Node, ctx: Context) {
        if node.kind() != "identifier" {
            return;
        }
        if let Some(name) = self.text(node) {
            if name.starts_with(|c: char| c.is_ascii_uppercase()) {
                self.record(ctx, name, ReferenceKind::StaticReceiver);
            }
        }
    }

    fn visit_type_declaration(&mut self, node: &Node, ctx: Context) {
        let Some(simple_name) = node
            .child_by_field_name("name")
            .and_then(|n| self.text(&n))
        else {
            self.visit_children(node, ctx);
            return;
        };

        let placement = self.placement(node, ctx);
        let (binary_name, declared) = match placement {
            Placement::TopLevel => (self.unit.qualify(&simple_name), true),
            Placement::Member(outer) => (
                format!("{}${}", self.unit.declarations[outer].name, simple_name),
                self.options.nested_types,
            ),
            Placement::Local => (self.local_type_name(ctx.scope, &simple_name), false),
        };

        let declaration = match placement {
            Placement::Local => {
                // Visible to the rest of the enclosing block, shadowing outer names
                self.unit.scopes[ctx.scope]
                    .local_types
                    .push((simple_name.clone(), binary_name.clone()));
                None
            }
            _ => {
                self.unit.declarations.push(TypeDeclaration {
                    name: binary_name.clone(),
                    declared,
                    line: node.start_position().row as u32 + 1,
                });
                Some(self.unit.declarations.len() - 1)
            }
        };

        let type_params = node
            .child_by_field_name("type_parameters")
            .map(|tp| self.type_parameter_names(&tp))
            .unwrap_or_default();
        let scope = self.push_scope(ctx.scope, Some(binary_name), Some(simple_name), type_params);

        let inner = Context {
            scope,
            owner: if declared { declaration } else { ctx.owner },
            enclosing: declaration,
        };
        self.visit_children(node, inner);
    }

    /// `Outer$1Local`, after the nearest enclosing type
    fn local_type_name(&self, scope: usize, simple_name: &str) -> String {
        let mut current = Some(scope);
        while let Some(index) = current {
            let Some(scope) = self.unit.scopes.get(index) else {
                break;
            };
            if let Some(outer) = &scope.type_name {
                return format!("{}$1{}", outer, simple_name);
            }
            current = scope.parent;
        }
        self.unit.qualify(&format!("1{}", simple_name))
    }

    fn placement(&self, node: &Node, ctx: Context) -> Placement {
        let Some(parent) = node.parent() else {
            return Placement::TopLevel;
        };
        match parent.kind() {
            "program" => Placement::TopLevel,
            "class_body" | "interface_body" | "enum_body_declarations" | "annotation_type_body" => {
                match ctx.enclosing {
                    Some(outer) if is_type_body(&parent) => Placement::Member(outer),
                    _ => Placement::Local,
                }
            }
            _ => Placement::Local,
        }
    }

    /// Methods and constructors may introduce their own type parameters
    fn visit_generic_member(&mut self, node: &Node, ctx: Context) {
        let Some(type_params) = node.child_by_field_name("type_parameters") else {
            self.visit_children(node, ctx);
            return;
        };
        let names = self.type_parameter_names(&type_params);
        let scope = self.push_scope(ctx.scope, None, None, names);
        self.visit_children(node, Context { scope, ..ctx });
    }

    fn type_parameter_names(&self, type_params: &Node) -> Vec<String> {
        type_params
            .named_children(&mut type_params.walk())
            .filter(|c| c.kind() == "type_parameter")
            .filter_map(|c| type_parameter_name_node(&c).and_then(|n| self.text(&n)))
            .collect()
    }

    /// Skip the declared name; bounds and annotations are references
    fn visit_type_parameter(&mut self, node: &Node, ctx: Context) {
        let name_id = type_parameter_name_node(node).map(|n| n.id());
        for child in node.children(&mut node.walk()) {
            if Some(child.id()) != name_id {
                self.visit(&child, ctx);
            }
        }
    }

    fn push_scope(
        &mut self,
        parent: usize,
        type_name: Option<String>,
        simple_name: Option<String>,
        type_params: Vec<String>,
    ) -> usize {
        self.unit.scopes.push(Scope {
            parent: Some(parent),
            type_name,
            simple_name,
            type_params,
            local_types: Vec::new(),
        });
        self.unit.scopes.len() - 1
    }

    fn visit_annotation(&mut self, node: &Node, ctx: Context) {
        if let Some(name) = node
            .child_by_field_name("name")
            .and_then(|n| self.text(&n))
        {
            self.record(ctx, name, ReferenceKind::Annotation);
        }
        if let Some(arguments) = node.child_by_field_name("arguments") {
            self.visit(&arguments, ctx);
        }
    }

    /// Dotted name of a scoped type, ignoring annotations and type arguments
    fn scoped_type_name(&self, node: &Node) -> String {
        let mut parts = Vec::new();
        for child in node.named_children(&mut node.walk()) {
            match child.kind() {
                "type_identifier" => parts.extend(self.text(&child)),
                "scoped_type_identifier" => parts.push(self.scoped_type_name(&child)),
                "generic_type" => {
                    if let Some(base) = child.named_child(0) {
                        match base.kind() {
                            "scoped_type_identifier" => parts.push(self.scoped_type_name(&base)),
                            _ => parts.extend(self.text(&base)),
                        }
                    }
                }
                _ => {}
            }
        }
        parts.join(".")
    }

    /// Annotations and type arguments embedded in a scoped type still count
    fn visit_scoped_type_extras(&mut self, node: &Node, ctx: Context) {
        for child in node.named_children(&mut node.walk()) {
            match child.kind() {
                "type_identifier" => {}
                "scoped_type_identifier" => self.visit_scoped_type_extras(&child, ctx),
                "generic_type" => {
                    for part in child.named_children(&mut child.walk()) {
                        match part.kind() {
                            "type_identifier" => {}
                            "scoped_type_identifier" => self.visit_scoped_type_extras(&part, ctx),
                            _ => self.visit(&part, ctx),
                        }
                    }
                }
                _ => self.visit(&child, ctx),
            }
        }
    }
}

/// Whether a body node belongs to a named type declaration (not an
/// anonymous class or an enum constant body)
fn is_type_body(body: &Node) -> bool {
    let mut owner = body.parent();
    if let Some(node) = owner {
        if node.kind() == "enum_body" {
            owner = node.parent();
        }
    }
    owner.is_some_and(|node| TYPE_DECLARATION_KINDS.contains(&node.kind()))
}

/// The identifier a type parameter declares
fn type_parameter_name_node<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    node.named_children(&mut node.walk())
        .find(|c| c.kind() == "type_identifier" || c.kind() == "identifier")
}
