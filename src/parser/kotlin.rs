//! Kotlin syntax extraction.
//!
//! Kotlin sources are indexed next to Java ones so that Java code can reach
//! the classes, interfaces and objects they declare. Names are qualified the
//! same way (`package.Outer.Inner`) and resolved under the same import rules.

use tree_sitter::Node;

use super::java::{doc_comment, starts_uppercase, strip_type_arguments, text};
use crate::graph::types::{
    ExtractedImport, ExtractedReference, ExtractedType, FileExtractions, NodeKind,
};
use crate::related::{Declaration, FileOutline, Span};

/// Top-level declarations kept by the outline.
const DECLARATIONS: &[&str] = &[
    "class_declaration",
    "object_declaration",
    "function_declaration",
    "property_declaration",
    "type_alias",
];

/// Fill `out` from the `source_file` node of a parsed Kotlin file.
pub fn extract(root: &Node, source: &[u8], out: &mut FileExtractions) {
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_header" => out.package = identifier(&child, source),
            "import_list" => {
                let mut inner = child.walk();
                for header in child.named_children(&mut inner) {
                    if let Some(import) = extract_import(&header, source) {
                        out.imports.push(import);
                    }
                }
            }
            "import_header" => {
                if let Some(import) = extract_import(&child, source) {
                    out.imports.push(import);
                }
            }
            _ => {
                let prefix = out.package.clone();
                extract_types(&child, source, prefix.as_deref(), None, &mut out.types);
            }
        }
    }

    extract_references(root, source, &mut out.references);
}

/// Top-level outline of a parsed Kotlin file.
pub fn outline(root: &Node, source: &[u8]) -> FileOutline {
    let mut outline = FileOutline::default();

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_header" => outline.package = Some(trimmed_span(&child, source)),
            "import_list" => outline.imports = Some(trimmed_span(&child, source)),
            kind if DECLARATIONS.contains(&kind) => {
                outline.declarations.push(Declaration {
                    doc: doc_comment(&child, source),
                    span: trimmed_span(&child, source),
                });
            }
            _ => {}
        }
    }
    outline
}

/// Dotted name held by the node's `identifier` child.
fn identifier(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let id = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "identifier")?;
    text(&id, source).map(strip_type_arguments)
}

fn extract_import(node: &Node, source: &[u8]) -> Option<ExtractedImport> {
    if node.kind() != "import_header" {
        return None;
    }
    let mut cursor = node.walk();
    let is_wildcard = node
        .named_children(&mut cursor)
        .any(|c| c.kind() == "wildcard_import");

    Some(ExtractedImport {
        path: identifier(node, source)?,
        is_static: false,
        is_wildcard,
        line: node.start_position().row + 1,
    })
}

fn extract_types(
    node: &Node,
    source: &[u8],
    prefix: Option<&str>,
    parent: Option<&str>,
    types: &mut Vec<ExtractedType>,
) {
    let kind = match node.kind() {
        "class_declaration" => class_kind(node, source),
        "object_declaration" => NodeKind::Class,
        _ => return,
    };
    let mut cursor = node.walk();
    let Some(name) = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "type_identifier")
        .and_then(|n| text(&n, source))
    else {
        return;
    };
    let qualified_name = match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_string(),
    };

    // `: Base(), Listener` - a constructor call names the superclass.
    let mut superclass = None;
    let mut interfaces = Vec::new();
    let mut bodies = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "delegation_specifier" => {
                let Some(inner) = child.named_child(0) else {
                    continue;
                };
                match inner.kind() {
                    "constructor_invocation" => superclass = user_type(&inner, source),
                    "user_type" => interfaces.extend(user_type_name(&inner, source)),
                    _ => interfaces.extend(user_type(&inner, source)),
                }
            }
            "class_body" | "enum_class_body" => bodies.push(child),
            _ => {}
        }
    }

    types.push(ExtractedType {
        name: name.to_string(),
        qualified_name: qualified_name.clone(),
        kind,
        parent: parent.map(str::to_string),
        superclass,
        interfaces,
        line_start: node.start_position().row + 1,
    });

    let outer = Some(qualified_name.as_str());
    for body in bodies {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            extract_types(&member, source, outer, outer, types);
        }
    }
}

fn class_kind(node: &Node, source: &[u8]) -> NodeKind {
    let mut modifiers = Vec::new();
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else {
            continue;
        };
        match child.kind() {
            "interface" => return NodeKind::Interface,
            "enum_class_body" => return NodeKind::Enum,
            "modifiers" => modifiers.extend(text(&child, source)),
            _ => {}
        }
    }
    let words = || modifiers.iter().flat_map(|m| m.split_whitespace());
    if words().any(|w| w == "annotation") {
        NodeKind::Annotation
    } else if words().any(|w| w == "enum") {
        NodeKind::Enum
    } else {
        NodeKind::Class
    }
}

/// Name of the first `user_type` child of `node`.
fn user_type(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let ty = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "user_type")?;
    user_type_name(&ty, source)
}

fn user_type_name(node: &Node, source: &[u8]) -> Option<String> {
    text(node, source).map(strip_type_arguments)
}

/// Recursively collect user types and capitalised call targets (`Foo()`,
/// `Util.format(..)`) outside the package header and imports.
fn extract_references(node: &Node, source: &[u8], refs: &mut Vec<ExtractedReference>) {
    let line = node.start_position().row + 1;
    match node.kind() {
        "package_header" | "import_list" | "import_header" => return,
        "user_type" => {
            if let Some(name) = user_type_name(node, source) {
                refs.push(ExtractedReference { name, line });
            }
        }
        "call_expression" | "navigation_expression" => {
            if let Some(target) = node.named_child(0) {
                if target.kind() == "simple_identifier" {
                    if let Some(name) = text(&target, source).filter(|n| starts_uppercase(n)) {
                        refs.push(ExtractedReference {
                            name: name.to_string(),
                            line,
                        });
                    }
                }
            }
        }
        _ => {}
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            extract_references(&child, source, refs);
        }
    }
}

/// Span of `node` without trailing whitespace; Kotlin statements absorb the
/// newline that terminates them.
fn trimmed_span(node: &Node, source: &[u8]) -> Span {
    let start = node.start_byte();
    let mut end = node.end_byte().min(source.len());
    while end > start && source[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    Span::new(start, end)
}
