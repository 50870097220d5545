//! Java syntax extraction via AST traversal.
//!
//! Pulls out the package, imports, declared types (with their supertypes),
//! the type names used in bodies, and the top-level outline used for pruning.

use tree_sitter::Node;

use crate::graph::types::{
    ExtractedImport, ExtractedReference, ExtractedType, FileExtractions, NodeKind,
};
use crate::related::{Declaration, FileOutline, Span};

/// Fill `out` from the `program` node of a parsed Java file.
pub fn extract(root: &Node, source: &[u8], out: &mut FileExtractions) {
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_declaration" => out.package = package_name(&child, source),
            "import_declaration" => {
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

/// Top-level outline of a parsed Java file.
pub fn outline(root: &Node, source: &[u8]) -> FileOutline {
    let mut outline = FileOutline::default();
    let mut first_import: Option<usize> = None;
    let mut last_import: Option<usize> = None;

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_declaration" => {
                outline.package = Some(Span::new(child.start_byte(), child.end_byte()));
            }
            "import_declaration" => {
                first_import.get_or_insert(child.start_byte());
                last_import = Some(child.end_byte());
            }
            kind if NodeKind::from_declaration(kind).is_some() => {
                outline.declarations.push(Declaration {
                    doc: doc_comment(&child, source),
                    span: Span::new(child.start_byte(), child.end_byte()),
                });
            }
            _ => {}
        }
    }

    if let (Some(start), Some(end)) = (first_import, last_import) {
        outline.imports = Some(Span::new(start, end));
    }
    outline
}

fn package_name(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let name = node
        .named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))?;
    text(&name, source).map(str::to_string)
}

fn extract_import(node: &Node, source: &[u8]) -> Option<ExtractedImport> {
    let mut path = None;
    let mut is_static = false;
    let mut is_wildcard = false;

    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else {
            continue;
        };
        match child.kind() {
            "static" => is_static = true,
            "asterisk" => is_wildcard = true,
            "scoped_identifier" | "identifier" => path = text(&child, source),
            _ => {}
        }
    }

    Some(ExtractedImport {
        path: path?.to_string(),
        is_static,
        is_wildcard,
        line: node.start_position().row + 1,
    })
}

/// Record the type declared by `node` and, recursively, its nested types.
fn extract_types(
    node: &Node,
    source: &[u8],
    prefix: Option<&str>,
    parent: Option<&str>,
    types: &mut Vec<ExtractedType>,
) {
    let Some(kind) = NodeKind::from_declaration(node.kind()) else {
        return;
    };
    let Some(name) = field_text(node, "name", source) else {
        return;
    };
    let qualified_name = match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_string(),
    };

    let mut superclass = None;
    let mut interfaces = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "superclass" => {
                superclass = child.named_child(0).and_then(|t| type_name(&t, source));
            }
            "super_interfaces" | "extends_interfaces" => {
                interfaces.extend(type_list(&child, source));
            }
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

    let Some(body) = node.child_by_field_name("body") else {
        return;
    };
    let outer = Some(qualified_name.as_str());
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        if member.kind() == "enum_body_declarations" {
            let mut inner = member.walk();
            for nested in member.named_children(&mut inner) {
                extract_types(&nested, source, outer, outer, types);
            }
        } else {
            extract_types(&member, source, outer, outer, types);
        }
    }
}

fn type_list(clause: &Node, source: &[u8]) -> Vec<String> {
    let mut cursor = clause.walk();
    let Some(list) = clause
        .named_children(&mut cursor)
        .find(|c| c.kind() == "type_list")
    else {
        return Vec::new();
    };
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter_map(|t| type_name(&t, source))
        .collect()
}

/// Recursively walk the AST and collect type names used outside imports.
fn extract_references(node: &Node, source: &[u8], refs: &mut Vec<ExtractedReference>) {
    let line = node.start_position().row + 1;
    match node.kind() {
        "package_declaration" | "import_declaration" => return,
        "type_identifier" | "scoped_type_identifier" => {
            if let Some(name) = type_name(node, source) {
                refs.push(ExtractedReference { name, line });
            }
            return;
        }
        "marker_annotation" | "annotation" => {
            if let Some(name) = field_text(node, "name", source) {
                refs.push(ExtractedReference {
                    name: name.to_string(),
                    line,
                });
            }
        }
        // `Util.format(..)`, `Color.RED`: a capitalised receiver names a type.
        "method_invocation" | "field_access" => {
            if let Some(object) = node.child_by_field_name("object") {
                if object.kind() == "identifier" {
                    if let Some(name) = text(&object, source).filter(|n| starts_uppercase(n)) {
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

/// Name of a type node with type arguments and whitespace removed.
fn type_name(node: &Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "type_identifier" => text(node, source).map(str::to_string),
        "scoped_type_identifier" => text(node, source).map(strip_type_arguments),
        "generic_type" => node.named_child(0).and_then(|t| type_name(&t, source)),
        _ => None,
    }
}

pub(super) fn strip_type_arguments(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if depth == 0 && !c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    out
}

/// The `/** ... */` comment preceding a declaration. Line comments between
/// the two are skipped; any other node detaches the doc.
pub(super) fn doc_comment(node: &Node, source: &[u8]) -> Option<Span> {
    let mut prev = node.prev_named_sibling();
    while let Some(sibling) = prev {
        if !sibling.kind().ends_with("comment") {
            return None;
        }
        let comment = text(&sibling, source)?;
        if comment.starts_with("/**") {
            return Some(Span::new(sibling.start_byte(), sibling.end_byte()));
        }
        if !comment.starts_with("//") {
            return None;
        }
        prev = sibling.prev_named_sibling();
    }
    None
}

fn field_text<'s>(node: &Node, field: &str, source: &'s [u8]) -> Option<&'s str> {
    node.child_by_field_name(field)
        .and_then(|n| n.utf8_text(source).ok())
}

pub(super) fn text<'s>(node: &Node, source: &'s [u8]) -> Option<&'s str> {
    node.utf8_text(source).ok()
}

pub(super) fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
