//! Core types for the type index.
//!
//! Defines node kinds, edge kinds, the per-file extraction records produced
//! by the parser, and the import scope used to resolve names inside a file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::related::FileOrigin;

/// The kind of a node in the type graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A source or class file.
    File,
    Class,
    Interface,
    Enum,
    Record,
    /// An `@interface` annotation type.
    Annotation,
}

impl NodeKind {
    /// Java declaration node kinds mapped to type kinds.
    pub fn from_declaration(kind: &str) -> Option<Self> {
        match kind {
            "class_declaration" => Some(NodeKind::Class),
            "interface_declaration" => Some(NodeKind::Interface),
            "enum_declaration" => Some(NodeKind::Enum),
            "record_declaration" => Some(NodeKind::Record),
            "annotation_type_declaration" => Some(NodeKind::Annotation),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Class => write!(f, "class"),
            NodeKind::Interface => write!(f, "interface"),
            NodeKind::Enum => write!(f, "enum"),
            NodeKind::Record => write!(f, "record"),
            NodeKind::Annotation => write!(f, "annotation"),
        }
    }
}

/// The kind of an edge (relationship) in the type graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// File declares a type (File -> Type).
    Defines,
    /// Outer type holds a nested type (Type -> Type).
    Contains,
    /// Class extends class, or interface extends interface (Sub -> Super).
    Extends,
    /// Type implements interface (Impl -> Interface).
    Implements,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Defines => write!(f, "defines"),
            EdgeKind::Contains => write!(f, "contains"),
            EdgeKind::Extends => write!(f, "extends"),
            EdgeKind::Implements => write!(f, "implements"),
        }
    }
}

/// Data stored in a graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    /// Simple name (e.g. "Invoice", "Invoice.java").
    pub name: String,
    /// Fully-qualified name for types; the path for files.
    pub qualified_name: String,
    pub kind: NodeKind,
    /// The file this node is or belongs to.
    pub file_path: PathBuf,
    pub origin: FileOrigin,
    /// Starting line number (1-indexed, 0 for files and binaries).
    pub line_start: usize,
}

impl NodeData {
    pub fn new_file(path: PathBuf, origin: FileOrigin) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            name,
            qualified_name: path.to_string_lossy().to_string(),
            kind: NodeKind::File,
            file_path: path,
            origin,
            line_start: 0,
        }
    }

    pub fn new_type(ty: &ExtractedType, file_path: PathBuf, origin: FileOrigin) -> Self {
        Self {
            name: ty.name.clone(),
            qualified_name: ty.qualified_name.clone(),
            kind: ty.kind,
            file_path,
            origin,
            line_start: ty.line_start,
        }
    }
}

/// Data stored on a graph edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeData {
    pub kind: EdgeKind,
}

impl EdgeData {
    pub fn new(kind: EdgeKind) -> Self {
        Self { kind }
    }
}

/// A type declared in a file. Intermediate form before entering the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedType {
    /// Simple name.
    pub name: String,
    /// `package.Outer.Inner`.
    pub qualified_name: String,
    pub kind: NodeKind,
    /// Qualified name of the enclosing type, for nested types.
    pub parent: Option<String>,
    /// `extends` clause of a class, as written.
    pub superclass: Option<String>,
    /// `implements` clause, or `extends` clause of an interface, as written.
    pub interfaces: Vec<String>,
    pub line_start: usize,
}

/// An import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImport {
    /// Imported name without the trailing `.*`.
    pub path: String,
    pub is_static: bool,
    /// `import a.b.*;`
    pub is_wildcard: bool,
    pub line: usize,
}

impl ExtractedImport {
    /// Last segment of the imported path.
    pub fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }
}

/// A type name used in a file body, as written (`Foo`, `Outer.Inner`,
/// `com.acme.Foo`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReference {
    pub name: String,
    pub line: usize,
}

/// All extracted information from a single file.
#[derive(Debug, Clone)]
pub struct FileExtractions {
    pub file_path: PathBuf,
    pub origin: FileOrigin,
    pub package: Option<String>,
    pub imports: Vec<ExtractedImport>,
    /// Declared types, outer types before their nested types.
    pub types: Vec<ExtractedType>,
    /// Type references in document order.
    pub references: Vec<ExtractedReference>,
}

impl FileExtractions {
    pub fn new(file_path: PathBuf, origin: FileOrigin) -> Self {
        Self {
            file_path,
            origin,
            package: None,
            imports: Vec::new(),
            types: Vec::new(),
            references: Vec::new(),
        }
    }
}

/// Names visible inside one file, used to resolve simple and partially
/// qualified type names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportScope {
    pub package: Option<String>,
    /// Simple name -> qualified name, from single-type imports.
    pub single: HashMap<String, String>,
    /// Simple name -> qualified name, for every type declared in the file.
    pub declared: HashMap<String, String>,
    /// Packages (or types) imported on demand.
    pub on_demand: Vec<String>,
}

impl ImportScope {
    pub fn from_extractions(extractions: &FileExtractions) -> Self {
        let mut scope = ImportScope {
            package: extractions.package.clone(),
            ..Self::default()
        };

        for import in &extractions.imports {
            if import.is_static {
                continue;
            }
            if import.is_wildcard {
                scope.on_demand.push(import.path.clone());
            } else {
                scope
                    .single
                    .insert(import.simple_name().to_string(), import.path.clone());
            }
        }

        for ty in &extractions.types {
            scope
                .declared
                .entry(ty.name.clone())
                .or_insert_with(|| ty.qualified_name.clone());
        }

        scope
    }

    /// Qualify `name` with this file's package.
    pub fn in_package(&self, name: &str) -> String {
        match &self.package {
            Some(package) => format!("{package}.{name}"),
            None => name.to_string(),
        }
    }
}
