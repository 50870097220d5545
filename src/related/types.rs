//! Value types shared by the related-file collector and its host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a file's content comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOrigin {
    /// Source inside the project's content roots.
    Project,
    /// Readable source belonging to a dependency.
    Library,
    /// Compiled class file; content must be decompiled.
    Binary,
}

impl fmt::Display for FileOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOrigin::Project => write!(f, "project"),
            FileOrigin::Library => write!(f, "library"),
            FileOrigin::Binary => write!(f, "binary"),
        }
    }
}

/// A file known to the host, identified by its canonical path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub origin: FileOrigin,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, origin: FileOrigin) -> Self {
        Self {
            path: path.into(),
            origin,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.origin == FileOrigin::Binary
    }

    pub fn is_in_project(&self) -> bool {
        self.origin == FileOrigin::Project
    }
}

/// A syntactic reference found while scanning a file.
///
/// `N` is the host's own node type; the collector never looks inside it and
/// only dispatches it back to the matching resolver method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceNode<N> {
    /// An in-body reference to a type.
    Reference(N),
    /// An import statement.
    Import(N),
}

/// A resolved, nameable symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// Fully-qualified name, e.g. `com.acme.billing.Invoice`.
    pub qualified_name: String,
    /// The file declaring the symbol, when it has one.
    pub file: Option<SourceFile>,
}

impl Symbol {
    pub fn new(qualified_name: impl Into<String>, file: Option<SourceFile>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            file,
        }
    }
}

/// Scope of an implementation search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Project files only.
    Project,
    /// Project files plus dependencies.
    ProjectAndDependencies,
}

/// Half-open byte range into a file's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Slice `text` by this span. Returns `None` when the span does not fall
    /// on valid boundaries of `text`.
    pub fn slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        if self.start > self.end {
            return None;
        }
        text.get(self.start..self.end)
    }
}

/// A top-level declaration of a file, with its attached documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub doc: Option<Span>,
    pub span: Span,
}

/// Structural outline of a source file used for smart pruning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutline {
    /// The package/namespace statement.
    pub package: Option<Span>,
    /// The whole import section, first import through last.
    pub imports: Option<Span>,
    pub declarations: Vec<Declaration>,
}

/// One entry of the collector's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedFile {
    pub path: String,
    pub content: String,
    pub is_decompiled: bool,
    pub is_implementation: bool,
}
