//! Capabilities the collector consumes from its host environment.
//!
//! The collector never parses or indexes code itself. Syntax scanning,
//! symbol resolution, inheritance search, decompilation and file access are
//! all supplied through these traits. The host is expected to present a
//! stable snapshot of the program structure for the duration of a single
//! `collect` call.

use super::types::{FileOutline, ReferenceNode, SearchScope, SourceFile, Symbol};
use crate::error::Result;

/// Syntax scanning and symbol resolution.
pub trait SymbolResolver {
    /// Host-specific syntax node carrying whatever context resolution needs.
    type Node;

    /// All reference and import nodes of `file`, in document order.
    fn reference_nodes(&self, file: &SourceFile) -> Result<Vec<ReferenceNode<Self::Node>>>;

    /// Resolve an in-body reference. `None` when unresolvable or unnameable.
    fn resolve(&self, node: &Self::Node) -> Option<Symbol>;

    /// Resolve an import statement to the type it imports.
    fn resolve_import(&self, node: &Self::Node) -> Option<Symbol>;

    /// Whether the symbol is a polymorphic (interface) type.
    fn is_interface_type(&self, symbol: &Symbol) -> bool;

    /// Declaration outline of `text`, the current content of `file`.
    /// `None` when the file's language has no outline support.
    fn outline(&self, file: &SourceFile, text: &str) -> Option<FileOutline>;
}

/// Inheritance search.
pub trait ImplementationFinder {
    /// Every type implementing or extending `symbol`, transitively.
    fn find_implementors(&self, symbol: &Symbol, scope: SearchScope) -> Vec<Symbol>;
}

/// Textual reconstruction of compiled files.
pub trait Decompiler {
    fn decompile(&self, file: &SourceFile) -> Result<String>;
}

/// Raw text access.
pub trait FileReader {
    fn read(&self, file: &SourceFile) -> Result<String>;
}

/// Resolve a reference node through the matching resolver method.
pub(crate) fn resolve_node<R: SymbolResolver>(
    resolver: &R,
    node: &ReferenceNode<R::Node>,
) -> Option<Symbol> {
    match node {
        ReferenceNode::Reference(n) => resolver.resolve(n),
        ReferenceNode::Import(n) => resolver.resolve_import(n),
    }
}

/// The set of capabilities handed to the collector.
pub struct Host<'h, R: SymbolResolver> {
    pub resolver: &'h R,
    pub implementations: &'h dyn ImplementationFinder,
    pub decompiler: &'h dyn Decompiler,
    pub reader: &'h dyn FileReader,
}

impl<R: SymbolResolver> Clone for Host<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: SymbolResolver> Copy for Host<'_, R> {}
