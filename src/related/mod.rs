//! Related-file collection.
//!
//! Given a root source file, walks the references it makes (and, within
//! bounds, the references those files make) and returns the text of the
//! files that declare the referenced types. The result is meant to be pasted
//! next to the root file as context for a code assistant.
//!
//! The collector is host-agnostic: everything it needs to know about code is
//! obtained through the traits in [`host`].

pub mod classifier;
pub mod collector;
pub mod extract;
pub mod filter;
pub mod host;
pub mod traversal;
pub mod types;

#[cfg(test)]
mod testing;

pub use collector::RelatedFilesCollector;
pub use extract::{normalize_whitespace, prune, ContentExtractor, DECOMPILE_ERROR_PREFIX};
pub use filter::should_skip;
pub use host::{Decompiler, FileReader, Host, ImplementationFinder, SymbolResolver};
pub use traversal::TraversalState;
pub use types::{
    Declaration, FileOrigin, FileOutline, ReferenceNode, RelatedFile, SearchScope, SourceFile,
    Span, Symbol,
};
