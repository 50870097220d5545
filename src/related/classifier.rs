//! Reference extraction for a single file.

use std::collections::HashSet;

use super::filter::should_skip;
use super::host::{resolve_node, SymbolResolver};
use super::types::{ReferenceNode, SourceFile, Symbol};
use crate::config::CollectorConfig;
use crate::error::Result;

/// The symbols referenced by `nodes`, in encounter order.
///
/// Unresolvable nodes are dropped, as are names rejected by the package
/// filter. Each qualified name appears once.
pub fn local_references<R: SymbolResolver>(
    resolver: &R,
    nodes: &[ReferenceNode<R::Node>],
    config: &CollectorConfig,
) -> Vec<Symbol> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut symbols = Vec::new();

    for node in nodes {
        let Some(symbol) = resolve_node(resolver, node) else {
            continue;
        };
        if should_skip(&symbol.qualified_name, config) {
            continue;
        }
        if seen.insert(symbol.qualified_name.clone()) {
            symbols.push(symbol);
        }
    }

    symbols
}

/// Qualified names the root file references directly.
pub fn collect_direct_references<R: SymbolResolver>(
    resolver: &R,
    root: &SourceFile,
    config: &CollectorConfig,
) -> Result<HashSet<String>> {
    let nodes = resolver.reference_nodes(root)?;
    Ok(local_references(resolver, &nodes, config)
        .into_iter()
        .map(|symbol| symbol.qualified_name)
        .collect())
}
