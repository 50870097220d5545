//! The type index engine.
//!
//! Uses petgraph to store files, declared types and their inheritance
//! relationships, and answers the two questions the collector asks of a
//! code model: "which type does this name denote here?" and "who implements
//! this type?".

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::*;
use crate::related::FileOrigin;

/// The type graph: file nodes, type nodes and the indexes over them.
pub struct CodeGraph {
    graph: DiGraph<NodeData, EdgeData>,
    /// Index: file path -> File node.
    file_index: HashMap<PathBuf, NodeIndex>,
    /// Index: qualified name -> type node. First declaration wins.
    type_index: HashMap<String, NodeIndex>,
}

impl CodeGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            file_index: HashMap::new(),
            type_index: HashMap::new(),
        }
    }

    // ─── Node Operations ────────────────────────────────────────

    /// Add a file node. Adding a known path returns the existing node.
    pub fn add_file(&mut self, path: PathBuf, origin: FileOrigin) -> NodeIndex {
        if let Some(&idx) = self.file_index.get(&path) {
            return idx;
        }
        let idx = self.graph.add_node(NodeData::new_file(path.clone(), origin));
        self.file_index.insert(path, idx);
        idx
    }

    /// Add a type node declared in `file_path`. When the qualified name is
    /// already taken the existing node is returned and nothing is added.
    pub fn add_type(
        &mut self,
        ty: &ExtractedType,
        file_path: PathBuf,
        origin: FileOrigin,
    ) -> (NodeIndex, bool) {
        if let Some(&idx) = self.type_index.get(&ty.qualified_name) {
            debug!(
                name = %ty.qualified_name,
                file = %file_path.display(),
                "duplicate type declaration ignored"
            );
            return (idx, false);
        }
        let idx = self.graph.add_node(NodeData::new_type(ty, file_path, origin));
        self.type_index.insert(ty.qualified_name.clone(), idx);
        (idx, true)
    }

    // ─── Edge Operations ────────────────────────────────────────

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: EdgeKind) {
        self.graph.add_edge(from, to, EdgeData::new(kind));
    }

    // ─── Query Operations ───────────────────────────────────────

    /// The type with exactly this qualified name.
    pub fn lookup(&self, qualified_name: &str) -> Option<&NodeData> {
        self.type_index
            .get(qualified_name)
            .map(|&idx| &self.graph[idx])
    }

    /// The file node for `path`.
    pub fn file(&self, path: &Path) -> Option<&NodeData> {
        self.file_index.get(path).map(|&idx| &self.graph[idx])
    }

    /// Types declared in `path`, outer types first.
    pub fn types_in_file(&self, path: &Path) -> Vec<&NodeData> {
        let Some(&file_idx) = self.file_index.get(path) else {
            return Vec::new();
        };
        let mut types: Vec<&NodeData> = self
            .graph
            .edges_directed(file_idx, Direction::Outgoing)
            .filter(|e| e.weight().kind == EdgeKind::Defines)
            .map(|e| &self.graph[e.target()])
            .collect();
        types.sort_by_key(|t| (t.line_start, t.qualified_name.len()));
        types
    }

    /// Resolve a type name as written inside a file with the given scope.
    ///
    /// Simple names are looked up through single-type imports, types
    /// declared in the same file, the file's package, on-demand imports and
    /// finally `java.lang`. Dotted names are tried as `Visible.Nested` first
    /// and as fully qualified names second.
    pub fn resolve_name(&self, name: &str, scope: &ImportScope) -> Option<&NodeData> {
        self.resolve_index(name, scope).map(|idx| &self.graph[idx])
    }

    fn resolve_index(&self, name: &str, scope: &ImportScope) -> Option<NodeIndex> {
        match name.split_once('.') {
            None => self.resolve_simple(name, scope),
            Some((head, rest)) => self
                .resolve_simple(head, scope)
                .and_then(|outer| {
                    let nested = format!("{}.{rest}", self.graph[outer].qualified_name);
                    self.type_index.get(&nested).copied()
                })
                .or_else(|| self.type_index.get(name).copied()),
        }
    }

    fn resolve_simple(&self, name: &str, scope: &ImportScope) -> Option<NodeIndex> {
        if let Some(qualified) = scope.single.get(name) {
            return self.type_index.get(qualified).copied();
        }
        if let Some(qualified) = scope.declared.get(name) {
            return self.type_index.get(qualified).copied();
        }
        if let Some(&idx) = self.type_index.get(&scope.in_package(name)) {
            return Some(idx);
        }
        for package in &scope.on_demand {
            if let Some(&idx) = self.type_index.get(&format!("{package}.{name}")) {
                return Some(idx);
            }
        }
        self.type_index.get(&format!("java.lang.{name}")).copied()
    }

    /// Every type that extends or implements `qualified_name`, directly or
    /// through other subtypes, in breadth-first order.
    pub fn implementors(&self, qualified_name: &str) -> Vec<&NodeData> {
        let Some(&start) = self.type_index.get(qualified_name) else {
            return Vec::new();
        };

        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut queue: VecDeque<NodeIndex> = VecDeque::from([start]);
        let mut found = Vec::new();

        while let Some(idx) = queue.pop_front() {
            let mut subtypes: Vec<NodeIndex> = self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .filter(|e| matches!(e.weight().kind, EdgeKind::Extends | EdgeKind::Implements))
                .map(|e| e.source())
                .collect();
            // petgraph yields newest edges first; order by name instead.
            subtypes.sort_by(|a, b| {
                self.graph[*a]
                    .qualified_name
                    .cmp(&self.graph[*b].qualified_name)
            });
            subtypes.dedup();

            for sub in subtypes {
                if visited.insert(sub) {
                    found.push(&self.graph[sub]);
                    queue.push_back(sub);
                }
            }
        }

        found
    }

    // ─── Stats ──────────────────────────────────────────────────

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            total_edges: self.graph.edge_count(),
            ..GraphStats::default()
        };

        for node in self.graph.node_weights() {
            match node.kind {
                NodeKind::File => {
                    stats.file_count += 1;
                    match node.origin {
                        FileOrigin::Project => stats.project_files += 1,
                        FileOrigin::Library => stats.library_files += 1,
                        FileOrigin::Binary => stats.binary_files += 1,
                    }
                }
                NodeKind::Interface => {
                    stats.type_count += 1;
                    stats.interface_count += 1;
                }
                _ => stats.type_count += 1,
            }
        }

        stats
    }

    // ─── Graph Building from Extractions ────────────────────────

    /// Build the graph from a set of file extractions.
    ///
    /// Files earlier in `extractions` win qualified-name clashes, so callers
    /// pass project files before library files.
    pub fn build_from_extractions(&mut self, extractions: Vec<FileExtractions>) {
        debug!(
            file_count = extractions.len(),
            "ingesting extractions into graph"
        );

        // Phase 1: files and the types they declare.
        let mut owned: Vec<Vec<Option<NodeIndex>>> = Vec::with_capacity(extractions.len());
        for extraction in &extractions {
            let file_idx = self.add_file(extraction.file_path.clone(), extraction.origin);
            let mut indexes = Vec::with_capacity(extraction.types.len());

            for ty in &extraction.types {
                let (type_idx, added) =
                    self.add_type(ty, extraction.file_path.clone(), extraction.origin);
                if added {
                    self.add_edge(file_idx, type_idx, EdgeKind::Defines);
                    indexes.push(Some(type_idx));
                } else {
                    indexes.push(None);
                }
            }
            owned.push(indexes);
        }

        // Phase 2: nesting and inheritance, resolved in each file's scope.
        for (extraction, indexes) in extractions.iter().zip(&owned) {
            let scope = ImportScope::from_extractions(extraction);

            for (ty, idx) in extraction.types.iter().zip(indexes) {
                let Some(type_idx) = *idx else {
                    continue;
                };

                if let Some(parent) = ty.parent.as_deref() {
                    if let Some(&parent_idx) = self.type_index.get(parent) {
                        self.add_edge(parent_idx, type_idx, EdgeKind::Contains);
                    }
                }

                if let Some(superclass) = ty.superclass.as_deref() {
                    if let Some(target) = self.resolve_index(superclass, &scope) {
                        self.add_edge(type_idx, target, EdgeKind::Extends);
                    }
                }

                let interface_edge = if ty.kind == NodeKind::Interface {
                    EdgeKind::Extends
                } else {
                    EdgeKind::Implements
                };
                for name in &ty.interfaces {
                    if let Some(target) = self.resolve_index(name, &scope) {
                        if target != type_idx {
                            self.add_edge(type_idx, target, interface_edge);
                        }
                    }
                }
            }
        }
    }
}

impl Default for CodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub file_count: usize,
    pub project_files: usize,
    pub library_files: usize,
    pub binary_files: usize,
    pub type_count: usize,
    pub interface_count: usize,
    pub total_edges: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files (project: {}, library: {}, binary: {}), {} types ({} interfaces), {} edges",
            self.file_count,
            self.project_files,
            self.library_files,
            self.binary_files,
            self.type_count,
            self.interface_count,
            self.total_edges
        )
    }
}
