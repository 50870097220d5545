//! Type index: the structural model the workspace host answers from.
//!
//! Provides the graph data model, the engine with name resolution and
//! implementor search, and directory scanning/building.

pub mod builder;
pub mod engine;
pub mod types;

pub use builder::{build_graph, class_name_from_path, scan_stats, ScanStats};
pub use engine::{CodeGraph, GraphStats};
pub use types::{
    EdgeData, EdgeKind, ExtractedImport, ExtractedReference, ExtractedType, FileExtractions,
    ImportScope, NodeData, NodeKind,
};
