//! The on-disk host: a project directory, its library roots and the type
//! index built over them.
//!
//! `ProjectWorkspace` answers the collector's symbol questions from the
//! [`CodeGraph`], re-parsing files from disk when their references are
//! scanned so the collector always sees current content.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::config::{CollectorConfig, WorkspaceConfig};
use crate::error::{ForgeError, Result};
use crate::graph::{build_graph, CodeGraph, GraphStats, ImportScope, NodeData, NodeKind};
use crate::parser::{self, is_class_file, SupportedLanguage};
use crate::related::{
    Decompiler, FileOrigin, FileOutline, FileReader, Host, ImplementationFinder, ReferenceNode,
    RelatedFile, RelatedFilesCollector, SearchScope, SourceFile, Symbol, SymbolResolver,
};

/// A name occurrence in a source file, with the scope needed to resolve it.
#[derive(Debug, Clone)]
pub struct JavaNode {
    /// The name as written; the imported path for imports.
    pub name: String,
    pub line: usize,
    pub is_static: bool,
    pub is_wildcard: bool,
    scope: Rc<ImportScope>,
}

pub struct ProjectWorkspace {
    root: PathBuf,
    graph: CodeGraph,
}

impl ProjectWorkspace {
    /// Index `root` and the configured library roots.
    pub fn open(root: &Path, config: &WorkspaceConfig) -> Result<Self> {
        let root = fs::canonicalize(root)?;
        let library_roots: Vec<PathBuf> = config
            .resolved_library_roots(&root)
            .into_iter()
            .map(|lib| fs::canonicalize(&lib).unwrap_or(lib))
            .collect();

        info!(root = %root.display(), libraries = library_roots.len(), "indexing workspace");
        let graph = build_graph(&root, &library_roots);
        Ok(Self { root, graph })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn graph(&self) -> &CodeGraph {
        &self.graph
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    /// The workspace's view of `path`. Indexed files keep their origin;
    /// other Java sources are treated as project files.
    pub fn source_file(&self, path: &Path) -> Result<SourceFile> {
        let path = fs::canonicalize(path)?;
        if let Some(node) = self.graph.file(&path) {
            return Ok(SourceFile::new(path, node.origin));
        }
        if SupportedLanguage::from_path(&path).is_some() {
            debug!(file = %path.display(), "file not in index, treating as project source");
            return Ok(SourceFile::new(path, FileOrigin::Project));
        }
        Err(ForgeError::UnsupportedLanguage(path))
    }

    /// Capabilities for a collector run over this workspace.
    pub fn host<'a>(
        &'a self,
        decompiler: &'a dyn Decompiler,
        reader: &'a dyn FileReader,
    ) -> Host<'a, Self> {
        Host {
            resolver: self,
            implementations: self,
            decompiler,
            reader,
        }
    }

    /// Related files of the file at `path`. A path that does not exist or
    /// is not a source file has no related files.
    pub fn collect_related(
        &self,
        path: &Path,
        config: &CollectorConfig,
        decompiler: &dyn Decompiler,
    ) -> Result<Vec<RelatedFile>> {
        let root = match self.source_file(path) {
            Ok(root) => root,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "no related files");
                return Ok(Vec::new());
            }
        };
        let reader = FsReader;
        let collector = RelatedFilesCollector::new(self.host(decompiler, &reader));
        Ok(collector.collect(&root, config))
    }

    fn symbol(node: &NodeData) -> Symbol {
        Symbol::new(
            node.qualified_name.clone(),
            Some(SourceFile::new(node.file_path.clone(), node.origin)),
        )
    }
}

impl SymbolResolver for ProjectWorkspace {
    type Node = JavaNode;

    fn reference_nodes(&self, file: &SourceFile) -> Result<Vec<ReferenceNode<JavaNode>>> {
        if file.is_binary() || is_class_file(&file.path) {
            return Ok(Vec::new());
        }

        let source = parser::read_source(&file.path)?;
        let extraction = parser::extract_file(&file.path, &source)?;
        let scope = Rc::new(ImportScope::from_extractions(&extraction));

        let imports = extraction.imports.into_iter().map(|import| {
            ReferenceNode::Import(JavaNode {
                name: import.path,
                line: import.line,
                is_static: import.is_static,
                is_wildcard: import.is_wildcard,
                scope: Rc::clone(&scope),
            })
        });
        let references = extraction.references.into_iter().map(|reference| {
            ReferenceNode::Reference(JavaNode {
                name: reference.name,
                line: reference.line,
                is_static: false,
                is_wildcard: false,
                scope: Rc::clone(&scope),
            })
        });

        Ok(imports.chain(references).collect())
    }

    fn resolve(&self, node: &JavaNode) -> Option<Symbol> {
        let resolved = self.graph.resolve_name(&node.name, &node.scope);
        if resolved.is_none() {
            debug!(name = %node.name, line = node.line, "unresolved reference");
        }
        resolved.map(Self::symbol)
    }

    /// Single-type imports resolve to the imported type, static imports to
    /// the type owning the member. On-demand imports name packages and
    /// resolve to nothing.
    fn resolve_import(&self, node: &JavaNode) -> Option<Symbol> {
        let target = match (node.is_static, node.is_wildcard) {
            (true, true) => node.name.as_str(),
            (true, false) => node.name.rsplit_once('.')?.0,
            (false, true) => return None,
            (false, false) => node.name.as_str(),
        };
        let resolved = self.graph.lookup(target);
        if resolved.is_none() {
            debug!(import = %node.name, line = node.line, "import not indexed");
        }
        resolved.map(Self::symbol)
    }

    fn is_interface_type(&self, symbol: &Symbol) -> bool {
        self.graph
            .lookup(&symbol.qualified_name)
            .is_some_and(|node| node.kind == NodeKind::Interface)
    }

    fn outline(&self, file: &SourceFile, text: &str) -> Option<FileOutline> {
        if file.is_binary() {
            return None;
        }
        parser::outline_source(&file.path, text).ok()
    }
}

impl ImplementationFinder for ProjectWorkspace {
    fn find_implementors(&self, symbol: &Symbol, scope: SearchScope) -> Vec<Symbol> {
        self.graph
            .implementors(&symbol.qualified_name)
            .into_iter()
            .filter(|node| {
                scope == SearchScope::ProjectAndDependencies || node.origin == FileOrigin::Project
            })
            .map(Self::symbol)
            .collect()
    }
}

/// Reads files straight from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, file: &SourceFile) -> Result<String> {
        parser::read_source(&file.path)
    }
}
