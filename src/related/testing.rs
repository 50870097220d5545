//! In-memory host used by the collector's unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use super::host::{Decompiler, FileReader, Host, ImplementationFinder, SymbolResolver};
use super::types::{
    FileOrigin, FileOutline, ReferenceNode, RelatedFile, SearchScope, SourceFile, Symbol,
};
use super::RelatedFilesCollector;
use crate::config::CollectorConfig;
use crate::error::{ForgeError, Result};

#[derive(Debug, Clone)]
struct TypeEntry {
    path: Option<PathBuf>,
    interface: bool,
}

/// A tiny fake code model: files hold reference lists, types map to files.
#[derive(Default)]
pub(crate) struct FakeHost {
    files: HashMap<PathBuf, SourceFile>,
    texts: HashMap<PathBuf, String>,
    outlines: HashMap<PathBuf, FileOutline>,
    nodes: HashMap<PathBuf, Vec<ReferenceNode<String>>>,
    types: HashMap<String, TypeEntry>,
    implementors: HashMap<String, Vec<String>>,
    decompiled: HashMap<PathBuf, std::result::Result<String, String>>,
    unreadable: HashSet<PathBuf>,
    unparsable: HashSet<PathBuf>,
    /// Every path whose references were scanned, in order.
    pub scanned: RefCell<Vec<PathBuf>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_type(&mut self, name: &str, path: &str, origin: FileOrigin, interface: bool) {
        let path = PathBuf::from(path);
        self.files
            .entry(path.clone())
            .or_insert_with(|| SourceFile::new(path.clone(), origin));
        self.texts
            .entry(path.clone())
            .or_insert_with(|| format!("// {name}\n"));
        self.types.insert(
            name.to_string(),
            TypeEntry {
                path: Some(path),
                interface,
            },
        );
    }

    /// Register a project class `name` declared in `path`.
    pub fn class(mut self, name: &str, path: &str) -> Self {
        self.add_type(name, path, FileOrigin::Project, false);
        self
    }

    /// Register a class with an explicit origin.
    pub fn class_in(mut self, name: &str, path: &str, origin: FileOrigin) -> Self {
        self.add_type(name, path, origin, false);
        self
    }

    /// Register a project interface `name` declared in `path`.
    pub fn interface(mut self, name: &str, path: &str) -> Self {
        self.add_type(name, path, FileOrigin::Project, true);
        self
    }

    /// A symbol the resolver knows but which has no containing file.
    pub fn fileless(mut self, name: &str) -> Self {
        self.types.insert(
            name.to_string(),
            TypeEntry {
                path: None,
                interface: false,
            },
        );
        self
    }

    /// A project file with no declared types (e.g. the root).
    pub fn file(mut self, path: &str) -> Self {
        let path = PathBuf::from(path);
        self.files
            .entry(path.clone())
            .or_insert_with(|| SourceFile::new(path.clone(), FileOrigin::Project));
        self.texts.entry(path).or_default();
        self
    }

    /// In-body references made by `path`.
    pub fn refs(mut self, path: &str, names: &[&str]) -> Self {
        let nodes = self.nodes.entry(PathBuf::from(path)).or_default();
        nodes.extend(names.iter().map(|n| ReferenceNode::Reference(n.to_string())));
        self
    }

    /// Imports made by `path`.
    pub fn imports(mut self, path: &str, names: &[&str]) -> Self {
        let nodes = self.nodes.entry(PathBuf::from(path)).or_default();
        nodes.extend(names.iter().map(|n| ReferenceNode::Import(n.to_string())));
        self
    }

    pub fn implements(mut self, interface: &str, implementor: &str) -> Self {
        self.implementors
            .entry(interface.to_string())
            .or_default()
            .push(implementor.to_string());
        self
    }

    pub fn text(mut self, path: &str, text: &str) -> Self {
        self.texts.insert(PathBuf::from(path), text.to_string());
        self
    }

    pub fn outline(mut self, path: &str, outline: FileOutline) -> Self {
        self.outlines.insert(PathBuf::from(path), outline);
        self
    }

    pub fn decompiles_to(mut self, path: &str, result: std::result::Result<&str, &str>) -> Self {
        self.decompiled.insert(
            PathBuf::from(path),
            result.map(str::to_string).map_err(str::to_string),
        );
        self
    }

    pub fn unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(PathBuf::from(path));
        self
    }

    pub fn unparsable(mut self, path: &str) -> Self {
        self.unparsable.insert(PathBuf::from(path));
        self
    }

    pub fn source(&self, path: &str) -> SourceFile {
        self.files
            .get(&PathBuf::from(path))
            .cloned()
            .unwrap_or_else(|| SourceFile::new(path, FileOrigin::Project))
    }

    pub fn host(&self) -> Host<'_, FakeHost> {
        Host {
            resolver: self,
            implementations: self,
            decompiler: self,
            reader: self,
        }
    }

    /// Run a full collection rooted at `path`.
    pub fn collect(&self, path: &str, config: &CollectorConfig) -> Vec<RelatedFile> {
        RelatedFilesCollector::new(self.host()).collect(&self.source(path), config)
    }

    fn symbol(&self, name: &str) -> Option<Symbol> {
        let entry = self.types.get(name)?;
        let file = entry
            .path
            .as_ref()
            .and_then(|p| self.files.get(p))
            .cloned();
        Some(Symbol::new(name, file))
    }
}

impl SymbolResolver for FakeHost {
    type Node = String;

    fn reference_nodes(&self, file: &SourceFile) -> Result<Vec<ReferenceNode<String>>> {
        self.scanned.borrow_mut().push(file.path.clone());
        if self.unparsable.contains(&file.path) {
            return Err(ForgeError::Parse {
                path: file.path.clone(),
                reason: "broken".to_string(),
            });
        }
        Ok(self.nodes.get(&file.path).cloned().unwrap_or_default())
    }

    fn resolve(&self, node: &String) -> Option<Symbol> {
        self.symbol(node)
    }

    fn resolve_import(&self, node: &String) -> Option<Symbol> {
        self.symbol(node)
    }

    fn is_interface_type(&self, symbol: &Symbol) -> bool {
        self.types
            .get(&symbol.qualified_name)
            .is_some_and(|t| t.interface)
    }

    fn outline(&self, file: &SourceFile, _text: &str) -> Option<FileOutline> {
        self.outlines.get(&file.path).cloned()
    }
}

impl ImplementationFinder for FakeHost {
    fn find_implementors(&self, symbol: &Symbol, scope: SearchScope) -> Vec<Symbol> {
        self.implementors
            .get(&symbol.qualified_name)
            .into_iter()
            .flatten()
            .filter_map(|name| self.symbol(name))
            .filter(|s| {
                scope == SearchScope::ProjectAndDependencies
                    || s.file.as_ref().is_some_and(SourceFile::is_in_project)
            })
            .collect()
    }
}

impl Decompiler for FakeHost {
    fn decompile(&self, file: &SourceFile) -> Result<String> {
        match self.decompiled.get(&file.path) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(reason)) => Err(ForgeError::Decompile(reason.clone())),
            None => Err(ForgeError::Decompile("no decompiler output".to_string())),
        }
    }
}

impl FileReader for FakeHost {
    fn read(&self, file: &SourceFile) -> Result<String> {
        if self.unreadable.contains(&file.path) {
            return Err(ForgeError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "unreadable",
            )));
        }
        self.texts
            .get(&file.path)
            .cloned()
            .ok_or_else(|| ForgeError::NotIndexed(file.path.clone()))
    }
}

/// Paths of a collection result, in output order.
pub(crate) fn paths(result: &[RelatedFile]) -> Vec<&str> {
    result.iter().map(|f| f.path.as_str()).collect()
}
