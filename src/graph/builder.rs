//! Graph builder: scans the project and its library roots and builds the
//! type graph.
//!
//! Walks project sources respecting .gitignore, walks library roots without
//! ignore rules (compiled classes are usually gitignored), parses each source
//! with tree-sitter in parallel, and assembles the graph with all inheritance
//! relationships.

use ignore::{Walk, WalkBuilder};
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

use super::engine::CodeGraph;
use super::types::{ExtractedType, FileExtractions, NodeKind};
use crate::parser::{extract_file, is_class_file, read_source, SupportedLanguage};
use crate::related::FileOrigin;

/// Build the type graph for `project_root` plus the given library roots.
///
/// Project sources are indexed as [`FileOrigin::Project`]; library roots
/// contribute `.java` files as [`FileOrigin::Library`] and `.class` files as
/// [`FileOrigin::Binary`]. Files that fail to read or parse are skipped.
pub fn build_graph(project_root: &Path, library_roots: &[PathBuf]) -> CodeGraph {
    let project_files: Vec<PathBuf> = walk(project_root)
        .filter(|path| SupportedLanguage::from_path(path).is_some())
        .filter(|path| !library_roots.iter().any(|lib| path.starts_with(lib)))
        .collect();

    let mut extractions = parse_sources(&project_files, FileOrigin::Project);

    for library_root in library_roots {
        if !library_root.is_dir() {
            warn!(root = %library_root.display(), "library root is not a directory");
            continue;
        }
        let (sources, classes): (Vec<PathBuf>, Vec<PathBuf>) = walk_library(library_root)
            .filter(|path| SupportedLanguage::from_path(path).is_some() || is_class_file(path))
            .partition(|path| !is_class_file(path));

        extractions.extend(parse_sources(&sources, FileOrigin::Library));
        extractions.extend(
            classes
                .iter()
                .filter_map(|path| class_file_extractions(library_root, path)),
        );
    }

    let mut graph = CodeGraph::new();
    graph.build_from_extractions(extractions);

    let stats = graph.stats();
    info!(
        files = stats.file_count,
        types = stats.type_count,
        edges = stats.total_edges,
        "type index built"
    );
    graph
}

fn walk(root: &Path) -> impl Iterator<Item = PathBuf> {
    files(
        WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .build(),
    )
}

/// Walk a library root with every ignore source disabled.
fn walk_library(root: &Path) -> impl Iterator<Item = PathBuf> {
    files(
        WalkBuilder::new(root)
            .hidden(true)
            .parents(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .build(),
    )
}

fn files(walk: Walk) -> impl Iterator<Item = PathBuf> {
    walk.filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
}

/// Parse source files in parallel. The output is sorted by path so the
/// first-declaration-wins rule does not depend on thread scheduling.
fn parse_sources(files: &[PathBuf], origin: FileOrigin) -> Vec<FileExtractions> {
    let extractions: Mutex<Vec<FileExtractions>> = Mutex::new(Vec::with_capacity(files.len()));

    files.par_iter().for_each(|file_path| {
        let source = match read_source(file_path) {
            Ok(source) => source,
            Err(e) => {
                debug!(file = %file_path.display(), error = %e, "skipping unreadable file");
                return;
            }
        };
        match extract_file(file_path, &source) {
            Ok(mut extraction) => {
                extraction.origin = origin;
                if let Ok(mut exts) = extractions.lock() {
                    exts.push(extraction);
                }
            }
            Err(e) => debug!(file = %file_path.display(), error = %e, "skipping unparsable file"),
        }
    });

    let mut extractions = extractions.into_inner().unwrap_or_default();
    extractions.sort_by(|a, b| a.file_path.cmp(&b.file_path));
    extractions
}

/// Qualified class name of a `.class` file below `root`, e.g.
/// `root/com/acme/Foo.class` -> `com.acme.Foo`. Inner and anonymous classes
/// (`Foo$Bar.class`) yield `None`.
pub fn class_name_from_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let stem = relative.with_extension("");
    let segments: Vec<&str> = stem
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    if segments.is_empty() || segments.iter().any(|s| s.contains('$')) {
        return None;
    }
    Some(segments.join("."))
}

fn class_file_extractions(root: &Path, path: &Path) -> Option<FileExtractions> {
    let qualified_name = class_name_from_path(root, path)?;
    let (package, name) = match qualified_name.rsplit_once('.') {
        Some((package, name)) => (Some(package.to_string()), name.to_string()),
        None => (None, qualified_name.clone()),
    };

    let mut extraction = FileExtractions::new(path.to_path_buf(), FileOrigin::Binary);
    extraction.package = package;
    extraction.types.push(ExtractedType {
        name,
        qualified_name,
        kind: NodeKind::Class,
        parent: None,
        superclass: None,
        interfaces: Vec::new(),
        line_start: 0,
    });
    Some(extraction)
}

/// Count the files a build would index, without parsing them.
pub fn scan_stats(project_root: &Path, library_roots: &[PathBuf]) -> ScanStats {
    let mut stats = ScanStats::default();

    for path in walk(project_root) {
        if SupportedLanguage::from_path(&path).is_some()
            && !library_roots.iter().any(|lib| path.starts_with(lib))
        {
            stats.project_sources += 1;
        }
    }
    for library_root in library_roots.iter().filter(|root| root.is_dir()) {
        for path in walk_library(library_root) {
            if is_class_file(&path) {
                stats.class_files += 1;
            } else if SupportedLanguage::from_path(&path).is_some() {
                stats.library_sources += 1;
            }
        }
    }

    stats
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub project_sources: usize,
    pub library_sources: usize,
    pub class_files: usize,
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} project sources, {} library sources, {} class files",
            self.project_sources, self.library_sources, self.class_files
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_class_name_from_path() {
        let root = Path::new("/deps");
        assert_eq!(
            class_name_from_path(root, Path::new("/deps/com/acme/Foo.class")).as_deref(),
            Some("com.acme.Foo")
        );
        assert_eq!(
            class_name_from_path(root, Path::new("/deps/Top.class")).as_deref(),
            Some("Top")
        );
        assert_eq!(
            class_name_from_path(root, Path::new("/deps/com/acme/Foo$1.class")),
            None
        );
        assert_eq!(
            class_name_from_path(root, Path::new("/other/Foo.class")),
            None
        );
    }

    #[test]
    fn test_build_graph_indexes_all_origins() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            "src/main/java/com/acme/Repo.java",
            "package com.acme;\npublic interface Repo {}\n",
        );
        write(
            root,
            "src/main/java/com/acme/SqlRepo.java",
            "package com.acme;\npublic class SqlRepo implements Repo {}\n",
        );
        write(
            root,
            "deps/src/org/lib/Helper.java",
            "package org.lib;\npublic class Helper {}\n",
        );
        write(root, "deps/classes/org/lib/Codec.class", "\u{CA}\u{FE}");
        write(root, "deps/classes/org/lib/Codec$Inner.class", "\u{CA}\u{FE}");
        write(root, "README.md", "# not java\n");

        let libs = vec![root.join("deps/src"), root.join("deps/classes")];
        let graph = build_graph(root, &libs);

        let repo = graph.lookup("com.acme.Repo").unwrap();
        assert_eq!(repo.origin, FileOrigin::Project);
        assert_eq!(repo.kind, NodeKind::Interface);
        assert_eq!(graph.lookup("org.lib.Helper").unwrap().origin, FileOrigin::Library);
        let codec = graph.lookup("org.lib.Codec").unwrap();
        assert_eq!(codec.origin, FileOrigin::Binary);
        assert!(codec.file_path.ends_with("org/lib/Codec.class"));

        let implementors: Vec<&str> = graph
            .implementors("com.acme.Repo")
            .iter()
            .map(|n| n.qualified_name.as_str())
            .collect();
        assert_eq!(implementors, vec!["com.acme.SqlRepo"]);

        let stats = graph.stats();
        assert_eq!(stats.project_files, 2);
        assert_eq!(stats.library_files, 1);
        assert_eq!(stats.binary_files, 1);

        let scan = scan_stats(root, &libs);
        assert_eq!(
            scan,
            ScanStats {
                project_sources: 2,
                library_sources: 1,
                class_files: 2,
            }
        );
    }

    #[test]
    fn test_missing_library_root_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "A.java", "class A {}\n");
        let graph = build_graph(dir.path(), &[dir.path().join("nope")]);
        assert!(graph.lookup("A").is_some());
    }

    #[test]
    fn test_gitignored_library_classes_are_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        write(root, ".gitignore", "*.class\nbuild/\n");
        write(root, "src/App.java", "package app;\npublic class App {}\n");
        write(root, "build/Generated.java", "package gen;\npublic class Generated {}\n");
        write(root, "libs/classes/org/lib/Thing.class", "\u{CA}\u{FE}");

        let libs = vec![root.join("libs/classes")];
        let graph = build_graph(root, &libs);

        let thing = graph.lookup("org.lib.Thing").unwrap();
        assert_eq!(thing.origin, FileOrigin::Binary);
        assert!(graph.lookup("app.App").is_some());
        assert!(graph.lookup("gen.Generated").is_none(), "project walk keeps gitignore");
        assert_eq!(scan_stats(root, &libs).class_files, 1);
    }

    #[test]
    fn test_non_utf8_sources_are_indexed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Legacy.java");
        let mut bytes = b"package old;\n// caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"\npublic class Legacy {}\n");
        fs::write(&path, bytes).unwrap();

        let graph = build_graph(dir.path(), &[]);
        assert!(graph.lookup("old.Legacy").is_some());
    }
}
