//! Source parsing with tree-sitter.
//!
//! Turns a Java or Kotlin file into a [`FileExtractions`] record for the type
//! index and into a [`FileOutline`] for smart pruning.

pub mod java;
pub mod kotlin;
pub mod language;

pub use language::{is_class_file, SupportedLanguage};

use std::fs;
use std::path::Path;
use tree_sitter::{Parser, Tree};

use crate::error::{ForgeError, Result};
use crate::graph::types::FileExtractions;
use crate::related::{FileOrigin, FileOutline};

/// Read a source file, replacing invalid UTF-8 sequences.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn language_of(path: &Path) -> Result<SupportedLanguage> {
    SupportedLanguage::from_path(path)
        .ok_or_else(|| ForgeError::UnsupportedLanguage(path.to_path_buf()))
}

/// Parse `source` with the grammar matching `path`'s extension.
pub fn parse(path: &Path, source: &str) -> Result<Tree> {
    let language = language_of(path)?;

    let mut parser = Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|e| ForgeError::Parse {
            path: path.to_path_buf(),
            reason: format!("failed to load the {} grammar: {e}", language.name()),
        })?;

    parser.parse(source, None).ok_or_else(|| ForgeError::Parse {
        path: path.to_path_buf(),
        reason: "parser produced no tree".to_string(),
    })
}

/// Extract package, imports, declared types and type references from a
/// project source file.
pub fn extract_file(path: &Path, source: &str) -> Result<FileExtractions> {
    let language = language_of(path)?;
    let tree = parse(path, source)?;
    let mut extractions = FileExtractions::new(path.to_path_buf(), FileOrigin::Project);
    let root = tree.root_node();
    match language {
        SupportedLanguage::Java => java::extract(&root, source.as_bytes(), &mut extractions),
        SupportedLanguage::Kotlin => kotlin::extract(&root, source.as_bytes(), &mut extractions),
    }
    Ok(extractions)
}

/// Declaration outline of `source`.
pub fn outline_source(path: &Path, source: &str) -> Result<FileOutline> {
    let language = language_of(path)?;
    let tree = parse(path, source)?;
    let root = tree.root_node();
    Ok(match language {
        SupportedLanguage::Java => java::outline(&root, source.as_bytes()),
        SupportedLanguage::Kotlin => kotlin::outline(&root, source.as_bytes()),
    })
}
