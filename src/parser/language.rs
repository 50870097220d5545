//! Language detection and tree-sitter grammar loading.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tree_sitter::Language;

/// Languages with source-level support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportedLanguage {
    Java,
    Kotlin,
}

impl SupportedLanguage {
    /// Detect language from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "java" => Some(SupportedLanguage::Java),
            "kt" => Some(SupportedLanguage::Kotlin),
            _ => None,
        }
    }

    /// Get the tree-sitter Language for this language.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SupportedLanguage::Java => tree_sitter_java::LANGUAGE.into(),
            SupportedLanguage::Kotlin => tree_sitter_kotlin::LANGUAGE.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SupportedLanguage::Java => "Java",
            SupportedLanguage::Kotlin => "Kotlin",
        }
    }
}

/// True for compiled JVM class files.
pub fn is_class_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "class")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            SupportedLanguage::from_path(Path::new("src/Foo.java")),
            Some(SupportedLanguage::Java)
        );
        assert_eq!(
            SupportedLanguage::from_path(Path::new("Foo.kt")),
            Some(SupportedLanguage::Kotlin)
        );
        assert_eq!(SupportedLanguage::from_path(Path::new("build.gradle.kts")), None);
        assert_eq!(SupportedLanguage::from_path(Path::new("Makefile")), None);
        assert!(is_class_file(Path::new("lib/a/B.class")));
        assert!(!is_class_file(Path::new("B.java")));
    }

    #[test]
    fn test_grammars_load() {
        for language in [SupportedLanguage::Java, SupportedLanguage::Kotlin] {
            let mut parser = tree_sitter::Parser::new();
            assert!(
                parser.set_language(&language.tree_sitter_language()).is_ok(),
                "{} grammar is incompatible",
                language.name()
            );
        }
    }
}
