//! # PromptForge
//!
//! Context assembly for LLM prompts about Java code.
//!
//! Given a Java file, PromptForge finds the files it depends on (the types it
//! imports and uses, the implementations of interfaces it touches, and
//! optionally library sources and decompiled classes), prunes them to their
//! declarations and renders them into prompt templates.
//!
//! ## Key Features
//!
//! - **Bounded**: depth and file-count limits keep the context small
//! - **Java-aware**: imports, same-package and nested-type resolution
//! - **Dependency-aware**: library sources and `javap` output for class files
//! - **Git-aware**: test prompts for modified files include the diff
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use promptforge::{CollectorConfig, JavapDecompiler, ProjectWorkspace, WorkspaceConfig};
//! use std::path::Path;
//!
//! let workspace = ProjectWorkspace::open(Path::new("."), &WorkspaceConfig::default())?;
//! let related = workspace.collect_related(
//!     Path::new("src/main/java/com/acme/OrderService.java"),
//!     &CollectorConfig::default(),
//!     &JavapDecompiler::new(),
//! )?;
//! for file in &related {
//!     println!("{}", file.path);
//! }
//! # Ok::<(), promptforge::ForgeError>(())
//! ```

pub mod cli;
pub mod config;
pub mod decompiler;
pub mod error;
pub mod git;
pub mod graph;
pub mod parser;
pub mod prompt;
pub mod related;
pub mod workspace;

// Re-exports for convenience
pub use config::{CollectorConfig, ForgeConfig, PromptTemplates, WorkspaceConfig};
pub use decompiler::{JavapDecompiler, UnavailableDecompiler};
pub use error::{ForgeError, Result};

pub use graph::{build_graph, CodeGraph, GraphStats, NodeKind};
pub use parser::SupportedLanguage;
pub use related::{FileOrigin, RelatedFile, RelatedFilesCollector, SourceFile};
pub use workspace::{FsReader, ProjectWorkspace};
