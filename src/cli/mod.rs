//! CLI module for PromptForge.
//!
//! Commands:
//! - Context: related, copy
//! - Prompts: explain, ask, change, tests
//! - System: stats

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ForgeConfig;
use crate::decompiler::JavapDecompiler;
use crate::git;
use crate::graph::scan_stats;
use crate::parser::{read_source, SupportedLanguage};
use crate::prompt;
use crate::related::{Decompiler, RelatedFile};
use crate::workspace::ProjectWorkspace;

#[derive(Parser)]
#[command(name = "promptforge")]
#[command(
    about = "PromptForge - LLM prompts for Java files, with related files as context",
    long_about = None
)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <root>/.promptforge/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    // ─── Context ────────────────────────────────────────────────────
    /// List the files related to a Java file
    Related {
        file: PathBuf,

        /// Print full records (path, content, flags) as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a file followed by its related files
    Copy { file: PathBuf },

    // ─── Prompts ────────────────────────────────────────────────────
    /// Prompt asking for an explanation of a class
    Explain { file: PathBuf },

    /// Prompt asking a question about a class
    Ask { file: PathBuf, question: String },

    /// Prompt asking for a change to a class
    Change { file: PathBuf, request: String },

    /// Prompt asking for unit tests (new or modified file, decided by git)
    Tests { file: PathBuf },

    // ─── System ─────────────────────────────────────────────────────
    /// Show index statistics
    Stats,
}

/// The Java file a prompt is built for.
struct Target {
    path: PathBuf,
    content: String,
    class_name: String,
}

/// An indexed workspace plus the config commands run with.
pub struct Session {
    workspace: ProjectWorkspace,
    config: ForgeConfig,
    decompiler: Box<dyn Decompiler>,
}

impl Session {
    /// Load the config and index the project at `root`.
    pub fn open(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("project root {} not found", root.display()))?;
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| ForgeConfig::default_path(&root));
        let config = ForgeConfig::load(&config_path);
        let workspace = ProjectWorkspace::open(&root, &config.workspace)?;

        Ok(Self {
            workspace,
            config,
            decompiler: Box::new(JavapDecompiler::new()),
        })
    }

    /// Replace the decompiler used for binary dependencies.
    pub fn with_decompiler(mut self, decompiler: Box<dyn Decompiler>) -> Self {
        self.decompiler = decompiler;
        self
    }

    /// Run `command` and return what it prints.
    pub fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Related { file, json } => {
                let target = self.target(file)?;
                let related = self.related(&target)?;
                if *json {
                    Ok(serde_json::to_string_pretty(&related)?)
                } else {
                    Ok(list_related(&related))
                }
            }
            Commands::Copy { file } => {
                let target = self.target(file)?;
                let related = self.related(&target)?;
                let path = target.path.display().to_string();
                Ok(prompt::copy_with_context(&path, &target.content, &related))
            }
            Commands::Explain { file } => {
                let target = self.target(file)?;
                let related = self.related(&target)?;
                Ok(prompt::explain_prompt(
                    &self.config.templates,
                    &target.class_name,
                    &target.content,
                    &related,
                ))
            }
            Commands::Ask { file, question } => {
                let target = self.target(file)?;
                let related = self.related(&target)?;
                Ok(prompt::ask_prompt(
                    &self.config.templates,
                    &target.class_name,
                    &target.content,
                    question,
                    &related,
                ))
            }
            Commands::Change { file, request } => {
                let target = self.target(file)?;
                let related = self.related(&target)?;
                Ok(prompt::change_prompt(
                    &self.config.templates,
                    &target.class_name,
                    &target.content,
                    request,
                    &related,
                ))
            }
            Commands::Tests { file } => self.tests_prompt(file),
            Commands::Stats => Ok(self.stats()),
        }
    }

    fn tests_prompt(&self, file: &Path) -> Result<String> {
        let target = self.target(file)?;
        let related = self.related(&target)?;
        let templates = &self.config.templates;

        if git::is_new_file(&target.path) {
            debug!(file = %target.path.display(), "new file, using new-file test prompt");
            return Ok(prompt::new_file_tests_prompt(
                templates,
                &target.class_name,
                &target.content,
                &related,
            ));
        }

        let git_root = git::find_git_root(&target.path)
            .context("Could not find Git repository for this file.")?;
        if !git::has_changes(&git_root, &target.path) {
            bail!("No changes detected in the file.");
        }
        let original = git::original_content(&git_root, &target.path)
            .context("Could not retrieve the original content from Git.")?;
        let diff =
            git::diff(&git_root, &target.path).context("No changes detected in the file.")?;
        let test_file = prompt::find_test_file_for(self.workspace.root(), &target.path)
            .context("Could not find a related test file.")?;
        let test_content = read_source(&test_file)
            .with_context(|| format!("failed to read {}", test_file.display()))?;

        Ok(prompt::modified_file_tests_prompt(
            templates,
            &original,
            &diff,
            &test_content,
            &related,
        ))
    }

    fn stats(&self) -> String {
        let library_roots = self
            .config
            .workspace
            .resolved_library_roots(self.workspace.root());
        let scanned = scan_stats(self.workspace.root(), &library_roots);
        format!(
            "PromptForge - Index Statistics\n\
             ══════════════════════════════\n\
             Root:    {}\n\
             Scanned: {}\n\
             Index:   {}",
            self.workspace.root().display(),
            scanned,
            self.workspace.stats()
        )
    }

    /// Resolve `file` against the working directory, then the project root.
    fn target(&self, file: &Path) -> Result<Target> {
        let path = if file.is_absolute() || file.exists() {
            file.to_path_buf()
        } else {
            self.workspace.root().join(file)
        };
        if SupportedLanguage::from_path(&path) != Some(SupportedLanguage::Java) {
            bail!("This action only works with Java files.");
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("file {} not found", path.display()))?;
        let content =
            read_source(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let class_name = match self.workspace.graph().types_in_file(&path).first() {
            Some(ty) => ty.name.clone(),
            None => prompt::class_name(&path, &content),
        };

        Ok(Target {
            path,
            content,
            class_name,
        })
    }

    fn related(&self, target: &Target) -> Result<Vec<RelatedFile>> {
        Ok(self.workspace.collect_related(
            &target.path,
            &self.config.related_files,
            self.decompiler.as_ref(),
        )?)
    }
}

fn list_related(related: &[RelatedFile]) -> String {
    if related.is_empty() {
        return "No related files found.".to_string();
    }
    let mut out = format!("{} related files:\n", related.len());
    for file in related {
        out.push_str("  ");
        out.push_str(&file.path);
        if file.is_implementation {
            out.push_str("  [implementation]");
        }
        if file.is_decompiled {
            out.push_str("  [decompiled]");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use crate::decompiler::UnavailableDecompiler;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn project() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        write(
            &root,
            "src/main/java/com/acme/OrderService.java",
            "package com.acme;\n\npublic class OrderService {\n    private Order order;\n}\n",
        );
        write(
            &root,
            "src/main/java/com/acme/Order.java",
            "package com.acme;\n\npublic class Order {\n    long id;\n}\n",
        );
        (dir, root)
    }

    fn session(root: &Path) -> Session {
        Session::open(root, None)
            .unwrap()
            .with_decompiler(Box::new(UnavailableDecompiler))
    }

    #[test]
    fn test_parse_arguments() {
        let args = ["promptforge", "-r", "/proj", "ask", "A.java", "Why?"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.root, PathBuf::from("/proj"));
        assert_eq!(cli.config, None);
        assert_eq!(
            cli.command,
            Commands::Ask {
                file: PathBuf::from("A.java"),
                question: "Why?".to_string(),
            }
        );

        let cli = Cli::try_parse_from(["promptforge", "related", "A.java", "--json"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(matches!(cli.command, Commands::Related { json: true, .. }));

        assert!(Cli::try_parse_from(["promptforge"]).is_err());
    }

    #[test]
    fn test_related_listing_and_json() {
        let (_dir, root) = project();
        let session = session(&root);
        let file = PathBuf::from("src/main/java/com/acme/OrderService.java");

        let listing = session
            .execute(&Commands::Related {
                file: file.clone(),
                json: false,
            })
            .unwrap();
        assert!(listing.starts_with("1 related files:"));
        assert!(listing.contains("Order.java"));

        let json = session
            .execute(&Commands::Related { file, json: true })
            .unwrap();
        let records: Vec<RelatedFile> = serde_json::from_str(&json).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].content.contains("public class Order"));
    }

    #[test]
    fn test_prompts_carry_related_files() {
        let (_dir, root) = project();
        let session = session(&root);
        let file = root.join("src/main/java/com/acme/OrderService.java");

        let explain = session
            .execute(&Commands::Explain { file: file.clone() })
            .unwrap();
        assert!(explain.contains("OrderService"));
        assert!(explain.contains("Related files for context:"));
        assert!(explain.contains("public class Order {"));

        let change = session
            .execute(&Commands::Change {
                file: file.clone(),
                request: "Add a total".to_string(),
            })
            .unwrap();
        assert!(change.contains("Add a total"));

        let copy = session.execute(&Commands::Copy { file }).unwrap();
        assert!(copy.starts_with("// File: "));
        assert!(copy.contains("// Related files:"));
    }

    #[test]
    fn test_related_files_can_be_disabled() {
        let (_dir, root) = project();
        write(
            &root,
            ".promptforge/config.toml",
            "[related_files]\ninclude_related_files = false\n",
        );
        let session = session(&root);
        let listing = session
            .execute(&Commands::Related {
                file: root.join("src/main/java/com/acme/OrderService.java"),
                json: false,
            })
            .unwrap();
        assert_eq!(listing, "No related files found.");
    }

    #[test]
    fn test_non_java_files_are_rejected() {
        let (_dir, root) = project();
        let readme = write(&root, "README.md", "# readme");
        let kotlin = write(&root, "src/main/kotlin/Order.kt", "class Order\n");
        let session = session(&root);
        for file in [readme, kotlin] {
            let err = session.execute(&Commands::Explain { file }).unwrap_err();
            assert_eq!(err.to_string(), "This action only works with Java files.");
        }
    }

    #[test]
    fn test_tests_prompt_for_untracked_file() {
        let (_dir, root) = project();
        let file = root.join("src/main/java/com/acme/Order.java");
        if git::find_git_root(&file).is_some() {
            return;
        }
        let prompt = session(&root).execute(&Commands::Tests { file }).unwrap();
        assert!(prompt.contains("write a complete JUnit 5 test class for Order"));
    }

    #[test]
    fn test_stats() {
        let (_dir, root) = project();
        let out = session(&root).execute(&Commands::Stats).unwrap();
        assert!(out.contains("Found 2 project sources"));
        assert!(out.contains("2 files (project: 2"));
    }
}
