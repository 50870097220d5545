//! Error types for PromptForge.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForgeError>;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("unsupported language for {}", .0.display())]
    UnsupportedLanguage(PathBuf),

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("file is not part of the workspace index: {}", .0.display())]
    NotIndexed(PathBuf),

    #[error("{0}")]
    Decompile(String),

    #[error("git: {0}")]
    Git(String),
}
