//! Version-control lookups used when building test prompts.
//!
//! Every helper shells out to `git` in the repository root. Failures of any
//! kind (no repository, git missing, non-zero exit) are reported as "no
//! information" rather than as errors.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{ForgeError, Result};

/// Nearest ancestor directory of `file` that holds a `.git` directory.
pub fn find_git_root(file: &Path) -> Option<PathBuf> {
    let mut current = file.parent();
    while let Some(dir) = current {
        if dir.join(".git").is_dir() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

/// `file` relative to `git_root`, with forward slashes.
pub fn relative_path(git_root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(git_root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Run git in `dir` and return stdout on success.
fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| ForgeError::Git(format!("cannot run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(?args, status = %output.status, stderr = %stderr.trim(), "git failed");
        return Err(ForgeError::Git(format!(
            "git {} exited with {}",
            args.join(" "),
            output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Non-empty trimmed stdout of a successful git call.
fn git_non_empty(dir: &Path, args: &[&str]) -> Option<String> {
    git(dir, args).ok().filter(|out| !out.trim().is_empty())
}

/// Whether `file` has never been committed: untracked, not in the index, or
/// absent from `HEAD`. Files outside any repository count as new.
pub fn is_new_file(file: &Path) -> bool {
    let Some(root) = find_git_root(file) else {
        return true;
    };
    let Some(rel) = relative_path(&root, file) else {
        return true;
    };

    if git_non_empty(&root, &["ls-files", "--others", "--exclude-standard", "--", &rel]).is_some() {
        return true;
    }
    if git_non_empty(&root, &["ls-files", "--", &rel]).is_none() {
        return true;
    }
    git(&root, &["show", &format!("HEAD:{rel}")]).is_err()
}

/// Whether `file` differs from `HEAD`, in the working tree or the index.
pub fn has_changes(git_root: &Path, file: &Path) -> bool {
    let Some(rel) = relative_path(git_root, file) else {
        return false;
    };
    match git(git_root, &["diff", "--name-only", "HEAD", "--", &rel]) {
        Ok(out) if !out.trim().is_empty() => true,
        Ok(_) => {
            git_non_empty(git_root, &["diff", "--name-only", "--staged", "--", &rel]).is_some()
        }
        Err(_) => false,
    }
}

/// Content of `file` as of `HEAD`.
pub fn original_content(git_root: &Path, file: &Path) -> Option<String> {
    let rel = relative_path(git_root, file)?;
    git(git_root, &["show", &format!("HEAD:{rel}")]).ok()
}

/// Unified diff of `file` against `HEAD`, falling back to the staged diff.
pub fn diff(git_root: &Path, file: &Path) -> Option<String> {
    let rel = relative_path(git_root, file)?;
    match git(git_root, &["diff", "HEAD", "--", &rel]) {
        Ok(out) if !out.trim().is_empty() => Some(out),
        Ok(_) => git_non_empty(git_root, &["diff", "--staged", "--", &rel]),
        Err(_) => None,
    }
}
