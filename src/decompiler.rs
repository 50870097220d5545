//! Textual reconstruction of compiled class files.

use std::process::Command;
use tracing::debug;

use crate::error::{ForgeError, Result};
use crate::related::{Decompiler, SourceFile};

/// Disassembles class files with the JDK's `javap`, including private
/// members. The output is the class signature view, not Java source.
#[derive(Debug, Clone)]
pub struct JavapDecompiler {
    program: String,
}

impl JavapDecompiler {
    pub fn new() -> Self {
        Self::with_program("javap")
    }

    /// Use a specific `javap` binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for JavapDecompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompiler for JavapDecompiler {
    fn decompile(&self, file: &SourceFile) -> Result<String> {
        debug!(file = %file.path.display(), program = %self.program, "decompiling");
        let output = Command::new(&self.program)
            .arg("-p")
            .arg(&file.path)
            .output()
            .map_err(|e| ForgeError::Decompile(format!("cannot run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ForgeError::Decompile(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// A decompiler that always fails; used when no JDK is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableDecompiler;

impl Decompiler for UnavailableDecompiler {
    fn decompile(&self, _file: &SourceFile) -> Result<String> {
        Err(ForgeError::Decompile("no decompiler available".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::related::FileOrigin;

    #[test]
    fn test_missing_program_is_a_decompile_error() {
        let decompiler = JavapDecompiler::with_program("promptforge-no-such-javap");
        let file = SourceFile::new("/deps/Foo.class", FileOrigin::Binary);
        let err = decompiler.decompile(&file).unwrap_err();
        assert!(matches!(err, ForgeError::Decompile(_)));
        assert!(err.to_string().contains("cannot run"));
    }

    #[test]
    fn test_unavailable_decompiler() {
        let file = SourceFile::new("/deps/Foo.class", FileOrigin::Binary);
        let err = UnavailableDecompiler.decompile(&file).unwrap_err();
        assert_eq!(err.to_string(), "no decompiler available");
    }
}
