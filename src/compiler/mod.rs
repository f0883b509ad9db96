mod error;

pub use error::CompileError;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Turns a synthesized source file into a loadable class file.
///
/// The compiled class is expected next to the source, named after it with a
/// `.class` suffix. Callers only pass paths that already passed the path
/// guard. The call blocks until the toolchain exits.
pub trait ClassCompiler {
    fn compile(&self, source_file: &Path, working_dir: &Path) -> Result<(), CompileError>;
}

impl<C: ClassCompiler + ?Sized> ClassCompiler for &C {
    fn compile(&self, source_file: &Path, working_dir: &Path) -> Result<(), CompileError> {
        (**self).compile(source_file, working_dir)
    }
}

/// `javac` invoked as a subprocess
#[derive(Debug, Clone)]
pub struct JavacCompiler {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl JavacCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments passed before the source path (e.g. `--release 8`)
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Default for JavacCompiler {
    fn default() -> Self {
        Self::new("javac")
    }
}

impl ClassCompiler for JavacCompiler {
    fn compile(&self, source_file: &Path, working_dir: &Path) -> Result<(), CompileError> {
        debug!(
            program = %self.program.display(),
            source = %source_file.display(),
            "Invoking compiler"
        );

        let output = Command::new(&self.program)
            .args(&self.extra_args)
            .arg(source_file)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| CompileError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(source = %source_file.display(), "Compiler error output:\n{}", stderr);
            return Err(CompileError::Failed {
                source_file: source_file.to_path_buf(),
                code: output.status.code(),
                stderr,
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            debug!("Compiler output:\n{}", stderr);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_spawn_error() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("A.java");
        std::fs::write(&source, "public class A {}").unwrap();

        let compiler = JavacCompiler::new(temp.path().join("no-such-javac"));
        let result = compiler.compile(&source, temp.path());
        assert!(matches!(result, Err(CompileError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("A.java");
        std::fs::write(&source, "public class A {}").unwrap();

        let compiler = JavacCompiler::new("false");
        match compiler.compile(&source, temp.path()) {
            Err(CompileError::Failed { code, .. }) => assert_eq!(code, Some(1)),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_extra_args_precede_source() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("A.java");
        std::fs::write(&source, "exit 3").unwrap();

        // Running the file itself as a script would exit 3
        let compiler = JavacCompiler::new("sh").with_args(["-c", "test -f \"$0\""]);
        assert!(compiler.compile(&source, temp.path()).is_ok());
    }
}
