use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Failed to spawn compiler {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compiler failed on {} with exit code {code:?}:\n{stderr}", .source_file.display())]
    Failed {
        source_file: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Compiled class {} not found: {source}", .path.display())]
    MissingOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
