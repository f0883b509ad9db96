use crate::compiler::CompileError;
use crate::security::PathError;
use crate::template::TemplateError;
use thiserror::Error;

/// Every way a poisoning run can fail. None are recovered locally.
#[derive(Error, Debug)]
pub enum PoisonError {
    #[error("Usage error: {0}")]
    Usage(String),

    #[error(transparent)]
    PathEscape(#[from] PathError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Failed to process archive: {0}")]
    ArchiveFormat(#[from] zip::result::ZipError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PoisonError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
