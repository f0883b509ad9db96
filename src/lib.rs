// Public API exports
pub mod compiler;
pub mod error;
pub mod report;
pub mod rewriter;
pub mod security;
pub mod synth;
pub mod telemetry;
pub mod template;

// Re-export main types for convenience
pub use error::PoisonError;
pub use security::{PathError, PathGuard};

pub use template::{
    PayloadSource, PayloadTemplate, ResolvedPayload, Template, TemplateError, TemplateRegistry,
};

pub use synth::{synthesize, ClassIdentity};

pub use compiler::{ClassCompiler, CompileError, JavacCompiler};

pub use rewriter::{ArchiveRewriter, EntryKind, EntryRecord, RewriteSummary};

pub use report::RunReport;
