use crate::rewriter::{RewriteSummary, SummaryStats};
use crate::template::ResolvedPayload;
use crate::PoisonError;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Machine-readable record of one successful run
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub created_at: String,
    pub generator: String,
    pub input: String,
    pub output: String,
    pub payload: PayloadInfo,
    pub stats: SummaryStats,
    pub entries: RewriteSummary,
}

#[derive(Debug, Serialize)]
pub struct PayloadInfo {
    pub origin: String,
    pub sha256: String,
    pub size_bytes: usize,
}

impl RunReport {
    pub fn new(
        input: &Path,
        output: &Path,
        payload: &ResolvedPayload,
        summary: RewriteSummary,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now().to_rfc3339(),
            generator: format!("jarpoison v{}", env!("CARGO_PKG_VERSION")),
            input: input.display().to_string(),
            output: output.display().to_string(),
            payload: PayloadInfo {
                origin: payload.origin().to_string(),
                sha256: payload.sha256(),
                size_bytes: payload.body().len(),
            },
            stats: summary.stats(),
            entries: summary,
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn write_to_file(&self, path: &Path) -> Result<(), PoisonError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            PoisonError::io("Failed to serialize run report", std::io::Error::other(e))
        })?;
        fs::write(path, json)
            .map_err(|e| PoisonError::io(format!("Failed to write {}", path.display()), e))
    }
}
