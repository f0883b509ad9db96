use super::{ArchiveEntry, EntryKind};
use serde::Serialize;

/// What happened to one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub name: String,
    pub kind: EntryKind,
    pub original_crc32: u32,
    pub original_size: u64,
    /// Hex SHA-256 of the replacement class bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poisoned_sha256: Option<String>,
}

impl EntryRecord {
    pub(crate) fn new(entry: &ArchiveEntry, poisoned_sha256: Option<String>) -> Self {
        Self {
            name: entry.name.clone(),
            kind: entry.kind(),
            original_crc32: entry.crc32,
            original_size: entry.size,
            poisoned_sha256,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub entry_count: usize,
    pub directory_count: usize,
    pub poisoned_count: usize,
    pub copied_count: usize,
}

/// Per-entry outcome of a pass, in archive order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RewriteSummary {
    pub entries: Vec<EntryRecord>,
}

impl RewriteSummary {
    pub fn push(&mut self, record: EntryRecord) {
        self.entries.push(record);
    }

    pub fn stats(&self) -> SummaryStats {
        let mut stats = SummaryStats {
            entry_count: self.entries.len(),
            ..Default::default()
        };
        for record in &self.entries {
            if record.kind.is_rewritten() {
                stats.poisoned_count += 1;
            } else if record.kind == EntryKind::Directory {
                stats.directory_count += 1;
            } else {
                stats.copied_count += 1;
            }
        }
        stats
    }
}
