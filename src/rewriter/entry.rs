use crate::synth::CLASS_SUFFIX;
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime};

/// Reserved per-directory metadata class, never poisoned
pub const PACKAGE_METADATA_CLASS: &str = "package-info.class";

/// How an archive entry is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Directory,
    PackageMetadataClass,
    PoisonableClass,
    Other,
}

impl EntryKind {
    /// Classify an entry by name and directory flag
    pub fn classify(name: &str, is_dir: bool) -> Self {
        if is_dir {
            return Self::Directory;
        }
        if !name.ends_with(CLASS_SUFFIX) {
            return Self::Other;
        }

        let file_name = name.rsplit('/').next().unwrap_or(name);
        if file_name == PACKAGE_METADATA_CLASS {
            Self::PackageMetadataClass
        } else {
            Self::PoisonableClass
        }
    }

    /// Whether the output bytes differ from the input
    pub fn is_rewritten(self) -> bool {
        self == Self::PoisonableClass
    }
}

/// Metadata for a single entry of the input archive
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Entry name exactly as stored (e.g., "com/x/Foo.class")
    pub name: String,
    pub is_dir: bool,
    pub compression: CompressionMethod,
    pub last_modified: Option<DateTime>,
    pub unix_mode: Option<u32>,
    /// CRC-32 of the uncompressed original contents
    pub crc32: u32,
    /// Uncompressed original size in bytes
    pub size: u64,
}

impl ArchiveEntry {
    pub fn kind(&self) -> EntryKind {
        EntryKind::classify(&self.name, self.is_dir)
    }

    /// Options that recreate this entry's timestamp and mode
    ///
    /// Stored entries stay stored; everything else is written deflated.
    pub fn write_options(&self) -> SimpleFileOptions {
        let method = match self.compression {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };

        let mut options = SimpleFileOptions::default().compression_method(method);
        if let Some(modified) = self.last_modified {
            options = options.last_modified_time(modified);
        }
        if let Some(mode) = self.unix_mode {
            options = options.unix_permissions(mode);
        }
        options
    }
}
