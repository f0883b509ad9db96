//! The poisoning pass over a class archive.

mod directory;
mod entry;
mod summary;


pub use directory::declared_entry_count;
pub use entry::{ArchiveEntry, EntryKind, PACKAGE_METADATA_CLASS};
pub use summary::{EntryRecord, RewriteSummary, SummaryStats};

use crate::compiler::{ClassCompiler, CompileError};
use crate::security::PathGuard;
use crate::synth::{synthesize, ClassIdentity};
use crate::template::ResolvedPayload;
use crate::PoisonError;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::result::ZipError;
use zip::{ZipArchive, ZipWriter};

/// Prefix of the per-run scratch directory
pub const SCRATCH_PREFIX: &str = "jarpoison-";

/// Rewrites archives so every general class carries the payload
pub struct ArchiveRewriter<'a, C> {
    payload: &'a ResolvedPayload,
    compiler: C,
}

impl<'a, C: ClassCompiler> ArchiveRewriter<'a, C> {
    pub fn new(payload: &'a ResolvedPayload, compiler: C) -> Self {
        Self { payload, compiler }
    }

    /// Poison `input` into `output`.
    ///
    /// A fresh scratch directory is created for the run and removed when it
    /// ends. The output file is removed again if the pass fails.
    pub fn rewrite_file(&self, input: &Path, output: &Path) -> Result<RewriteSummary, PoisonError> {
        info!(input = %input.display(), output = %output.display(), "Poisoning archive");

        if is_same_file(input, output) {
            return Err(PoisonError::Usage(format!(
                "Input and output are the same file: {}",
                input.display()
            )));
        }

        let reader = File::open(input)
            .map_err(|e| PoisonError::io(format!("Failed to open {}", input.display()), e))?;
        // Validate the input before anything is created on disk
        let archive = open_archive(BufReader::new(reader))?;

        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir()
            .map_err(|e| PoisonError::io("Failed to create scratch directory", e))?;
        let guard = PathGuard::new(scratch.path())?;
        debug!(scratch = %guard.root().display(), "Created scratch directory");

        let file = File::create(output)
            .map_err(|e| PoisonError::io(format!("Failed to create {}", output.display()), e))?;
        let pending = PendingOutput::new(output);

        let (writer, summary) = self.rewrite_archive(archive, BufWriter::new(file), &guard)?;
        writer
            .into_inner()
            .map_err(|e| PoisonError::io("Failed to flush output archive", e.into_error()))?;
        pending.commit();

        let stats = summary.stats();
        info!(
            entries = stats.entry_count,
            poisoned = stats.poisoned_count,
            copied = stats.copied_count,
            directories = stats.directory_count,
            "Finished poisoning archive"
        );

        Ok(summary)
    }

    /// Poison an archive between arbitrary streams, compiling inside
    /// `scratch`. Returns the finished output stream.
    pub fn rewrite_streams<R, W>(
        &self,
        input: R,
        output: W,
        scratch: &Path,
    ) -> Result<(W, RewriteSummary), PoisonError>
    where
        R: Read + Seek,
        W: Write + Seek,
    {
        let archive = open_archive(input)?;
        let guard = PathGuard::new(scratch)?;
        self.rewrite_archive(archive, output, &guard)
    }

    fn rewrite_archive<R, W>(
        &self,
        mut archive: ZipArchive<R>,
        output: W,
        guard: &PathGuard,
    ) -> Result<(W, RewriteSummary), PoisonError>
    where
        R: Read + Seek,
        W: Write + Seek,
    {
        let mut writer = ZipWriter::new(output);
        let mut summary = RewriteSummary::default();

        for index in 0..archive.len() {
            let entry = {
                let file = archive.by_index_raw(index)?;
                ArchiveEntry {
                    name: file.name().to_string(),
                    is_dir: file.is_dir(),
                    compression: file.compression(),
                    last_modified: file.last_modified(),
                    unix_mode: file.unix_mode(),
                    crc32: file.crc32(),
                    size: file.size(),
                }
            };

            let record = match entry.kind() {
                EntryKind::Directory => {
                    info!(entry = %entry.name, "Dir");
                    writer.add_directory(entry.name.as_str(), entry.write_options())?;
                    EntryRecord::new(&entry, None)
                }
                EntryKind::PoisonableClass => {
                    info!(entry = %entry.name, "Poisoning");
                    let identity = ClassIdentity::from_entry_name(&entry.name);
                    let bytes = self.poison_class(&identity, guard)?;
                    let digest = hex::encode(Sha256::digest(&bytes));

                    writer.start_file(entry.name.as_str(), entry.write_options())?;
                    writer.write_all(&bytes).map_err(|e| {
                        PoisonError::io(format!("Failed to write {}", entry.name), e)
                    })?;
                    EntryRecord::new(&entry, Some(digest))
                }
                EntryKind::PackageMetadataClass | EntryKind::Other => {
                    info!(entry = %entry.name, "Copying");
                    writer.raw_copy_file(archive.by_index_raw(index)?)?;
                    EntryRecord::new(&entry, None)
                }
            };

            summary.push(record);
        }

        let output = writer.finish()?;
        Ok((output, summary))
    }

    /// Synthesize, compile and read back the replacement for one class
    fn poison_class(
        &self,
        identity: &ClassIdentity,
        guard: &PathGuard,
    ) -> Result<Vec<u8>, PoisonError> {
        if !identity.is_default_package() {
            guard.create_dir_all(identity.package_dir())?;
        }

        let source_path = guard.resolve(identity.source_path())?;
        let source = synthesize(identity, self.payload.body());
        fs::write(&source_path, source).map_err(|e| {
            PoisonError::io(format!("Failed to write {}", source_path.display()), e)
        })?;

        self.compiler.compile(&source_path, guard.root())?;

        let class_path = guard.resolve(identity.class_path())?;
        let bytes = fs::read(&class_path).map_err(|source| CompileError::MissingOutput {
            path: class_path.clone(),
            source,
        })?;

        debug!(class = %identity, bytes = bytes.len(), "Compiled replacement class");
        Ok(bytes)
    }
}

/// Open an archive, refusing inputs whose central directory holds entries
/// the reader would not enumerate (duplicate names collapse to one).
fn open_archive<R: Read + Seek>(mut input: R) -> Result<ZipArchive<R>, PoisonError> {
    let declared = declared_entry_count(&mut input).map_err(ZipError::Io)?;
    input.rewind().map_err(ZipError::Io)?;

    let archive = ZipArchive::new(input)?;
    if declared != archive.len() as u64 {
        return Err(ZipError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "central directory declares {} entries but only {} are addressable (duplicate entry names?)",
                declared,
                archive.len()
            ),
        ))
        .into());
    }

    Ok(archive)
}

/// Output file that is deleted on drop unless committed
struct PendingOutput {
    path: PathBuf,
    committed: bool,
}

impl PendingOutput {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PendingOutput {
    fn drop(&mut self) {
        if !self.committed {
            debug!(path = %self.path.display(), "Removing partial output");
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
