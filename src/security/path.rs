use super::PathError;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Confines filesystem side effects to a single working root.
///
/// Every path is canonicalized before it is compared against the root:
/// `.` and `..` segments are folded and any existing prefix of the path is
/// resolved through the filesystem, so symlinks inside the root cannot be
/// used to point outside of it. Components that do not exist yet (a source
/// file about to be written) are appended lexically.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for an existing directory
    pub fn new(root: impl AsRef<Path>) -> Result<Self, PathError> {
        let root = root.as_ref();
        let canonical = fs::canonicalize(root).map_err(|source| PathError::RootUnavailable {
            root: root.to_path_buf(),
            source,
        })?;
        Ok(Self { root: canonical })
    }

    /// The canonical root every resolved path must stay under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a path relative to the root (absolute paths are taken as-is)
    /// and verify that it lies strictly inside the root.
    ///
    /// The root itself is not "inside" the root and is rejected.
    pub fn resolve(&self, requested: impl AsRef<Path>) -> Result<PathBuf, PathError> {
        let joined = self.root.join(requested.as_ref());
        let resolved = canonicalize_lenient(&joined);

        if resolved == self.root || !resolved.starts_with(&self.root) {
            return Err(PathError::Escape {
                path: resolved,
                root: self.root.clone(),
            });
        }

        Ok(resolved)
    }

    /// Resolve through [`PathGuard::resolve`] and create the directory
    /// (and any missing parents).
    pub fn create_dir_all(&self, requested: impl AsRef<Path>) -> Result<PathBuf, PathError> {
        let dir = self.resolve(requested)?;
        fs::create_dir_all(&dir).map_err(|source| PathError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }
}

/// Canonicalize as much of `path` as exists, folding the rest lexically.
fn canonicalize_lenient(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
            Component::CurDir => continue,
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(part) => {
                resolved.push(part);
                // Follow symlinks for the part that already exists
                if let Ok(real) = fs::canonicalize(&resolved) {
                    resolved = real;
                }
            }
        }
    }

    resolved
}
