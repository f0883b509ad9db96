use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Path {} is not in safe directory {}", .path.display(), .root.display())]
    Escape { path: PathBuf, root: PathBuf },

    #[error("Safe directory {} is unavailable: {source}", .root.display())]
    RootUnavailable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
