//! File commands the desktop host exposes to the page: `write_json` and
//! `read_json`, both working on a single JSON file.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use sarkaz_core::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid UTF-8", .0.display())]
    NotText(PathBuf),
}

impl From<HostError> for StorageError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::NotFound(_) => Self::Unavailable(err.to_string()),
            HostError::Io { .. } => Self::Io(err.to_string()),
            HostError::NotText(_) => Self::Encoding(err.to_string()),
        }
    }
}

/// The path with a `.json` extension: kept when already present (any case),
/// appended otherwise.
#[must_use]
pub fn with_json_extension(path: &Path) -> PathBuf {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".json");
    PathBuf::from(name)
}

/// Write `content` to `path`, creating parent directories as needed.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub async fn write_json(path: &Path, content: &str) -> Result<PathBuf, HostError> {
    let path = with_json_extension(path);
    let io_error = |source| HostError::Io {
        path: path.clone(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(&path, content).await.map_err(io_error)?;
    debug!("wrote {} bytes to {}", content.len(), path.display());
    Ok(path)
}

/// Read the JSON file at `path`.
///
/// # Errors
/// Returns `NotFound` for a missing file, `NotText` for non UTF-8 content.
pub async fn read_json(path: &Path) -> Result<String, HostError> {
    let path = with_json_extension(path);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(HostError::NotFound(path));
        }
        Err(source) => return Err(HostError::Io { path, source }),
    };
    debug!("read {} bytes from {}", bytes.len(), path.display());
    String::from_utf8(bytes).map_err(|_| HostError::NotText(path))
}
