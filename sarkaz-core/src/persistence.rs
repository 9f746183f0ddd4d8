//! Save/load contract for sessions.
//!
//! Hosts provide a [`SessionStorage`] that moves one JSON document in and out;
//! the core owns the codec and the load policy.

use std::cell::RefCell;

use async_trait::async_trait;
use log::info;

use crate::session::Session;

/// Name used when the host does not ask for a file name.
pub const DEFAULT_FILE_NAME: &str = "data.json";

/// Host command that writes the serialized session.
pub const WRITE_COMMAND: &str = "write_json";
/// Host command that returns the serialized session.
pub const READ_COMMAND: &str = "read_json";
/// Error reply a host command gives when the user dismisses its file dialog.
pub const CANCELLED_REPLY: &str = "cancelled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// File access provided by the hosting desktop shell.
    NativeHost,
    /// Browser download for saving, file picker for loading.
    BrowserFallback,
    /// In-process storage, used by tests and tools.
    Memory,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cancelled by the user")]
    Cancelled,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("file could not be read as text: {0}")]
    Encoding(String),
    #[error("host command failed: {0}")]
    Host(String),
    #[error("invalid session snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::Unavailable(err.to_string())
        } else {
            Self::Io(err.to_string())
        }
    }
}

/// A place a serialized session can be written to and read back from.
///
/// Implementations are free to suspend (file pickers, host round-trips); the
/// futures are not required to be `Send` since browser hosts cannot offer that.
#[async_trait(?Send)]
pub trait SessionStorage {
    fn kind(&self) -> StorageKind;

    /// Persist the serialized session.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be written.
    async fn write(&self, content: &str) -> Result<(), StorageError>;

    /// Fetch a previously saved session.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing can be read, including a cancelled picker.
    async fn read(&self) -> Result<String, StorageError>;
}

#[async_trait(?Send)]
impl<T: SessionStorage + ?Sized> SessionStorage for Box<T> {
    fn kind(&self) -> StorageKind {
        (**self).kind()
    }

    async fn write(&self, content: &str) -> Result<(), StorageError> {
        (**self).write(content).await
    }

    async fn read(&self) -> Result<String, StorageError> {
        (**self).read().await
    }
}

/// Single-slot in-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: RefCell<Option<String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `content`, as if it had been saved before.
    #[must_use]
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(content.into())),
        }
    }

    #[must_use]
    pub fn content(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

#[async_trait(?Send)]
impl SessionStorage for MemoryStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Memory
    }

    async fn write(&self, content: &str) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(content.to_string());
        Ok(())
    }

    async fn read(&self) -> Result<String, StorageError> {
        self.slot
            .borrow()
            .clone()
            .ok_or_else(|| StorageError::Unavailable("nothing saved yet".to_string()))
    }
}

/// Serialize and write `session`.
///
/// # Errors
///
/// Returns an error if serialization or the storage write fails.
pub async fn save_session(
    storage: &dyn SessionStorage,
    session: &Session,
) -> Result<(), StorageError> {
    let content = session.to_json()?;
    storage.write(&content).await?;
    info!(
        "session saved ({} bytes, {:?})",
        content.len(),
        storage.kind()
    );
    Ok(())
}

/// Read and decode a session. On any error the caller's state is untouched.
///
/// # Errors
///
/// Returns an error if the storage read fails or the content is not a valid
/// session (unknown catalog labels included).
pub async fn load_session(storage: &dyn SessionStorage) -> Result<Session, StorageError> {
    let content = storage.read().await?;
    let session = Session::from_json(&content)?;
    info!(
        "session loaded ({} bytes, {:?})",
        content.len(),
        storage.kind()
    );
    Ok(session)
}
