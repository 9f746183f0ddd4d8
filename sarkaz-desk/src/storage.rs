use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sarkaz_core::{DEFAULT_FILE_NAME, SessionStorage, StorageError, StorageKind};

use crate::host::{read_json, with_json_extension, write_json};

/// Session storage on a JSON file, through the host's file commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    path: PathBuf,
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME)
    }
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: with_json_extension(path.as_ref()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait(?Send)]
impl SessionStorage for FileStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::NativeHost
    }

    async fn write(&self, content: &str) -> Result<(), StorageError> {
        write_json(&self.path, content).await?;
        Ok(())
    }

    async fn read(&self) -> Result<String, StorageError> {
        Ok(read_json(&self.path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sarkaz_core::{Counter, Scorekeeper, SessionAction, Squad};

    fn temp_file(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "sarkaz-storage-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn default_file_is_data_json() {
        assert_eq!(FileStorage::default().path(), Path::new("data.json"));
        assert_eq!(FileStorage::new("runs/a").path(), Path::new("runs/a.json"));
    }

    #[tokio::test]
    async fn scorekeeper_round_trips_through_a_file() {
        let path = temp_file("keeper");
        let storage = FileStorage::new(&path);
        let file = storage.path().to_path_buf();
        let mut keeper = Scorekeeper::new(storage);
        keeper.apply(SessionAction::SetSquad {
            squad: Some(Squad::BlueprintSurveyingSquad),
        });
        keeper.apply(SessionAction::SetCounter {
            counter: Counter::Refresh,
            text: "12".to_string(),
        });
        keeper.save().await.unwrap();
        let saved = keeper.session().clone();

        keeper.reset();
        keeper.load().await.unwrap();
        assert_eq!(keeper.session(), &saved);
        assert!(std::fs::read_to_string(&file).unwrap().contains("蓝图测绘分队"));
        let _ = std::fs::remove_file(file);
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let storage = FileStorage::new(temp_file("absent"));
        let err = sarkaz_core::load_session(&storage).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }
}
