//! JSON file storage - the whole collection lives in one human-readable file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use postboard_core::domain::Post;
use postboard_core::error::StorageError;
use postboard_core::ports::PostStorage;

/// Stores posts as a pretty-printed JSON array.
///
/// Every save rewrites the file through a temporary sibling followed by a
/// rename, so readers never observe a half-written array.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, err: std::io::Error) -> StorageError {
        StorageError::Io(format!("{}: {}", self.path.display(), err))
    }
}

#[async_trait]
impl PostStorage for JsonFileStorage {
    async fn load(&self) -> Result<Vec<Post>, StorageError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "Posts file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let posts: Vec<Post> = serde_json::from_str(&contents).map_err(|e| {
            StorageError::Serialization(format!("{}: {}", self.path.display(), e))
        })?;

        tracing::debug!(path = %self.path.display(), count = posts.len(), "Loaded posts");
        Ok(posts)
    }

    async fn save(&self, posts: &[Post]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(posts)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let tmp_path = self.tmp_path();
        let mut file = fs::File::create(&tmp_path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.sync_all().await.map_err(|e| self.io_error(e))?;
        drop(file);

        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), count = posts.len(), "Saved posts");
        Ok(())
    }
}
