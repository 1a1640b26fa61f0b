//! Application state - shared across all handlers.

use std::sync::Arc;

use postboard_core::StorageError;
use postboard_core::ports::PostRepository;
use postboard_infra::{JsonFileStorage, PostStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// Open the post store backed by the configured file.
    pub async fn new(config: &AppConfig) -> Result<Self, StorageError> {
        let storage = Arc::new(JsonFileStorage::new(&config.posts_file));
        let store = PostStore::open(storage).await?;

        tracing::info!(posts_file = %config.posts_file.display(), "Application state initialized");

        Ok(Self::with_repository(Arc::new(store)))
    }

    pub fn with_repository(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }
}
