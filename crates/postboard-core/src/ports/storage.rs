use async_trait::async_trait;

use crate::domain::Post;
use crate::error::StorageError;

/// Durable storage for the whole post collection.
///
/// The collection is always written as a complete snapshot; there are no
/// partial or incremental writes.
#[async_trait]
pub trait PostStorage: Send + Sync {
    /// Load the stored collection. Missing storage yields an empty collection.
    async fn load(&self) -> Result<Vec<Post>, StorageError>;

    /// Replace the stored collection with `posts`.
    async fn save(&self, posts: &[Post]) -> Result<(), StorageError>;
}
