use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostOrder, PostPatch, SearchFilter};
use crate::error::DomainError;

/// Post repository - owns the post collection and every rule applied to it.
///
/// Implementations serialize mutations: each call observes the effects of all
/// calls that completed before it.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Validate and store a new post, assigning its id.
    async fn create(&self, new_post: NewPost) -> Result<Post, DomainError>;

    /// All posts, in insertion order unless an ordering is given.
    async fn list(&self, order: Option<PostOrder>) -> Result<Vec<Post>, DomainError>;

    /// Find a post by its id.
    async fn find_by_id(&self, id: u64) -> Result<Option<Post>, DomainError>;

    /// Overwrite the fields present in `patch`.
    async fn update(&self, id: u64, patch: PostPatch) -> Result<Post, DomainError>;

    /// Remove a post permanently, returning it.
    async fn delete(&self, id: u64) -> Result<Post, DomainError>;

    /// Posts matching the filter, in insertion order. No filter matches nothing.
    async fn search(&self, filter: Option<SearchFilter>) -> Result<Vec<Post>, DomainError>;

    /// Add one like and return the new count.
    async fn increment_likes(&self, id: u64) -> Result<u64, DomainError>;
}
