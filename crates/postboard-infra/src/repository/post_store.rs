//! The post store - in-memory collection with snapshot persistence.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use postboard_core::domain::{NewPost, Post, PostOrder, PostPatch, SearchFilter};
use postboard_core::error::{DomainError, StorageError};
use postboard_core::ports::{PostRepository, PostStorage};

struct Collection {
    posts: Vec<Post>,
    /// Highest id ever held by this collection, so deleted ids are not handed out again.
    last_id: u64,
}

/// Post repository backed by a [`PostStorage`] snapshot.
///
/// The collection is loaded once by [`PostStore::open`] and written back in
/// full after every mutation. A single async mutex covers the read, the
/// mutation and the write, so concurrent requests cannot interleave.
///
/// A failed write is logged and the mutation is kept in memory; the next
/// successful write brings storage back in line.
pub struct PostStore {
    collection: Mutex<Collection>,
    storage: Arc<dyn PostStorage>,
}

impl PostStore {
    /// Load the collection from `storage`.
    pub async fn open(storage: Arc<dyn PostStorage>) -> Result<Self, StorageError> {
        let posts = storage.load().await?;
        warn_on_invalid_posts(&posts);
        tracing::info!(count = posts.len(), "Post store opened");
        Ok(Self::with_posts(posts, storage))
    }

    fn with_posts(posts: Vec<Post>, storage: Arc<dyn PostStorage>) -> Self {
        let last_id = posts.iter().map(|p| p.id).max().unwrap_or(0);
        Self {
            collection: Mutex::new(Collection { posts, last_id }),
            storage,
        }
    }

    async fn persist(&self, posts: &[Post]) {
        if let Err(e) = self.storage.save(posts).await {
            tracing::error!(error = %e, "Failed to persist posts, keeping in-memory state");
        }
    }
}

/// Ids held by more than one post, in ascending order.
fn duplicate_ids(posts: &[Post]) -> Vec<u64> {
    let mut seen = HashSet::new();
    let duplicates: BTreeSet<u64> = posts
        .iter()
        .map(|p| p.id)
        .filter(|id| !seen.insert(*id))
        .collect();
    duplicates.into_iter().collect()
}

/// Loaded posts are kept as-is; invariant violations from a hand-edited file are only reported.
fn warn_on_invalid_posts(posts: &[Post]) {
    for id in duplicate_ids(posts) {
        tracing::warn!(post_id = id, "Duplicate post id in storage");
    }
    for post in posts {
        if post.title.is_empty() || post.content.is_empty() || post.author.is_empty() {
            tracing::warn!(post_id = post.id, "Stored post has empty required fields");
        }
    }
}

impl Collection {
    fn position(&self, id: u64) -> Result<usize, DomainError> {
        self.posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DomainError::post_not_found(id))
    }
}

#[async_trait]
impl PostRepository for PostStore {
    async fn create(&self, new_post: NewPost) -> Result<Post, DomainError> {
        let mut collection = self.collection.lock().await;

        let id = collection
            .last_id
            .checked_add(1)
            .ok_or_else(|| DomainError::Internal("post id space exhausted".to_string()))?;
        let post = new_post.into_post(id)?;
        collection.last_id = post.id;
        collection.posts.push(post.clone());

        tracing::debug!(post_id = post.id, "Post created");
        self.persist(&collection.posts).await;
        Ok(post)
    }

    async fn list(&self, order: Option<PostOrder>) -> Result<Vec<Post>, DomainError> {
        let mut posts = self.collection.lock().await.posts.clone();
        if let Some(order) = order {
            order.sort(&mut posts);
        }
        Ok(posts)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Post>, DomainError> {
        let collection = self.collection.lock().await;
        Ok(collection.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: u64, patch: PostPatch) -> Result<Post, DomainError> {
        let mut collection = self.collection.lock().await;

        let index = collection.position(id)?;
        patch.apply(&mut collection.posts[index])?;
        let post = collection.posts[index].clone();

        tracing::debug!(post_id = id, "Post updated");
        self.persist(&collection.posts).await;
        Ok(post)
    }

    async fn delete(&self, id: u64) -> Result<Post, DomainError> {
        let mut collection = self.collection.lock().await;

        let index = collection.position(id)?;
        let post = collection.posts.remove(index);

        tracing::debug!(post_id = id, "Post deleted");
        self.persist(&collection.posts).await;
        Ok(post)
    }

    async fn search(&self, filter: Option<SearchFilter>) -> Result<Vec<Post>, DomainError> {
        let Some(filter) = filter else {
            return Ok(Vec::new());
        };

        let collection = self.collection.lock().await;
        Ok(collection
            .posts
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn increment_likes(&self, id: u64) -> Result<u64, DomainError> {
        let mut collection = self.collection.lock().await;

        let index = collection.position(id)?;
        let post = &mut collection.posts[index];
        post.likes = post
            .likes
            .checked_add(1)
            .ok_or_else(|| DomainError::Internal(format!("like counter of post {id} overflowed")))?;
        let likes = post.likes;

        tracing::debug!(post_id = id, likes, "Post liked");
        self.persist(&collection.posts).await;
        Ok(likes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonFileStorage;
    use tempfile::TempDir;

    fn new_post(title: &str, content: &str, author: &str, date: &str) -> NewPost {
        NewPost {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            author: Some(author.to_string()),
            date: Some(date.to_string()),
        }
    }

    async fn open_store(dir: &TempDir) -> PostStore {
        let storage = Arc::new(JsonFileStorage::new(dir.path().join("posts.json")));
        PostStore::open(storage).await.unwrap()
    }

    async fn seeded_store(dir: &TempDir) -> PostStore {
        let store = open_store(dir).await;
        store
            .create(new_post("First post", "This is the first post.", "Ada", "2024-01-10"))
            .await
            .unwrap();
        store
            .create(new_post("Second post", "This is the second post.", "Grace", "2023-06-01"))
            .await
            .unwrap();
        store
            .create(new_post("another post", "More words.", "Linus", "2024-12-24"))
            .await
            .unwrap();
        store
    }

    struct FailingStorage;

    #[async_trait]
    impl PostStorage for FailingStorage {
        async fn load(&self) -> Result<Vec<Post>, StorageError> {
            Ok(Vec::new())
        }

        async fn save(&self, _posts: &[Post]) -> Result<(), StorageError> {
            Err(StorageError::Io("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let first = store
            .create(new_post("A", "a", "me", "2024-01-01"))
            .await
            .unwrap();
        let second = store
            .create(new_post("B", "b", "me", "2024-01-02"))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.likes, 0);
        assert_eq!(second.date_text(), "2024-01-02");
    }

    #[tokio::test]
    async fn test_create_continues_after_loaded_max_id() {
        let dir = TempDir::new().unwrap();
        {
            let store = seeded_store(&dir).await;
            store.delete(2).await.unwrap();
        }

        let store = open_store(&dir).await;
        let post = store
            .create(new_post("D", "d", "me", "2024-01-01"))
            .await
            .unwrap();
        assert_eq!(post.id, 4);
    }

    #[tokio::test]
    async fn test_deleted_max_id_is_not_reused() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        store.delete(3).await.unwrap();
        let post = store
            .create(new_post("D", "d", "me", "2024-01-01"))
            .await
            .unwrap();
        assert_eq!(post.id, 4);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_without_storing() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let mut missing = new_post("A", "a", "me", "2024-01-01");
        missing.content = None;
        assert!(matches!(
            store.create(missing).await,
            Err(DomainError::Validation(_))
        ));

        let bad_date = new_post("A", "a", "me", "not-a-date");
        assert!(matches!(
            store.create(bad_date).await,
            Err(DomainError::Validation(_))
        ));

        assert!(store.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_sorted_by_title_desc() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let order = PostOrder::parse(Some("title"), Some("desc")).unwrap();
        let posts = store.list(order).await.unwrap();
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();

        assert_eq!(titles, vec!["another post", "Second post", "First post"]);
    }

    #[tokio::test]
    async fn test_list_without_order_keeps_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let ids: Vec<u64> = store.list(None).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let patch = PostPatch {
            content: Some("x".to_string()),
            ..Default::default()
        };
        let post = store.update(1, patch).await.unwrap();

        assert_eq!(post.content, "x");
        assert_eq!(post.title, "First post");
        assert_eq!(post.author, "Ada");
        assert_eq!(post.date_text(), "2024-01-10");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let err = store.update(42, PostPatch::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { id: 42, .. }));
    }

    #[tokio::test]
    async fn test_update_with_bad_date_commits_nothing() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let patch = PostPatch {
            title: Some("Changed".to_string()),
            date: Some("2024-13-01".to_string()),
            ..Default::default()
        };
        assert!(store.update(1, patch).await.is_err());

        let post = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(post.title, "First post");
    }

    #[tokio::test]
    async fn test_delete_then_find_and_delete_again() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let deleted = store.delete(2).await.unwrap();
        assert_eq!(deleted.id, 2);
        assert!(store.find_by_id(2).await.unwrap().is_none());
        assert!(matches!(
            store.delete(2).await,
            Err(DomainError::NotFound { id: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_search_title_ignores_case() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        let filter = SearchFilter::from_params(Some("FIRST POST"), None, None, None);
        let posts = store.search(filter).await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 1);
    }

    #[tokio::test]
    async fn test_search_applies_only_first_filter() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        // The content filter would match post 2, but the title filter wins.
        let filter = SearchFilter::from_params(
            Some("no such title"),
            Some("This is the second post."),
            None,
            None,
        );
        assert!(store.search(filter).await.unwrap().is_empty());

        let filter = SearchFilter::from_params(None, None, Some("grace"), None);
        let posts = store.search(filter).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 2);
    }

    #[tokio::test]
    async fn test_search_without_filter_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;
        assert!(store.search(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_increment_likes_twice() {
        let dir = TempDir::new().unwrap();
        let store = seeded_store(&dir).await;

        assert_eq!(store.increment_likes(1).await.unwrap(), 1);
        assert_eq!(store.increment_likes(1).await.unwrap(), 2);
        assert!(matches!(
            store.increment_likes(99).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_reload_yields_identical_posts() {
        let dir = TempDir::new().unwrap();
        let before = {
            let store = seeded_store(&dir).await;
            store.increment_likes(3).await.unwrap();
            store
                .update(
                    2,
                    PostPatch {
                        author: Some("Hopper".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            store.list(None).await.unwrap()
        };

        let reopened = open_store(&dir).await;
        assert_eq!(reopened.list(None).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_mutation_in_memory() {
        let store = PostStore::open(Arc::new(FailingStorage)).await.unwrap();

        let post = store
            .create(new_post("A", "a", "me", "2024-01-01"))
            .await
            .unwrap();
        assert_eq!(store.increment_likes(post.id).await.unwrap(), 1);
        assert_eq!(store.list(None).await.unwrap().len(), 1);
    }

    async fn store_from_file(dir: &TempDir, posts: serde_json::Value) -> PostStore {
        let path = dir.path().join("posts.json");
        std::fs::write(&path, posts.to_string()).unwrap();
        PostStore::open(Arc::new(JsonFileStorage::new(path)))
            .await
            .unwrap()
    }

    fn stored_post(id: u64, likes: u64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": "Stored",
            "content": "From disk",
            "author": "Ada",
            "date": "2024-01-01",
            "likes": likes,
        })
    }

    #[tokio::test]
    async fn test_create_after_max_id_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_from_file(&dir, serde_json::json!([stored_post(u64::MAX, 0)])).await;

        let err = store
            .create(new_post("A", "a", "me", "2024-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
        assert_eq!(store.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_like_at_max_count_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_from_file(&dir, serde_json::json!([stored_post(1, u64::MAX)])).await;

        assert!(matches!(
            store.increment_likes(1).await,
            Err(DomainError::Internal(_))
        ));
        let post = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(post.likes, u64::MAX);
    }

    #[tokio::test]
    async fn test_open_keeps_posts_with_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let store = store_from_file(
            &dir,
            serde_json::json!([stored_post(2, 0), stored_post(2, 1), stored_post(1, 0)]),
        )
        .await;

        assert_eq!(store.list(None).await.unwrap().len(), 3);
        let post = store
            .create(new_post("A", "a", "me", "2024-01-01"))
            .await
            .unwrap();
        assert_eq!(post.id, 3);
    }

    #[test]
    fn test_duplicate_ids_reports_each_once() {
        let posts: Vec<Post> = serde_json::from_value(serde_json::json!([
            stored_post(3, 0),
            stored_post(1, 0),
            stored_post(3, 0),
            stored_post(3, 0),
            stored_post(1, 0),
            stored_post(2, 0),
        ]))
        .unwrap();

        assert_eq!(duplicate_ids(&posts), vec![1, 3]);
        assert!(duplicate_ids(&posts[..2]).is_empty());
    }
}
