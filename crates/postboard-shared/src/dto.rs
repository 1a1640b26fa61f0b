//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to create a post. Missing fields are rejected by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

/// Request to update a post. Only the fields present are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

/// Query string of `GET /api/posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub sort: Option<String>,
    pub direction: Option<String>,
}

/// Query string of `GET /api/posts/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPostsQuery {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

/// Confirmation returned after a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePostResponse {
    pub message: String,
}

impl DeletePostResponse {
    pub fn for_post(id: u64) -> Self {
        Self {
            message: format!("Post with id {id} has been deleted successfully."),
        }
    }
}

/// New like count of a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub id: u64,
    pub likes: u64,
}
