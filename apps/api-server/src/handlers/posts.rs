//! Post handlers - thin adapters between HTTP and the post repository.

use actix_web::{HttpResponse, web};

use postboard_core::DomainError;
use postboard_core::domain::{NewPost, PostOrder, PostPatch, SearchFilter};
use postboard_shared::dto::{
    CreatePostRequest, DeletePostResponse, LikeResponse, ListPostsQuery, SearchPostsQuery,
    UpdatePostRequest,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?sort=&direction=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let order = PostOrder::parse(query.sort.as_deref(), query.direction.as_deref())?;

    let posts = state.posts.list(order).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let new_post = NewPost {
        title: req.title,
        content: req.content,
        author: req.author,
        date: req.date,
    };

    let post = state.posts.create(new_post).await?;
    tracing::info!(post_id = post.id, "Post created");
    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts/search?title=&content=&author=&date=
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<SearchPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let filter = SearchFilter::from_params(
        query.title.as_deref(),
        query.content.as_deref(),
        query.author.as_deref(),
        query.date.as_deref(),
    );

    let posts = state.posts.search(filter).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::post_not_found(id))?;

    Ok(HttpResponse::Ok().json(post))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let patch = PostPatch {
        title: req.title,
        content: req.content,
        author: req.author,
        date: req.date,
    };

    let post = state.posts.update(path.into_inner(), patch).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> AppResult<HttpResponse> {
    let post = state.posts.delete(path.into_inner()).await?;
    tracing::info!(post_id = post.id, "Post deleted");
    Ok(HttpResponse::Ok().json(DeletePostResponse::for_post(post.id)))
}

/// POST /api/posts/{id}/like
pub async fn like_post(state: web::Data<AppState>, path: web::Path<u64>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let likes = state.posts.increment_likes(id).await?;
    Ok(HttpResponse::Ok().json(LikeResponse { id, likes }))
}
