// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use super::body::JsonBody;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        CommentRequest, CreatePostRequest, LikesResponse, MessageResponse, PostListResponse,
        PostResponse,
    },
    social::{engagement, feed},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    responses((status = 200, description = "All posts, newest first", body = PostListResponse))
)]
pub async fn all_posts(State(state): State<AppState>) -> Result<Json<PostListResponse>, ApiError> {
    let posts = feed::all_posts(&state)?;
    Ok(Json(PostListResponse::new(
        Some("Posts fetched successfully!"),
        posts,
    )))
}

#[utoipa::path(
    get,
    path = "/api/posts/following",
    tag = "Posts",
    responses(
        (status = 200, description = "Posts by followed users, newest first", body = PostListResponse),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn following_posts(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<PostListResponse>, ApiError> {
    let posts = feed::following_posts(&state, &user.user_id)?;
    Ok(Json(PostListResponse::new(None, posts)))
}

#[utoipa::path(
    get,
    path = "/api/posts/likes/{id}",
    params(("id" = String, Path, description = "User whose liked posts to list")),
    tag = "Posts",
    responses(
        (status = 200, description = "Posts liked by the user", body = PostListResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn liked_posts(
    Auth(_user): Auth,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PostListResponse>, ApiError> {
    let posts = feed::liked_posts(&state, &user_id)?;
    Ok(Json(PostListResponse::new(
        Some("Retrieve liked posts successfully!"),
        posts,
    )))
}

#[utoipa::path(
    get,
    path = "/api/posts/user/{username}",
    params(("username" = String, Path, description = "Author username")),
    tag = "Posts",
    responses(
        (status = 200, description = "Posts by the user, newest first", body = PostListResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_posts(
    Auth(_user): Auth,
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PostListResponse>, ApiError> {
    let posts = feed::user_posts(&state, &username)?;
    Ok(Json(PostListResponse::new(None, posts)))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    tag = "Posts",
    responses(
        (status = 200, description = "Post created", body = PostResponse),
        (status = 400, description = "Post has neither text nor image")
    )
)]
pub async fn create_post(
    Auth(user): Auth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = engagement::create_post(&state, &user.user_id, request).await?;
    Ok(Json(PostResponse::new("Post created successfully!", post)))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = String, Path, description = "Post to like or unlike")),
    tag = "Posts",
    responses(
        (status = 200, description = "Like toggled; liker ids after the change", body = LikesResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn like_post(
    Auth(user): Auth,
    Path(post_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LikesResponse>, ApiError> {
    let (outcome, likes) = engagement::toggle_like(&state, &user.user_id, &post_id)?;
    Ok(Json(LikesResponse::new(outcome.message(), likes)))
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/comment",
    params(("id" = String, Path, description = "Post to comment on")),
    request_body = CommentRequest,
    tag = "Posts",
    responses(
        (status = 200, description = "Comment added", body = PostResponse),
        (status = 400, description = "Missing text"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn comment_on_post(
    Auth(user): Auth,
    Path(post_id): Path<String>,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CommentRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = engagement::comment(&state, &user.user_id, &post_id, request.text)?;
    Ok(Json(PostResponse::new("Comment added successfully!", post)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post to delete")),
    tag = "Posts",
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 401, description = "Caller does not own the post"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    Auth(user): Auth,
    Path(post_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    engagement::delete_post(&state, &user.user_id, &post_id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully!")))
}
