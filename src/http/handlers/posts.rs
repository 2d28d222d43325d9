//! Social post handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use super::super::SharedState;
use super::super::extract::{ApiJson, ApiQuery};
use super::super::types::MessageResponse;
use crate::error::Result;
use crate::model::{SocialPost, SocialPostCreate};
use crate::query::PostQuery;

/// POST /api/posts - Create a post.
pub(crate) async fn posts_create(
    State(state): State<SharedState>,
    ApiJson(input): ApiJson<SocialPostCreate>,
) -> Result<Json<SocialPost>> {
    let post = state.posts.create(input).await?;
    Ok(Json(post))
}

/// GET /api/posts - List posts newest first, optionally filtered by platform and status.
pub(crate) async fn posts_list(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<PostQuery>,
) -> Result<Json<Vec<SocialPost>>> {
    let posts = state.posts.list(&query).await?;
    Ok(Json(posts))
}

/// DELETE /api/posts/{id} - Delete a post.
pub(crate) async fn posts_delete(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.posts.delete(&id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
