//! Content drafting handler.

use axum::{Json, extract::State};

use super::super::SharedState;
use super::super::extract::ApiJson;
use crate::error::Result;
use crate::model::{ContentGenerateRequest, GeneratedContent};

/// POST /api/content/generate - Draft copy through the text-generation provider.
pub(crate) async fn content_generate(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<ContentGenerateRequest>,
) -> Result<Json<GeneratedContent>> {
    let generated = state.content.generate(request).await?;
    Ok(Json(generated))
}
