use axum::{Json, extract::State};

use super::super::SharedState;
use crate::error::Result;
use crate::model::SocialAccount;

/// GET /api/social-accounts - List accounts, seeding the default platforms.
pub(crate) async fn accounts_list(
    State(state): State<SharedState>,
) -> Result<Json<Vec<SocialAccount>>> {
    let accounts = state.accounts.list().await?;
    Ok(Json(accounts))
}
