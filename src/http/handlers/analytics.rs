use axum::{Json, extract::State};

use super::super::SharedState;
use crate::error::Result;
use crate::model::AnalyticsData;

/// GET /api/analytics - Post count plus placeholder engagement figures.
pub(crate) async fn analytics_get(State(state): State<SharedState>) -> Result<Json<AnalyticsData>> {
    let summary = state.analytics.summary().await?;
    Ok(Json(summary))
}
