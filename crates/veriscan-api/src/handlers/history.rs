//! Read-only history and lookup handlers. No authorization: any caller may
//! read any record.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::HttpAppError;
use crate::state::AppState;
use veriscan_core::models::{DetectionRecord, HistoryResponse};
use veriscan_core::AppError;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    10
}

/// `GET /history?limit=&offset=`: most recent first; `total` is the full
/// row count regardless of pagination.
pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, HttpAppError> {
    let limit = query.limit.max(0);
    let offset = query.offset.max(0);

    let results = state.detections.list(limit, offset).await?;
    let total = state.detections.count().await?;

    Ok(Json(HistoryResponse { results, total }))
}

/// `GET /result/{id}`: full record, or 404 for an unknown id.
pub async fn result_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DetectionRecord>, HttpAppError> {
    let record = state
        .detections
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Detection result not found".to_string()))?;

    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_query_defaults() {
        let query: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 0);
    }
}
