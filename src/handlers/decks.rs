//! Per-deck endpoints that work without an active session.

use axum::{
  extract::{Path, State},
  http::StatusCode,
  Json,
};

use crate::srs::KnowledgeCounts;
use crate::state::AppState;

use super::{now_ms, ApiError, ApiResult};

/// GET /decks/{deck}/counts
pub async fn deck_counts(
  State(state): State<AppState>,
  Path(deck): Path<String>,
) -> ApiResult<KnowledgeCounts> {
  Ok(Json(state.engine().knowledge_counts(&deck, now_ms())?))
}

/// POST /decks/{deck}/reset
pub async fn reset_deck(
  State(state): State<AppState>,
  Path(deck): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.engine().reset_progress(&deck, now_ms())?;
  Ok(StatusCode::NO_CONTENT)
}
