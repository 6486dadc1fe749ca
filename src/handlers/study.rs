//! Session endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::domain::{Grade, KnowledgeFilter};
use crate::error::StudyError;
use crate::state::AppState;
use crate::study::{GradeOutcome, Presented, StartOptions};

use super::{now_ms, ApiResult};

#[derive(Debug, Deserialize)]
pub struct StartRequest {
  pub deck: String,
  #[serde(flatten)]
  pub options: StartOptions,
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
  pub rating: i64,
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
  #[serde(default)]
  pub filter: KnowledgeFilter,
}

/// POST /session
pub async fn start_session(
  State(state): State<AppState>,
  Json(request): Json<StartRequest>,
) -> ApiResult<Presented> {
  let presented = state
    .engine()
    .start_session(&request.deck, request.options, now_ms())?;
  Ok(Json(presented))
}

/// GET /session
pub async fn get_session(State(state): State<AppState>) -> ApiResult<Presented> {
  Ok(Json(state.engine().current()?))
}

/// DELETE /session
pub async fn end_session(State(state): State<AppState>) -> StatusCode {
  state.engine().end_session();
  StatusCode::NO_CONTENT
}

/// POST /session/next
pub async fn next_card(State(state): State<AppState>) -> ApiResult<Presented> {
  Ok(Json(state.engine().pick_next(now_ms())?))
}

/// POST /session/skip
pub async fn skip_card(State(state): State<AppState>) -> ApiResult<Presented> {
  Ok(Json(state.engine().skip(now_ms())?))
}

/// POST /session/flip
pub async fn flip_card(State(state): State<AppState>) -> ApiResult<Presented> {
  Ok(Json(state.engine().flip(now_ms())?))
}

/// POST /session/grade
pub async fn grade_card(
  State(state): State<AppState>,
  Json(request): Json<GradeRequest>,
) -> ApiResult<GradeOutcome> {
  let rating = Grade::from_i64(request.rating).ok_or(StudyError::InvalidGrade(request.rating))?;
  Ok(Json(state.engine().apply_grade(rating, now_ms())?))
}

/// POST /session/filter
pub async fn set_filter(
  State(state): State<AppState>,
  Json(request): Json<FilterRequest>,
) -> ApiResult<Presented> {
  Ok(Json(
    state.engine().set_knowledge_filter(request.filter, now_ms())?,
  ))
}
