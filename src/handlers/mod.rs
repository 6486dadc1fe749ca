pub mod decks;
pub mod study;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use chrono::Utc;

use crate::error::StudyError;
use crate::state::AppState;

pub use decks::{deck_counts, reset_deck};
pub use study::{
  end_session, flip_card, get_session, grade_card, next_card, set_filter, skip_card, start_session,
};

/// Epoch milliseconds handed to the engine
pub(crate) fn now_ms() -> i64 {
  Utc::now().timestamp_millis()
}

/// JSON error response for a failed study operation
#[derive(Debug)]
pub struct ApiError(pub StudyError);

impl From<StudyError> for ApiError {
  fn from(err: StudyError) -> Self {
    Self(err)
  }
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self.0 {
      StudyError::LoadFailure { .. } | StudyError::EmptyDeck(_) => StatusCode::UNPROCESSABLE_ENTITY,
      StudyError::InvalidDeckId(_) | StudyError::InvalidGrade(_) => StatusCode::BAD_REQUEST,
      StudyError::NoActiveSession | StudyError::NoCurrentCard => StatusCode::CONFLICT,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status == StatusCode::UNPROCESSABLE_ENTITY {
      tracing::warn!("{}", self.0);
    }
    (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
  }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// All routes of the study service
pub fn router(state: AppState) -> Router {
  Router::new()
    .route(
      "/session",
      get(get_session).post(start_session).delete(end_session),
    )
    .route("/session/next", post(next_card))
    .route("/session/skip", post(skip_card))
    .route("/session/flip", post(flip_card))
    .route("/session/grade", post(grade_card))
    .route("/session/filter", post(set_filter))
    .route("/decks/{deck}/counts", get(deck_counts))
    .route("/decks/{deck}/reset", post(reset_deck))
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_status_mapping() {
    let cases = [
      (
        StudyError::LoadFailure {
          deck: "d".into(),
          reason: "gone".into(),
        },
        StatusCode::UNPROCESSABLE_ENTITY,
      ),
      (StudyError::EmptyDeck("d".into()), StatusCode::UNPROCESSABLE_ENTITY),
      (StudyError::InvalidDeckId("..".into()), StatusCode::BAD_REQUEST),
      (StudyError::InvalidGrade(4), StatusCode::BAD_REQUEST),
      (StudyError::NoActiveSession, StatusCode::CONFLICT),
      (StudyError::NoCurrentCard, StatusCode::CONFLICT),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError(err).status(), status);
    }
  }
}
