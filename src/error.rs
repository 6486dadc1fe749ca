//! Error types for the study engine and its storage boundary.

use thiserror::Error;

/// Failures surfaced to the caller of a study operation.
#[derive(Debug, Error)]
pub enum StudyError {
  #[error("failed to load deck {deck}: {reason}")]
  LoadFailure { deck: String, reason: String },

  #[error("deck {0} has no usable cards")]
  EmptyDeck(String),

  #[error("invalid deck id: {0:?}")]
  InvalidDeckId(String),

  #[error("no study session is active")]
  NoActiveSession,

  #[error("no card is currently displayed")]
  NoCurrentCard,

  #[error("invalid grade {0}, expected 0, 1 or 2")]
  InvalidGrade(i64),
}

/// Failures of the persisted key-value store. Never reach the learner:
/// reads degrade to "no data" and writes are dropped after logging.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("serialization error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("storage unavailable: {0}")]
  Unavailable(String),
}

pub type Result<T, E = StudyError> = std::result::Result<T, E>;
