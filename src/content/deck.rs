//! Loading normalized decks.
//!
//! Each deck is a `<deck>.json` file holding a JSON array of cards that were
//! already normalized by a deck-specific exporter.

use std::fs;
use std::path::PathBuf;

use crate::domain::Card;
use crate::error::{Result, StudyError};

/// Supplies the card list of a deck to the study engine.
pub trait DeckSource {
  fn load_deck(&self, deck: &str) -> Result<Vec<Card>>;
}

/// Deck ids become file names and storage keys: ASCII letters, digits, `-` and `_` only.
pub fn validate_deck_id(deck: &str) -> Result<()> {
  let valid = !deck.is_empty()
    && deck
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
  if valid {
    Ok(())
  } else {
    Err(StudyError::InvalidDeckId(deck.to_string()))
  }
}

/// Parse a deck file body, dropping records that are not complete cards.
pub fn parse_deck(deck: &str, raw: &str) -> Result<Vec<Card>> {
  let records: Vec<serde_json::Value> =
    serde_json::from_str(raw).map_err(|e| StudyError::LoadFailure {
      deck: deck.to_string(),
      reason: e.to_string(),
    })?;

  let total = records.len();
  let cards: Vec<Card> = records
    .into_iter()
    .filter_map(|record| serde_json::from_value::<Card>(record).ok())
    .filter(Card::is_complete)
    .collect();

  if cards.len() < total {
    tracing::warn!(
      "Deck {}: skipped {} incomplete card record(s)",
      deck,
      total - cards.len()
    );
  }

  Ok(cards)
}

/// Reads decks from `<dir>/<deck>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryDecks {
  dir: PathBuf,
}

impl DirectoryDecks {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn deck_path(&self, deck: &str) -> PathBuf {
    self.dir.join(format!("{deck}.json"))
  }
}

impl DeckSource for DirectoryDecks {
  fn load_deck(&self, deck: &str) -> Result<Vec<Card>> {
    validate_deck_id(deck)?;

    let path = self.deck_path(deck);
    let raw = fs::read_to_string(&path).map_err(|e| StudyError::LoadFailure {
      deck: deck.to_string(),
      reason: format!("{}: {}", path.display(), e),
    })?;

    parse_deck(deck, &raw)
  }
}
