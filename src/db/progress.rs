//! Per-deck progress persistence.
//!
//! Stored under `progress.<deck>` as `{cardId: {box, due, seen, grade?}}`.
//! Reads never fail the caller: a missing or unreadable map is an empty one.

use std::collections::BTreeMap;

use crate::config::PROGRESS_KEY_PREFIX;
use crate::db::{KeyValueStore, LogOnError};
use crate::domain::{Card, ProgressEntry, ProgressMap};
use crate::error::StorageError;

pub fn progress_key(deck: &str) -> String {
  format!("{}.{}", PROGRESS_KEY_PREFIX, deck)
}

/// Decode a stored progress map. Entries that are not objects are dropped;
/// the rest are read leniently.
pub fn decode_progress(raw: &str) -> Result<ProgressMap, serde_json::Error> {
  let entries: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw)?;
  let mut progress = ProgressMap::new();
  for (id, value) in entries {
    match serde_json::from_value::<ProgressEntry>(value) {
      Ok(entry) => {
        progress.insert(id, entry);
      }
      Err(e) => tracing::warn!("Dropping unreadable progress for card {}: {}", id, e),
    }
  }
  Ok(progress)
}

/// Read the stored progress of a deck
pub fn load_progress<S: KeyValueStore + ?Sized>(store: &S, deck: &str) -> ProgressMap {
  let Some(raw) = store
    .get(&progress_key(deck))
    .log_warn("Failed to read progress")
    .flatten()
  else {
    return ProgressMap::new();
  };

  decode_progress(&raw).log_warn_default(&format!("Ignoring corrupt progress for deck {}", deck))
}

/// Give every card exactly one sanitized entry.
///
/// Pure: returns a new map. Entries for ids that are not in `cards` are kept
/// as they were, so progress survives a card temporarily leaving the deck.
pub fn ensure_progress(cards: &[Card], progress: &ProgressMap, now: i64) -> ProgressMap {
  let mut ensured = progress.clone();
  for card in cards {
    let entry = match progress.get(&card.id) {
      Some(existing) => existing.sanitized(now),
      None => ProgressEntry::new(now),
    };
    ensured.insert(card.id.clone(), entry);
  }
  ensured
}

fn write_progress<S: KeyValueStore + ?Sized>(
  store: &mut S,
  deck: &str,
  progress: &ProgressMap,
) -> Result<(), StorageError> {
  let raw = serde_json::to_string(progress)?;
  store.set(&progress_key(deck), &raw)
}

/// Persist the full map of a deck. Failures are logged and dropped; the
/// session carries on in memory and the next save retries.
pub fn save_progress<S: KeyValueStore + ?Sized>(store: &mut S, deck: &str, progress: &ProgressMap) {
  write_progress(store, deck, progress).log_warn(&format!("Failed to save progress for deck {}", deck));
}

/// Forget all stored progress of one deck
pub fn reset_progress<S: KeyValueStore + ?Sized>(store: &mut S, deck: &str) {
  store
    .remove(&progress_key(deck))
    .log_warn(&format!("Failed to reset progress for deck {}", deck));
}
