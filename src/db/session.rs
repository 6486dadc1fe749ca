//! Persistence of the single resumable session record.

use crate::config::SESSION_KEY;
use crate::db::{KeyValueStore, LogOnError};
use crate::domain::SessionRecord;
use crate::error::StorageError;

/// Read the stored session; absent or unreadable records yield `None`
pub fn load_session<S: KeyValueStore + ?Sized>(store: &S) -> Option<SessionRecord> {
  let raw = store.get(SESSION_KEY).log_warn("Failed to read session").flatten()?;
  serde_json::from_str::<SessionRecord>(&raw).log_warn("Ignoring unreadable session record")
}

fn write_session<S: KeyValueStore + ?Sized>(
  store: &mut S,
  record: &SessionRecord,
) -> Result<(), StorageError> {
  let raw = serde_json::to_string(record)?;
  store.set(SESSION_KEY, &raw)
}

/// Overwrite the stored session; failures are logged and dropped
pub fn save_session<S: KeyValueStore + ?Sized>(store: &mut S, record: &SessionRecord) {
  write_session(store, record).log_warn("Failed to save session");
}
