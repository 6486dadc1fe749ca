pub mod progress;
pub mod schema;
pub mod session;

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

use crate::error::StorageError;

// Re-export all public items from submodules
pub use progress::*;
pub use schema::run_migrations;
pub use session::*;

/// String-keyed, JSON-valued persistence used by the progress store and
/// the session tracker. Single writer, last write wins.
pub trait KeyValueStore {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
  fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
  fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
  /// Log the error at warn level and return the default
  fn log_warn_default(self, context: &str) -> T
  where
    T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }

  fn log_warn_default(self, context: &str) -> T
  where
    T: Default,
  {
    match self {
      Ok(v) => v,
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        T::default()
      }
    }
  }
}

/// SQLite-backed store: one `kv` table in a local database file.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  pub fn open(path: &Path) -> Result<Self, StorageError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| StorageError::Unavailable(format!("{}: {}", parent.display(), e)))?;
    }
    let conn = Connection::open(path)?;
    Self::from_connection(conn)
  }

  pub fn open_in_memory() -> Result<Self, StorageError> {
    Self::from_connection(Connection::open_in_memory()?)
  }

  fn from_connection(conn: Connection) -> Result<Self, StorageError> {
    run_migrations(&conn)?;
    Ok(Self { conn })
  }
}

impl KeyValueStore for SqliteStore {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    let value = self
      .conn
      .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
      .optional()?;
    Ok(value)
  }

  fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
    self.conn.execute(
      "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
      params![key, value],
    )?;
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<(), StorageError> {
    self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
    Ok(())
  }
}

/// Volatile store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
  values: HashMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
    Ok(self.values.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
    self.values.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<(), StorageError> {
    self.values.remove(key);
    Ok(())
  }
}
