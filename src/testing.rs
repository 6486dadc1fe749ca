//! Test utilities: temporary data directories, synthetic decks and
//! storage doubles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use crate::content::DeckSource;
use crate::db::{KeyValueStore, MemoryStore};
use crate::domain::Card;
use crate::error::{Result, StorageError, StudyError};
use crate::study::StudyEngine;

/// Temporary data directory holding a database file and a decks folder.
///
/// Everything is removed when dropped.
pub struct TestEnv {
    /// Kept alive for file persistence
    pub temp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(temp.path().join("decks")).expect("Failed to create decks dir");
        Self { temp }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.temp.path().join("cardbox.db")
    }

    pub fn decks_dir(&self) -> PathBuf {
        self.temp.path().join("decks")
    }

    /// Write `cards` as `<decks_dir>/<name>.json`
    pub fn write_deck(&self, name: &str, cards: &[Card]) {
        let json = serde_json::to_string(cards).expect("Failed to serialize deck");
        self.write_raw_deck(name, &json);
    }

    pub fn write_raw_deck(&self, name: &str, raw: &str) {
        std::fs::write(self.decks_dir().join(format!("{name}.json")), raw)
            .expect("Failed to write deck");
    }
}

/// Cards with ids `c0..c{n-1}`
pub fn cards(n: usize) -> Vec<Card> {
    (0..n)
        .map(|i| Card::new(format!("c{i}"), format!("Question {i}"), format!("Answer {i}")))
        .collect()
}

/// A store whose every operation fails, like a full or locked disk.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("read refused".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
        Err(StorageError::Unavailable("write refused".into()))
    }

    fn remove(&mut self, _key: &str) -> std::result::Result<(), StorageError> {
        Err(StorageError::Unavailable("write refused".into()))
    }
}

/// In-memory decks keyed by id.
#[derive(Debug, Default, Clone)]
pub struct StaticDecks {
    decks: HashMap<String, Vec<Card>>,
}

impl StaticDecks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, deck: &str, cards: Vec<Card>) -> Self {
        self.decks.insert(deck.to_string(), cards);
        self
    }
}

impl DeckSource for StaticDecks {
    fn load_deck(&self, deck: &str) -> Result<Vec<Card>> {
        self.decks.get(deck).cloned().ok_or_else(|| StudyError::LoadFailure {
            deck: deck.to_string(),
            reason: "not found".into(),
        })
    }
}

/// Engine over a memory store with a fixed seed
pub fn engine(decks: StaticDecks) -> StudyEngine<MemoryStore, StaticDecks, StdRng> {
    engine_with_store(MemoryStore::new(), decks)
}

pub fn engine_with_store<S: KeyValueStore>(
    store: S,
    decks: StaticDecks,
) -> StudyEngine<S, StaticDecks, StdRng> {
    StudyEngine::new(store, decks, StdRng::seed_from_u64(7))
}
