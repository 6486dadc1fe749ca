//! Application state shared by all handlers.

use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::content::DirectoryDecks;
use crate::db::SqliteStore;
use crate::study::StudyEngine;

/// The engine behind the HTTP service
pub type Engine = StudyEngine<SqliteStore, DirectoryDecks, StdRng>;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// One learner, one engine; calls are serialized through the lock
    pub engine: Arc<Mutex<Engine>>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Lock the engine. A panic inside a previous call does not leave the
    /// session in a half-written state, so a poisoned lock is taken over.
    pub fn engine(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
