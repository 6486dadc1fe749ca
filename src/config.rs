//! Application configuration constants.
//!
//! This module centralizes the tunables of the study engine and the
//! runtime paths of the service.

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths;

// ==================== File Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    decks: Option<DecksConfig>,
    server: Option<ServerConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DecksConfig {
    dir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerConfig {
    port: Option<u16>,
}

fn read_config_file() -> AppConfig {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    match std::fs::read_to_string("config.toml") {
        Ok(contents) => toml::from_str::<AppConfig>(&contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed config.toml: {}", e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Resolved runtime settings for the service binary.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_path: PathBuf,
    pub decks_dir: PathBuf,
    pub port: u16,
}

impl Settings {
    /// Load settings with priority: config.toml > .env / environment > default
    pub fn load() -> Self {
        let config = read_config_file();

        let database_path = config
            .database
            .and_then(|db| db.path)
            .map(|path| {
                tracing::info!("Using database from config.toml: {}", path);
                PathBuf::from(path)
            })
            .or_else(|| {
                std::env::var("DATABASE_PATH").ok().map(|path| {
                    tracing::info!("Using database from DATABASE_PATH env: {}", path);
                    PathBuf::from(path)
                })
            })
            .unwrap_or_else(|| PathBuf::from(paths::db_path()));

        let decks_dir = config
            .decks
            .and_then(|d| d.dir)
            .or_else(|| std::env::var("DECKS_DIR").ok())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(paths::decks_dir()));

        let port = config
            .server
            .and_then(|s| s.port)
            .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
            .unwrap_or(SERVER_PORT);

        tracing::info!(
            "Database: {}, decks: {}",
            database_path.display(),
            decks_dir.display()
        );

        Self {
            database_path,
            decks_dir,
            port,
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", SERVER_ADDR, self.port)
    }
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default server port
pub const SERVER_PORT: u16 = 3000;

// ==================== Storage Keys ====================

/// Key prefix for per-deck progress maps (`progress.<deck>`)
pub const PROGRESS_KEY_PREFIX: &str = "progress";

/// Key of the single resumable session record
pub const SESSION_KEY: &str = "session";

// ==================== Progress Bounds ====================

/// Lowest box (least known)
pub const BOX_MIN: i64 = 1;

/// Highest box (best known)
pub const BOX_MAX: i64 = 5;

/// Grading counter saturates here
pub const SEEN_CAP: i64 = 1_000_000;

// ==================== Grading Intervals ====================

/// "No clue" brings the card back after 20 seconds
pub const NO_CLUE_DELAY_MS: i64 = 20_000;

/// "Partial" brings the card back after 90 seconds
pub const PARTIAL_DELAY_MS: i64 = 90_000;

/// "Known" waits this many minutes per box reached (10..25 min)
pub const KNOWN_MINUTES_PER_BOX: i64 = 5;

// ==================== Selection ====================

/// Number of recently shown card ids remembered for anti-repeat
pub const RECENT_HISTORY_LEN: usize = 3;

/// Weight multiplier for a recently shown card
pub const RECENT_PENALTY: f64 = 0.15;
