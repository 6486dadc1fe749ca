//! Deck loading and card text helpers.

pub mod deck;
pub mod sources;

pub use deck::{validate_deck_id, DeckSource, DirectoryDecks};
pub use sources::format_sources;
