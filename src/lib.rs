pub mod config;
pub mod content;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod paths;
pub mod srs;
pub mod state;
pub mod study;

#[cfg(test)]
mod testing;
