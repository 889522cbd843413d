//! Mirage - headless client core for the Mirage social feed
//!
//! The crate holds everything below the UI: the HTTP API client, the local
//! SQLite cache, the use-case interactors and the per-screen view-models.
//! This library exposes modules for the binary and for integration tests.

pub mod adapters;
pub mod api;
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod interactors;
pub mod logging;
pub mod models;
pub mod state;
pub mod traits;

pub use app::MirageApp;
pub use config::ClientConfig;
