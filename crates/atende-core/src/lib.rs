//! atende-core: library for the atende conversational assistant.
//!
//! Building blocks for a small intent-routing chat backend:
//!
//! - [`catalog`] — immutable intent table: trigger rules + reply candidates
//! - [`intent`] — keyword scorer producing `(intent, confidence)` pairs
//! - [`selector`] — seedable uniform-random reply selection
//! - [`assistant`] — the router: local answer vs. delegation, with
//!   guaranteed local fallback, plus the conversation log
//! - [`provider`] — external text-generation trait and HTTP implementation
//! - [`model`] — pluggable model handlers (dummy only) and their registry
//! - [`config`] — typed JSON configuration with safe defaults
//! - [`server`] — axum endpoints: chat, health, clear_history

pub mod assistant;
pub mod catalog;
pub mod config;
pub mod intent;
pub mod model;
pub mod provider;
pub mod selector;
pub mod server;
