//! QuickRef Core Library
//!
//! Shared functionality for QuickRef components:
//! - Concurrent multi-source cheat sheet aggregation with a shared deadline
//! - Relevance scoring and fuzzy matching for ranking and deduplication
//! - Time-bounded response caching with background eviction
//! - Bundled offline catalog, usage history, and favorites
//! - Configuration resolution and common error types

pub mod cache;
pub mod clean;
pub mod config;
pub mod engine;
pub mod error;
pub mod favorites;
pub mod fuzzy;
pub mod history;
pub mod item;
pub mod offline;
pub mod score;
pub mod sources;
pub mod tracing_init;

pub use config::{Settings, SourceOptions};
pub use engine::CheatSheetEngine;
pub use error::{Error, Result};
pub use item::CheatSheetItem;
