#![forbid(unsafe_code)]

//! Core domain model and business logic for the BMI journal.
//!
//! This crate provides:
//! - Domain types (entries, measurements, categories)
//! - BMI computation and classification
//! - Key-value persistence backends
//! - The entry store (record, list, edit, delete)
//! - Legacy storage migration
//! - Chart windowing and history table rows

pub mod types;
pub mod error;
pub mod bmi;
pub mod config;
pub mod logging;
pub mod kv;
pub mod store;
pub mod migrate;
pub mod chart;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use bmi::{classify, compute_bmi};
pub use config::Config;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use store::{EntryStore, CORRUPT_ENTRIES_KEY, ENTRIES_KEY, LEGACY_ENTRIES_KEY};
pub use migrate::migrate_legacy;
pub use chart::{windowed_view, ChartWindow, WindowView};
pub use history::{history_rows, HistoryRow};
