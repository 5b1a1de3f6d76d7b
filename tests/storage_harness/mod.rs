//! Shared test harness for key-value store backends
//!
//! Provides factories for every `KeyValueStore` implementation and the
//! `key_value_store_tests!` conformance macro.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

pub mod key_value_store_tests;

use estate::storage::{FileKeyValueStore, InMemoryKeyValueStore};
use tempfile::TempDir;

/// A fresh in-memory store; the guard is a placeholder
pub fn in_memory_store() -> (InMemoryKeyValueStore, ()) {
    (InMemoryKeyValueStore::new(), ())
}

/// A file store in its own temporary directory
///
/// Keep the returned `TempDir` alive for as long as the store is used.
pub fn file_store() -> (FileKeyValueStore, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = FileKeyValueStore::new(dir.path().join("prefs"));
    (store, dir)
}

/// A settings document as written by clients before schema 2
pub fn legacy_settings_json() -> String {
    serde_json::json!({
        "sortConfig": {"key": "monthlyIncome", "direction": "desc"},
        "activeFilters": ["status", "monthlyIncome"],
        "visibleColumns": ["name", "monthlyIncome", "deposit"],
        "columnOrder": ["name", "monthlyIncome", "name", "removedColumn"],
        "statusFilter": ["A"],
        "priceFilter": {"incomeMin": "300", "depositMax": "50,000"},
        "areaFilter": {"min": "10", "max": ""},
        "showFavoritesOnly": true
    })
    .to_string()
}
