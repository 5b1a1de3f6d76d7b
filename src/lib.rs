//! # estate
//!
//! Listing query pipeline, contract document templates and per-user
//! preferences for a real-estate brokerage back office.
//!
//! ## Features
//!
//! - **Listing Pipeline**: Declarative filters, multi-key stable sorting and pagination over resident records
//! - **Typed Records**: Optional fields with one shared "parse or zero" numeric coercion
//! - **Legacy Compatibility**: Ordered fallbacks for renamed fields and name-based manager matching
//! - **Last-Request-Wins Loading**: Stale responses are discarded by request generation
//! - **Preferences**: Versioned per-user settings with forward migration of older documents
//! - **Contract Templates**: Page splitting, per-page form schemas and placeholder rendering
//! - **Printable Reports**: Autoescaped HTML listing reports
//! - **Configuration-Based**: Defaults, columns and template markers via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use estate::prelude::*;
//!
//! let config = ListingConfig::default_config();
//! let records: Vec<Property> = serde_json::from_str(&body)?;
//!
//! let mut view = ListingView::new(&config);
//! view.update_filters(|f| f.deposit = NumericRange::parse("1,000", ""));
//! view.click_header(SortKey::Deposit);
//!
//! let page = view.run(&records, &ManagerDirectory::default());
//! println!("{} of {} listings", page.items.len(), page.total_count);
//! ```

pub mod config;
pub mod contract;
pub mod core;
pub mod preferences;
pub mod report;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Pipeline ===
    pub use crate::core::{
        filter::{FilterKind, FilterSpec, NumericRange},
        manager::{Manager, ManagerDirectory},
        property::{NumericKey, Property},
        query::{PageSpec, QueryResult, filter_and_sort, query},
        sort::{SortDirection, SortKey, SortRule, SortSpec},
        view::ListingView,
    };

    // === Loading ===
    pub use crate::core::{
        loader::{ListingLoader, LoadOutcome},
        service::{FetchScope, KeyValueStore, PropertySource},
    };

    // === Preferences ===
    pub use crate::preferences::{KeyValuePreferenceStore, PreferenceStore, Preferences};

    // === Contracts & Reports ===
    pub use crate::contract::{ContractProject, ContractTemplate, FormField, effective_data};
    pub use crate::report::ListingReport;

    // === Storage ===
    #[cfg(feature = "http")]
    pub use crate::storage::HttpPropertySource;
    pub use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore, InMemoryPropertySource};

    // === Config ===
    pub use crate::config::{ColumnLayout, FetchConfig, ListingConfig, TemplateConfig};

    // === Errors ===
    pub use crate::core::error::{ConfigError, EstateError, FetchError, PreferenceError, ReportError};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
