//! Core module containing the listing record, the query pipeline and the
//! traits for the outside collaborators

pub mod error;
pub mod field;
pub mod filter;
pub mod loader;
pub mod manager;
pub mod property;
pub mod query;
pub mod request;
pub mod resolve;
pub mod service;
pub mod sort;
pub mod view;

pub use error::{ConfigError, EstateError, FetchError, PreferenceError, ReportError};
pub use field::{NumericField, parse_number};
pub use filter::{FilterKind, FilterSpec, NumericRange};
pub use loader::{ListingLoader, LoadOutcome};
pub use manager::{Manager, ManagerDirectory};
pub use property::{NumericKey, Property};
pub use query::{PageSpec, PaginationMeta, QueryResult, filter_and_sort, query};
pub use request::{RequestGeneration, RequestToken};
pub use service::{FetchScope, KeyValueStore, PropertySource};
pub use sort::{SortDirection, SortKey, SortRule, SortSpec};
pub use view::ListingView;
