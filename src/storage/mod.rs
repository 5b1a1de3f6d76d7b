//! Storage implementations for different backends

pub mod file;
#[cfg(feature = "http")]
pub mod http;
pub mod in_memory;

pub use file::FileKeyValueStore;
#[cfg(feature = "http")]
pub use http::HttpPropertySource;
pub use in_memory::{InMemoryKeyValueStore, InMemoryPropertySource};
