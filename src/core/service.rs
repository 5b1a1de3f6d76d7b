//! The backend the listing view loads records from

use crate::config::FetchConfig;
use crate::core::manager::ManagerDirectory;
use crate::core::property::Property;
use anyhow::Result;
use async_trait::async_trait;

/// Server-side scoping for a property list request
///
/// Maps onto `GET /api/properties?company=..&requesterId=..&limit=..`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchScope {
    /// Restrict to listings owned by this company
    pub company: Option<String>,

    /// Id of the user making the request (visibility rules are server-side)
    pub requester_id: Option<String>,

    /// Cap on the number of records returned
    pub limit: Option<usize>,
}

impl FetchScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope carrying the configured record cap
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            limit: config.limit,
            ..Self::default()
        }
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn requester(mut self, user_id: impl Into<String>) -> Self {
        self.requester_id = Some(user_id.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs for the set fields, unencoded
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(company) = &self.company {
            pairs.push(("company", company.clone()));
        }
        if let Some(requester) = &self.requester_id {
            pairs.push(("requesterId", requester.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Source of listing records and the staff directory
///
/// The listing view does not care how records are fetched; implementations
/// range from an HTTP client to a fixed in-memory set.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch the property list for a scope
    async fn fetch_properties(&self, scope: &FetchScope) -> Result<Vec<Property>>;

    /// Fetch the managers of a company (all managers when `None`)
    async fn fetch_managers(&self, company: Option<&str>) -> Result<ManagerDirectory>;
}

/// String key-value storage for per-user settings
///
/// Values are opaque strings (the preference layer stores JSON). Reading a
/// missing key is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or overwrite a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting a missing key succeeds
    async fn remove(&self, key: &str) -> Result<()>;
}
