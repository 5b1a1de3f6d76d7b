//! Keeps the resident property list in sync with the backend
//!
//! Reloads can overlap (a user changes scope while a previous request is
//! still out). Only the most recently issued request may replace the
//! resident data; anything older is discarded when it arrives.

use crate::core::manager::ManagerDirectory;
use crate::core::property::Property;
use crate::core::request::{RequestGeneration, RequestToken};
use crate::core::service::{FetchScope, PropertySource};
use anyhow::{Result, anyhow};
use std::sync::{Arc, RwLock};

/// What happened to a reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the resident data
    Applied { count: usize },
    /// A newer request was issued meanwhile; the response was dropped
    Stale,
}

/// Resident records and managers, refreshed through a [`PropertySource`]
pub struct ListingLoader<S: PropertySource> {
    source: S,
    properties_generation: RequestGeneration,
    managers_generation: RequestGeneration,
    records: RwLock<Arc<Vec<Property>>>,
    directory: RwLock<Arc<ManagerDirectory>>,
}

impl<S: PropertySource> ListingLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            properties_generation: RequestGeneration::new(),
            managers_generation: RequestGeneration::new(),
            records: RwLock::new(Arc::new(Vec::new())),
            directory: RwLock::new(Arc::new(ManagerDirectory::default())),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current resident records
    pub fn records(&self) -> Result<Arc<Vec<Property>>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(Arc::clone(&records))
    }

    /// Current manager directory
    pub fn directory(&self) -> Result<Arc<ManagerDirectory>> {
        let directory = self
            .directory
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(Arc::clone(&directory))
    }

    /// Fetch the property list and apply it unless superseded
    ///
    /// A failed request that has already been superseded is reported as
    /// [`LoadOutcome::Stale`], not as an error.
    pub async fn reload(&self, scope: &FetchScope) -> Result<LoadOutcome> {
        let token = self.properties_generation.issue();
        tracing::debug!(token = token.value(), ?scope, "Reloading properties");

        let result = self.source.fetch_properties(scope).await;
        apply_if_current(&self.records, &self.properties_generation, token, result, |r| {
            r.len()
        })
    }

    /// Fetch the manager directory and apply it unless superseded
    pub async fn reload_managers(&self, company: Option<&str>) -> Result<LoadOutcome> {
        let token = self.managers_generation.issue();
        tracing::debug!(token = token.value(), company, "Reloading managers");

        let result = self.source.fetch_managers(company).await;
        apply_if_current(&self.directory, &self.managers_generation, token, result, |d| {
            d.managers().len()
        })
    }

    /// Reload listings and managers concurrently
    ///
    /// Fails if either request fails; the other may still have been applied.
    pub async fn reload_all(&self, scope: &FetchScope) -> Result<(LoadOutcome, LoadOutcome)> {
        futures::try_join!(self.reload(scope), self.reload_managers(scope.company.as_deref()))
    }

    /// Drop any in-flight reload, e.g. when the view is closed
    pub fn cancel(&self) {
        self.properties_generation.cancel();
        self.managers_generation.cancel();
    }
}

fn apply_if_current<T>(
    slot: &RwLock<Arc<T>>,
    generation: &RequestGeneration,
    token: RequestToken,
    result: Result<T>,
    count: impl FnOnce(&T) -> usize,
) -> Result<LoadOutcome> {
    // The token check happens under the write lock so an older response can
    // never land after a newer one.
    let mut guard = slot
        .write()
        .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

    if !generation.is_current(token) {
        tracing::debug!(token = token.value(), "Discarding stale response");
        return Ok(LoadOutcome::Stale);
    }

    let value = match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(token = token.value(), error = %e, "Reload failed");
            return Err(e);
        }
    };

    let count = count(&value);
    *guard = Arc::new(value);
    tracing::debug!(token = token.value(), count, "Applied reload");
    Ok(LoadOutcome::Applied { count })
}
