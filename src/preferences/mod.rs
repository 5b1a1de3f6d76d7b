//! Per-user listing preferences
//!
//! Sort rules, filter values, active filter cards and the column layout are
//! saved per user as one JSON document under `property_settings_{userId}`.
//! The column order is mirrored under `property_column_order_{userId}`,
//! which is also the only thing older clients saved.
//!
//! Stored documents are migrated to the current schema on every load (see
//! [`migrate`]); the stored value is only rewritten by an explicit save.

pub mod migrate;

use crate::config::{ColumnLayout, ListingConfig};
use crate::core::error::PreferenceError;
use crate::core::filter::{FilterKind, FilterSpec, NumericRange};
use crate::core::property::NumericKey;
use crate::core::service::KeyValueStore;
use crate::core::sort::{SortRule, SortSpec};
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use migrate::{Migration, migrate};

/// Version written by [`PreferenceStore::save`]
pub const SCHEMA_VERSION: u32 = 2;

/// Storage key of the unified settings document
pub fn settings_key(user_id: &str) -> String {
    format!("property_settings_{}", user_id)
}

/// Storage key of the mirrored column order
pub fn legacy_order_key(user_id: &str) -> String {
    format!("property_column_order_{}", user_id)
}

/// Raw min/max text from a range filter card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeInput {
    pub min: String,
    pub max: String,
}

impl RangeInput {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_empty() && self.max.is_empty()
    }

    pub fn to_range(&self) -> NumericRange {
        NumericRange::parse(&self.min, &self.max)
    }

    pub fn from_range(range: &NumericRange) -> Self {
        let text = |bound: Option<f64>| bound.map(|v| v.to_string()).unwrap_or_default();
        Self {
            min: text(range.min),
            max: text(range.max),
        }
    }
}

/// Money and ratio range inputs, stored flat as in the filter bar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceFilter {
    pub deposit_min: String,
    pub deposit_max: String,
    pub rent_min: String,
    pub rent_max: String,
    pub premium_min: String,
    pub premium_max: String,
    pub total_min: String,
    pub total_max: String,
    pub profit_min: String,
    pub profit_max: String,
    pub revenue_min: String,
    pub revenue_max: String,
    pub yield_min: String,
    pub yield_max: String,
}

impl PriceFilter {
    fn bounds(&self, key: NumericKey) -> Option<(&str, &str)> {
        match key {
            NumericKey::Deposit => Some((&self.deposit_min, &self.deposit_max)),
            NumericKey::MonthlyRent => Some((&self.rent_min, &self.rent_max)),
            NumericKey::Premium => Some((&self.premium_min, &self.premium_max)),
            NumericKey::Total => Some((&self.total_min, &self.total_max)),
            NumericKey::MonthlyProfit => Some((&self.profit_min, &self.profit_max)),
            NumericKey::MonthlyRevenue => Some((&self.revenue_min, &self.revenue_max)),
            NumericKey::Yield => Some((&self.yield_min, &self.yield_max)),
            NumericKey::Area | NumericKey::Floor => None,
        }
    }

    fn slots(&mut self, key: NumericKey) -> Option<(&mut String, &mut String)> {
        match key {
            NumericKey::Deposit => Some((&mut self.deposit_min, &mut self.deposit_max)),
            NumericKey::MonthlyRent => Some((&mut self.rent_min, &mut self.rent_max)),
            NumericKey::Premium => Some((&mut self.premium_min, &mut self.premium_max)),
            NumericKey::Total => Some((&mut self.total_min, &mut self.total_max)),
            NumericKey::MonthlyProfit => Some((&mut self.profit_min, &mut self.profit_max)),
            NumericKey::MonthlyRevenue => Some((&mut self.revenue_min, &mut self.revenue_max)),
            NumericKey::Yield => Some((&mut self.yield_min, &mut self.yield_max)),
            NumericKey::Area | NumericKey::Floor => None,
        }
    }
}

/// Everything the listing view remembers for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub schema_version: u32,
    pub sort_rules: Vec<SortRule>,
    pub active_filters: Vec<FilterKind>,
    pub visible_columns: Vec<String>,
    pub column_order: Vec<String>,
    /// Pixel widths of resized columns
    pub column_widths: IndexMap<String, u32>,
    pub status_filter: Vec<String>,
    pub type_filter: Vec<String>,
    pub industry_detail_filter: Vec<String>,
    pub operation_type_filter: Vec<String>,
    pub address_filter: String,
    /// Manager ids
    pub manager_filters: Vec<String>,
    pub price_filter: PriceFilter,
    pub area_filter: RangeInput,
    pub floor_filter: RangeInput,
    pub show_favorites_only: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sort_rules: Vec::new(),
            active_filters: Vec::new(),
            visible_columns: Vec::new(),
            column_order: Vec::new(),
            column_widths: IndexMap::new(),
            status_filter: Vec::new(),
            type_filter: Vec::new(),
            industry_detail_filter: Vec::new(),
            operation_type_filter: Vec::new(),
            address_filter: String::new(),
            manager_filters: Vec::new(),
            price_filter: PriceFilter::default(),
            area_filter: RangeInput::default(),
            floor_filter: RangeInput::default(),
            show_favorites_only: false,
        }
    }
}

impl Preferences {
    /// What a user with nothing saved starts with
    pub fn initial(config: &ListingConfig) -> Self {
        Self {
            sort_rules: config.default_sort.clone(),
            visible_columns: config.columns.visible.clone(),
            column_order: config.columns.order.clone(),
            column_widths: config.columns.widths.clone(),
            ..Self::default()
        }
    }

    /// Raw inputs of the range card bounding `key`
    pub fn range_input(&self, key: NumericKey) -> RangeInput {
        match key {
            NumericKey::Area => self.area_filter.clone(),
            NumericKey::Floor => self.floor_filter.clone(),
            _ => self
                .price_filter
                .bounds(key)
                .map(|(min, max)| RangeInput::new(min, max))
                .unwrap_or_default(),
        }
    }

    pub fn set_range_input(&mut self, key: NumericKey, input: RangeInput) {
        match key {
            NumericKey::Area => self.area_filter = input,
            NumericKey::Floor => self.floor_filter = input,
            _ => {
                if let Some((min, max)) = self.price_filter.slots(key) {
                    *min = input.min;
                    *max = input.max;
                }
            }
        }
    }

    /// Filter predicates described by these preferences
    ///
    /// The search box is not persisted, so `search` is always empty.
    pub fn filter_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec {
            status: self.status_filter.clone(),
            sector: self.type_filter.clone(),
            detail: self.industry_detail_filter.clone(),
            operation_type: self.operation_type_filter.clone(),
            managers: self.manager_filters.clone(),
            address: self.address_filter.clone(),
            favorites_only: self.show_favorites_only,
            ..FilterSpec::default()
        };
        for key in FilterKind::ALL.iter().filter_map(|kind| kind.numeric_key()) {
            *spec.range_mut(key) = self.range_input(key).to_range();
        }
        spec
    }

    /// Copy the predicates of `spec` into these preferences
    pub fn set_filter_spec(&mut self, spec: &FilterSpec) {
        self.status_filter = spec.status.clone();
        self.type_filter = spec.sector.clone();
        self.industry_detail_filter = spec.detail.clone();
        self.operation_type_filter = spec.operation_type.clone();
        self.manager_filters = spec.managers.clone();
        self.address_filter = spec.address.clone();
        self.show_favorites_only = spec.favorites_only;
        for (key, range) in spec.ranges() {
            self.set_range_input(key, RangeInput::from_range(range));
        }
    }

    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.sort_rules.clone())
    }
}

/// Loads and saves [`Preferences`] per user
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Load a user's preferences, migrating older documents
    ///
    /// Users with nothing saved, or with an unreadable document, get the
    /// initial preferences.
    async fn load(&self, user_id: &str) -> Result<Preferences>;

    /// Save a user's preferences at the current schema version
    async fn save(&self, user_id: &str, preferences: &Preferences) -> Result<()>;
}

/// [`PreferenceStore`] over any [`KeyValueStore`]
pub struct KeyValuePreferenceStore<S: KeyValueStore> {
    store: S,
    initial: Preferences,
    layout: ColumnLayout,
}

impl<S: KeyValueStore> KeyValuePreferenceStore<S> {
    pub fn new(store: S, config: &ListingConfig) -> Self {
        Self {
            store,
            initial: Preferences::initial(config),
            layout: config.columns.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn read_json(&self, key: &str) -> Result<Option<Value>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unreadable stored preferences");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> PreferenceStore for KeyValuePreferenceStore<S> {
    async fn load(&self, user_id: &str) -> Result<Preferences> {
        let settings = self.read_json(&settings_key(user_id)).await?;
        let legacy_order = self.read_json(&legacy_order_key(user_id)).await?;

        let Migration {
            preferences,
            migrated,
        } = migrate(
            settings.as_ref(),
            legacy_order.as_ref(),
            &self.initial,
            &self.layout,
        );

        if migrated {
            tracing::info!(
                user_id = %user_id,
                schema_version = SCHEMA_VERSION,
                "Migrated stored preferences"
            );
        } else {
            tracing::debug!(user_id = %user_id, "Loaded preferences");
        }
        Ok(preferences)
    }

    async fn save(&self, user_id: &str, preferences: &Preferences) -> Result<()> {
        let mut document = preferences.clone();
        document.schema_version = SCHEMA_VERSION;

        let serialization_error = |e: serde_json::Error| PreferenceError::Serialization {
            user_id: user_id.to_string(),
            message: e.to_string(),
        };
        let settings = serde_json::to_string(&document).map_err(serialization_error)?;
        let order = serde_json::to_string(&document.column_order).map_err(serialization_error)?;

        self.store.set(&settings_key(user_id), &settings).await?;
        self.store.set(&legacy_order_key(user_id), &order).await?;

        tracing::debug!(user_id = %user_id, "Saved preferences");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sort::SortKey;
    use crate::storage::InMemoryKeyValueStore;
    use serde_json::json;

    fn store() -> KeyValuePreferenceStore<InMemoryKeyValueStore> {
        KeyValuePreferenceStore::new(InMemoryKeyValueStore::new(), &ListingConfig::default())
    }

    #[tokio::test]
    async fn test_nothing_saved_gives_initial() {
        let prefs = store().load("u1").await.unwrap();
        assert_eq!(prefs, Preferences::initial(&ListingConfig::default()));
        assert_eq!(prefs.sort_rules, vec![SortRule::desc(SortKey::CreatedAt)]);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = store();
        let mut prefs = Preferences::initial(&ListingConfig::default());
        prefs.sort_rules = vec![SortRule::asc(SortKey::Deposit)];
        prefs.active_filters = vec![FilterKind::Deposit];
        prefs.price_filter.deposit_min = "1000".to_string();
        prefs.show_favorites_only = true;
        prefs.column_widths.insert("name".to_string(), 320);

        store.save("u1", &prefs).await.unwrap();
        let loaded = store.load("u1").await.unwrap();
        assert_eq!(loaded, prefs);

        let mirrored = store
            .store()
            .get(&legacy_order_key("u1"))
            .await
            .unwrap()
            .unwrap();
        let order: Vec<String> = serde_json::from_str(&mirrored).unwrap();
        assert_eq!(order, prefs.column_order);
    }

    #[tokio::test]
    async fn test_corrupt_document_falls_back() {
        let store = store();
        store
            .store()
            .set(&settings_key("u1"), "{not json")
            .await
            .unwrap();
        let prefs = store.load("u1").await.unwrap();
        assert_eq!(prefs, Preferences::initial(&ListingConfig::default()));
    }

    #[tokio::test]
    async fn test_save_writes_schema_version() {
        let store = store();
        let prefs = Preferences {
            schema_version: 1,
            ..Preferences::default()
        };
        store.save("u1", &prefs).await.unwrap();

        let raw = store.store().get(&settings_key("u1")).await.unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["schemaVersion"], json!(2));
    }

    #[test]
    fn test_filter_spec_conversion() {
        let mut prefs = Preferences::default();
        prefs.price_filter.deposit_min = "1,000".to_string();
        prefs.area_filter = RangeInput::new("", "30");
        prefs.status_filter = vec!["A".to_string()];

        let spec = prefs.filter_spec();
        assert_eq!(spec.deposit, NumericRange::at_least(1000.0));
        assert_eq!(spec.area, NumericRange::at_most(30.0));
        assert_eq!(spec.status, vec!["A".to_string()]);
        assert!(spec.search.is_empty());

        let mut back = Preferences::default();
        back.set_filter_spec(&spec);
        assert_eq!(back.price_filter.deposit_min, "1000");
        assert_eq!(back.area_filter, RangeInput::new("", "30"));
    }

    #[test]
    fn test_range_input_routes_to_price_filter() {
        let mut prefs = Preferences::default();
        prefs.set_range_input(NumericKey::MonthlyProfit, RangeInput::new("5", "9"));
        assert_eq!(prefs.price_filter.profit_min, "5");
        assert_eq!(prefs.price_filter.profit_max, "9");
        assert_eq!(
            prefs.range_input(NumericKey::MonthlyProfit),
            RangeInput::new("5", "9")
        );
        assert!(prefs.range_input(NumericKey::Area).is_empty());
    }
}
