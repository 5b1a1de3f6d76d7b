//! Forward migration of stored preference documents
//!
//! Older clients stored a single `sortConfig` rule, used `monthlyIncome`
//! where the current schema says `monthlyProfit`, and before that only saved
//! the column order under its own key. [`migrate`] reads any of these shapes
//! and produces current [`Preferences`]. It works on parsed JSON and never
//! writes anything back.
//!
//! Fields are read one by one: a field with the wrong shape keeps its
//! initial value instead of discarding the whole document.

use super::{Preferences, PriceFilter, RangeInput, SCHEMA_VERSION};
use crate::config::{ColumnLayout, MIN_COLUMN_WIDTH};
use crate::core::filter::FilterKind;
use crate::core::sort::SortRule;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;

const LEGACY_PROFIT_KEY: &str = "monthlyIncome";
const PROFIT_KEY: &str = "monthlyProfit";

/// Result of [`migrate`]
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub preferences: Preferences,
    /// Whether anything older than the current schema was read
    pub migrated: bool,
}

/// Build current preferences from whatever is stored
///
/// - `settings`: the unified document, if any
/// - `legacy_order`: the standalone column order, used only when there is
///   no unified document
/// - `initial`: values for everything the stored data does not provide
pub fn migrate(
    settings: Option<&Value>,
    legacy_order: Option<&Value>,
    initial: &Preferences,
    layout: &ColumnLayout,
) -> Migration {
    if let Some(settings) = settings {
        if let Value::Object(map) = settings {
            return migrate_settings(map, initial, layout);
        }
        tracing::warn!("Stored preferences are not an object; using defaults");
        return Migration {
            preferences: initial.clone(),
            migrated: false,
        };
    }

    let mut preferences = initial.clone();
    let mut migrated = false;
    if let Some(order) = legacy_order.and_then(string_list) {
        let (order, _) = rename_profit(order);
        preferences.column_order = append_missing(order, layout);
        migrated = true;
    }
    Migration {
        preferences,
        migrated,
    }
}

/// Tracks whether any legacy shape was encountered
struct Migrator<'m> {
    map: &'m Map<String, Value>,
    migrated: bool,
}

impl<'m> Migrator<'m> {
    fn field<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.map
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    fn renamed_list(&mut self, key: &str) -> Option<Vec<String>> {
        let list = self.map.get(key).and_then(string_list)?;
        let (list, renamed) = rename_profit(list);
        self.migrated |= renamed;
        Some(list)
    }

    fn sort_rules(&mut self) -> Vec<SortRule> {
        let raw = match self.map.get("sortRules") {
            Some(Value::Array(rules)) => rules.clone(),
            _ => match self.map.get("sortConfig") {
                Some(rule @ Value::Object(_)) => {
                    self.migrated = true;
                    vec![rule.clone()]
                }
                _ => Vec::new(),
            },
        };

        raw.into_iter()
            .filter_map(|mut rule| {
                if let Some(key) = rule.get_mut("key") {
                    if *key == LEGACY_PROFIT_KEY {
                        *key = Value::String(PROFIT_KEY.to_string());
                        self.migrated = true;
                    }
                }
                serde_json::from_value::<SortRule>(rule).ok()
            })
            .collect()
    }

    fn price_filter(&mut self) -> Option<PriceFilter> {
        let Some(Value::Object(raw)) = self.map.get("priceFilter") else {
            return None;
        };
        let mut fields: Map<String, Value> = raw
            .iter()
            .filter_map(|(k, v)| bound_text(v).map(|text| (k.clone(), Value::String(text))))
            .collect();

        // Only a non-empty legacy bound replaces the current one.
        for (legacy, current) in [("incomeMin", "profitMin"), ("incomeMax", "profitMax")] {
            if let Some(value) = fields.remove(legacy) {
                self.migrated = true;
                if value.as_str().is_some_and(|s| !s.is_empty()) {
                    fields.insert(current.to_string(), value);
                }
            }
        }
        serde_json::from_value(Value::Object(fields)).ok()
    }

    /// Overlay saved widths of known columns onto `widths`
    fn column_widths(&mut self, widths: &mut IndexMap<String, u32>, layout: &ColumnLayout) {
        let Some(Value::Object(saved)) = self.map.get("columnWidths") else {
            return;
        };
        for (column, width) in saved {
            let column = if column == LEGACY_PROFIT_KEY {
                self.migrated = true;
                PROFIT_KEY
            } else {
                column.as_str()
            };
            if !layout.is_known(column) {
                continue;
            }
            if let Some(width) = width.as_u64() {
                let width = u32::try_from(width).unwrap_or(u32::MAX).max(MIN_COLUMN_WIDTH);
                widths.insert(column.to_string(), width);
            }
        }
    }

    fn range_input(&self, key: &str) -> Option<RangeInput> {
        let Some(Value::Object(raw)) = self.map.get(key) else {
            return None;
        };
        let text = |bound: &str| raw.get(bound).and_then(bound_text).unwrap_or_default();
        Some(RangeInput::new(text("min"), text("max")))
    }
}

fn migrate_settings(
    map: &Map<String, Value>,
    initial: &Preferences,
    layout: &ColumnLayout,
) -> Migration {
    let mut m = Migrator {
        map,
        migrated: false,
    };
    let mut prefs = initial.clone();

    let version: Option<u32> = m.field("schemaVersion");
    if version.is_none_or(|v| v < SCHEMA_VERSION) {
        m.migrated = true;
    }

    // Always replaced: a document without rules means "no sorting".
    prefs.sort_rules = m.sort_rules();

    if let Some(keys) = m.renamed_list("activeFilters") {
        prefs.active_filters = dedupe(keys.iter().filter_map(|k| FilterKind::from_key(k)));
    }
    if let Some(columns) = m.renamed_list("visibleColumns") {
        prefs.visible_columns = dedupe(columns);
    }
    if let Some(order) = m.renamed_list("columnOrder") {
        prefs.column_order = layout.reconcile_order(order);
    }
    m.column_widths(&mut prefs.column_widths, layout);

    if let Some(v) = m.field("statusFilter") {
        prefs.status_filter = v;
    }
    if let Some(v) = m.field("typeFilter") {
        prefs.type_filter = v;
    }
    if let Some(v) = m.field("industryDetailFilter") {
        prefs.industry_detail_filter = v;
    }
    if let Some(v) = m.field("operationTypeFilter") {
        prefs.operation_type_filter = v;
    }
    if let Some(v) = m.field("addressFilter") {
        prefs.address_filter = v;
    }
    if let Some(v) = m.field("managerFilters") {
        prefs.manager_filters = v;
    }
    if let Some(v) = m.price_filter() {
        prefs.price_filter = v;
    }
    if let Some(v) = m.range_input("areaFilter") {
        prefs.area_filter = v;
    }
    if let Some(v) = m.range_input("floorFilter") {
        prefs.floor_filter = v;
    }
    if let Some(v) = m.field("showFavoritesOnly") {
        prefs.show_favorites_only = v;
    }

    prefs.schema_version = SCHEMA_VERSION;
    Migration {
        preferences: prefs,
        migrated: m.migrated,
    }
}

/// Strings of a JSON array; other elements are skipped
fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
    )
}

/// Replace the legacy profit key; reports whether anything was renamed
fn rename_profit(list: Vec<String>) -> (Vec<String>, bool) {
    let mut renamed = false;
    let list = list
        .into_iter()
        .map(|key| {
            if key == LEGACY_PROFIT_KEY {
                renamed = true;
                PROFIT_KEY.to_string()
            } else {
                key
            }
        })
        .collect();
    (list, renamed)
}

fn dedupe<T: Clone + Eq + std::hash::Hash>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Legacy standalone order: saved keys first, then every missing known column
fn append_missing(mut order: Vec<String>, layout: &ColumnLayout) -> Vec<String> {
    let missing: Vec<String> = layout
        .widths
        .keys()
        .filter(|key| !order.contains(key))
        .cloned()
        .collect();
    order.extend(missing);
    order
}

/// Text of a stored range bound; numbers written by old clients are accepted
fn bound_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}
