//! Declarative listing filters
//!
//! A [`FilterSpec`] is a bag of independent predicates. An empty predicate
//! (no selected values, blank text, no bounds) places no constraint, and all
//! active predicates are combined with AND, so evaluation order does not
//! change the result.

use crate::core::field::parse_bound;
use crate::core::manager::ManagerDirectory;
use crate::core::property::{NumericKey, Property};
use crate::core::resolve;
use serde::{Deserialize, Serialize};

/// Inclusive numeric bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Build from raw form inputs; blank strings are open bounds
    pub fn parse(min: &str, max: &str) -> Self {
        Self {
            min: parse_bound(min),
            max: parse_bound(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: f64) -> Self {
        Self::new(None, Some(max))
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// The filter cards a user can add to the filter bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterKind {
    #[serde(rename = "isFavorite")]
    Favorite,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "type")]
    Sector,
    #[serde(rename = "industryDetail")]
    Detail,
    #[serde(rename = "operationType")]
    OperationType,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "manager")]
    Manager,
    #[serde(rename = "area")]
    Area,
    #[serde(rename = "floor")]
    Floor,
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "monthlyRent")]
    MonthlyRent,
    #[serde(rename = "premium")]
    Premium,
    #[serde(rename = "totalPrice")]
    Total,
    #[serde(rename = "monthlyProfit")]
    MonthlyProfit,
    #[serde(rename = "monthlyRevenue")]
    MonthlyRevenue,
    #[serde(rename = "yield")]
    Yield,
}

impl FilterKind {
    pub const ALL: [FilterKind; 16] = [
        FilterKind::Favorite,
        FilterKind::Status,
        FilterKind::Sector,
        FilterKind::Detail,
        FilterKind::OperationType,
        FilterKind::Address,
        FilterKind::Manager,
        FilterKind::Area,
        FilterKind::Floor,
        FilterKind::Deposit,
        FilterKind::MonthlyRent,
        FilterKind::Premium,
        FilterKind::Total,
        FilterKind::MonthlyProfit,
        FilterKind::MonthlyRevenue,
        FilterKind::Yield,
    ];

    /// Parse a stored card key
    pub fn from_key(key: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(key.to_string())).ok()
    }

    /// Numeric attribute behind a range card
    pub fn numeric_key(&self) -> Option<NumericKey> {
        match self {
            FilterKind::Area => Some(NumericKey::Area),
            FilterKind::Floor => Some(NumericKey::Floor),
            FilterKind::Deposit => Some(NumericKey::Deposit),
            FilterKind::MonthlyRent => Some(NumericKey::MonthlyRent),
            FilterKind::Premium => Some(NumericKey::Premium),
            FilterKind::Total => Some(NumericKey::Total),
            FilterKind::MonthlyProfit => Some(NumericKey::MonthlyProfit),
            FilterKind::MonthlyRevenue => Some(NumericKey::MonthlyRevenue),
            FilterKind::Yield => Some(NumericKey::Yield),
            _ => None,
        }
    }
}

/// Every predicate the listing view can apply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Case-insensitive substring over the whole serialized record
    pub search: String,
    pub status: Vec<String>,
    /// Matched against `industrySector`
    pub sector: Vec<String>,
    /// Matched against `industryDetail`
    pub detail: Vec<String>,
    pub operation_type: Vec<String>,
    /// Selected manager ids
    pub managers: Vec<String>,
    /// Case-insensitive substring of `address`
    pub address: String,

    pub area: NumericRange,
    pub floor: NumericRange,
    pub deposit: NumericRange,
    pub monthly_rent: NumericRange,
    pub premium: NumericRange,
    pub total: NumericRange,
    pub monthly_profit: NumericRange,
    pub monthly_revenue: NumericRange,
    pub yield_percent: NumericRange,

    pub favorites_only: bool,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// The numeric ranges paired with the attribute they bound
    pub fn ranges(&self) -> [(NumericKey, &NumericRange); 9] {
        [
            (NumericKey::Area, &self.area),
            (NumericKey::Floor, &self.floor),
            (NumericKey::Deposit, &self.deposit),
            (NumericKey::MonthlyRent, &self.monthly_rent),
            (NumericKey::Premium, &self.premium),
            (NumericKey::Total, &self.total),
            (NumericKey::MonthlyProfit, &self.monthly_profit),
            (NumericKey::MonthlyRevenue, &self.monthly_revenue),
            (NumericKey::Yield, &self.yield_percent),
        ]
    }

    /// Mutable access to the range bounding `key`
    pub fn range_mut(&mut self, key: NumericKey) -> &mut NumericRange {
        match key {
            NumericKey::Area => &mut self.area,
            NumericKey::Floor => &mut self.floor,
            NumericKey::Deposit => &mut self.deposit,
            NumericKey::MonthlyRent => &mut self.monthly_rent,
            NumericKey::Premium => &mut self.premium,
            NumericKey::Total => &mut self.total,
            NumericKey::MonthlyProfit => &mut self.monthly_profit,
            NumericKey::MonthlyRevenue => &mut self.monthly_revenue,
            NumericKey::Yield => &mut self.yield_percent,
        }
    }

    /// Whether the card `kind` currently constrains results
    pub fn has_value(&self, kind: FilterKind) -> bool {
        if let Some(key) = kind.numeric_key() {
            return self
                .ranges()
                .iter()
                .any(|(k, range)| *k == key && !range.is_empty());
        }
        match kind {
            FilterKind::Favorite => self.favorites_only,
            FilterKind::Status => !self.status.is_empty(),
            FilterKind::Sector => !self.sector.is_empty(),
            FilterKind::Detail => !self.detail.is_empty(),
            FilterKind::OperationType => !self.operation_type.is_empty(),
            FilterKind::Address => !self.address.trim().is_empty(),
            FilterKind::Manager => !self.managers.is_empty(),
            _ => false,
        }
    }

    /// True when no predicate is active
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && !FilterKind::ALL.iter().any(|kind| self.has_value(*kind))
    }

    /// Reset the predicate behind `kind`
    pub fn clear(&mut self, kind: FilterKind) {
        if let Some(key) = kind.numeric_key() {
            *self.range_mut(key) = NumericRange::default();
            return;
        }
        match kind {
            FilterKind::Favorite => self.favorites_only = false,
            FilterKind::Status => self.status.clear(),
            FilterKind::Sector => self.sector.clear(),
            FilterKind::Detail => self.detail.clear(),
            FilterKind::OperationType => self.operation_type.clear(),
            FilterKind::Address => self.address.clear(),
            FilterKind::Manager => self.managers.clear(),
            _ => {}
        }
    }

    /// Keep the records that pass every active predicate, in input order
    pub fn apply<'a>(
        &self,
        records: &'a [Property],
        directory: &ManagerDirectory,
    ) -> Vec<&'a Property> {
        let compiled = CompiledFilter::new(self, directory);
        records.iter().filter(|p| compiled.matches(p)).collect()
    }

    /// Evaluate all predicates against a single record
    pub fn matches(&self, property: &Property, directory: &ManagerDirectory) -> bool {
        CompiledFilter::new(self, directory).matches(property)
    }
}

/// A [`FilterSpec`] with its text predicates lower-cased once
struct CompiledFilter<'f> {
    spec: &'f FilterSpec,
    directory: &'f ManagerDirectory,
    search: Option<String>,
    address: Option<String>,
    ranges: Vec<(NumericKey, NumericRange)>,
}

impl<'f> CompiledFilter<'f> {
    fn new(spec: &'f FilterSpec, directory: &'f ManagerDirectory) -> Self {
        let lowered = |s: &str| (!s.is_empty()).then(|| s.to_lowercase());
        Self {
            spec,
            directory,
            search: lowered(&spec.search),
            address: lowered(spec.address.trim()),
            ranges: spec
                .ranges()
                .into_iter()
                .filter(|(_, range)| !range.is_empty())
                .map(|(key, range)| (key, *range))
                .collect(),
        }
    }

    fn matches(&self, p: &Property) -> bool {
        // Text search first: it is the most selective in practice.
        if let Some(term) = &self.search {
            if !p.search_blob().contains(term.as_str()) {
                return false;
            }
        }

        let spec = self.spec;
        if !one_of(&spec.status, p.status.as_deref()) {
            return false;
        }
        if let Some(term) = &self.address {
            let address = p.address.as_deref().unwrap_or("").to_lowercase();
            if !address.contains(term.as_str()) {
                return false;
            }
        }
        if !spec.managers.is_empty()
            && !resolve::manager_matches(p, &spec.managers, self.directory)
        {
            return false;
        }
        if !one_of(&spec.sector, p.industry_sector.as_deref())
            || !one_of(&spec.detail, p.industry_detail.as_deref())
            || !one_of(&spec.operation_type, p.operation_type.as_deref())
        {
            return false;
        }

        if !self
            .ranges
            .iter()
            .all(|(key, range)| range.contains(p.number(*key)))
        {
            return false;
        }

        !spec.favorites_only || p.is_favorite()
    }
}

/// Empty selection matches everything; otherwise the value must be selected
fn one_of(selected: &[String], value: Option<&str>) -> bool {
    selected.is_empty() || value.is_some_and(|v| selected.iter().any(|s| s == v))
}
