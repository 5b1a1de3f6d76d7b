//! Multi-key sorting for listings
//!
//! A [`SortSpec`] is an ordered list of rules compared lexicographically:
//! the first rule decides unless it ties, then the second, and so on. The
//! sort is stable, so records that tie on every rule keep their input order.

use crate::core::property::{NumericKey, Property};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Columns a listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    CreatedAt,
    Deposit,
    MonthlyRent,
    Premium,
    Area,
    TotalPrice,
    MonthlyProfit,
    MonthlyRevenue,
    Yield,
}

impl SortKey {
    /// Numeric attribute behind this key, if it is a numeric column
    pub fn numeric_key(&self) -> Option<NumericKey> {
        match self {
            SortKey::Deposit => Some(NumericKey::Deposit),
            SortKey::MonthlyRent => Some(NumericKey::MonthlyRent),
            SortKey::Premium => Some(NumericKey::Premium),
            SortKey::Area => Some(NumericKey::Area),
            SortKey::TotalPrice => Some(NumericKey::Total),
            SortKey::MonthlyProfit => Some(NumericKey::MonthlyProfit),
            SortKey::MonthlyRevenue => Some(NumericKey::MonthlyRevenue),
            SortKey::Yield => Some(NumericKey::Yield),
            SortKey::Name | SortKey::CreatedAt => None,
        }
    }

    /// Compare two records on this key, ascending
    pub fn compare(&self, a: &Property, b: &Property) -> Ordering {
        if let Some(key) = self.numeric_key() {
            return a.number(key).total_cmp(&b.number(key));
        }
        match self {
            // Day granularity, so same-day records fall through to the next rule.
            SortKey::CreatedAt => day_order(&a.created_day(), &b.created_day()),
            _ => locale_compare(a.name_or_empty(), b.name_or_empty()),
        }
    }
}

/// Calendar days in ascending order; missing or unparsable dates (empty)
/// come after every real date and tie with each other
fn day_order(a: &str, b: &str) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (false, false) => a.cmp(b),
        (a_missing, b_missing) => a_missing.cmp(&b_missing),
    }
}

/// Case-insensitive text ordering; on otherwise equal text lower case sorts first
fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortRule {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortRule {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn asc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}

/// Ordered sort rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    rules: Vec<SortRule>,
}

impl SortSpec {
    pub fn new(rules: Vec<SortRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SortRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compare two records through the full rule chain
    pub fn compare(&self, a: &Property, b: &Property) -> Ordering {
        self.rules
            .iter()
            .map(|rule| rule.direction.apply(rule.key.compare(a, b)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable in-place sort of borrowed records
    pub fn sort(&self, items: &mut [&Property]) {
        if self.rules.is_empty() {
            return;
        }
        items.sort_by(|a, b| self.compare(a, b));
    }

    /// Table-header click: toggle the primary key or sort by a new one
    ///
    /// Replaces every rule. Clicking the current primary key flips its
    /// direction; any other key starts ascending.
    pub fn toggle_header(&mut self, key: SortKey) {
        let direction = match self.rules.first() {
            Some(first) if first.key == key => first.direction.flipped(),
            _ => SortDirection::Asc,
        };
        self.rules = vec![SortRule::new(key, direction)];
    }

    /// Append a rule from the sort picker; keys already present are ignored
    pub fn add_rule(&mut self, key: SortKey) -> bool {
        if self.rules.iter().any(|rule| rule.key == key) {
            return false;
        }
        self.rules.push(SortRule::desc(key));
        true
    }

    pub fn set_direction(&mut self, index: usize, direction: SortDirection) {
        if let Some(rule) = self.rules.get_mut(index) {
            rule.direction = direction;
        }
    }

    pub fn remove_rule(&mut self, index: usize) -> Option<SortRule> {
        (index < self.rules.len()).then(|| self.rules.remove(index))
    }

    /// Drag a rule from one position to another
    pub fn move_rule(&mut self, from: usize, to: usize) {
        if from == to || from >= self.rules.len() {
            return;
        }
        let rule = self.rules.remove(from);
        let to = to.min(self.rules.len());
        self.rules.insert(to, rule);
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }
}

impl From<Vec<SortRule>> for SortSpec {
    fn from(rules: Vec<SortRule>) -> Self {
        Self::new(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(value: serde_json::Value) -> Property {
        Property::from_json(value).expect("valid")
    }

    fn names(items: &[&Property]) -> Vec<String> {
        items.iter().map(|p| p.name_or_empty().to_string()).collect()
    }

    #[test]
    fn test_same_day_falls_through_to_name() {
        let data = vec![
            p(json!({"name": "b", "createdAt": "2024-01-01T09:00:00Z"})),
            p(json!({"name": "a", "createdAt": "2024-01-01T18:00:00Z"})),
            p(json!({"name": "c", "createdAt": "2024-01-02T01:00:00Z"})),
        ];
        let spec = SortSpec::new(vec![
            SortRule::desc(SortKey::CreatedAt),
            SortRule::asc(SortKey::Name),
        ]);
        let mut items: Vec<&Property> = data.iter().collect();
        spec.sort(&mut items);
        assert_eq!(names(&items), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_undated_records_sort_after_dated() {
        let data = vec![
            p(json!({"name": "bad", "createdAt": "someday"})),
            p(json!({"name": "new", "createdAt": "2024-05-01"})),
            p(json!({"name": "none"})),
            p(json!({"name": "old", "createdAt": "2023-01-01"})),
        ];
        let mut items: Vec<&Property> = data.iter().collect();
        SortSpec::new(vec![SortRule::asc(SortKey::CreatedAt)]).sort(&mut items);
        assert_eq!(names(&items), vec!["old", "new", "bad", "none"]);

        SortSpec::new(vec![SortRule::desc(SortKey::CreatedAt)]).sort(&mut items);
        assert_eq!(names(&items), vec!["bad", "none", "new", "old"]);
    }

    #[test]
    fn test_numeric_sort_strips_separators() {
        let data = vec![
            p(json!({"name": "mid", "deposit": "2,000"})),
            p(json!({"name": "low", "deposit": 900})),
            p(json!({"name": "high", "deposit": "10,000"})),
        ];
        let spec = SortSpec::new(vec![SortRule::asc(SortKey::Deposit)]);
        let mut items: Vec<&Property> = data.iter().collect();
        spec.sort(&mut items);
        assert_eq!(names(&items), vec!["low", "mid", "high"]);
    }

    #[test]
    fn test_total_price_sort_is_derived() {
        let data = vec![
            p(json!({"name": "x", "deposit": 100, "premium": 100})),
            p(json!({"name": "y", "deposit": 50, "premium": 300, "totalPrice": 1})),
        ];
        let spec = SortSpec::new(vec![SortRule::desc(SortKey::TotalPrice)]);
        let mut items: Vec<&Property> = data.iter().collect();
        spec.sort(&mut items);
        assert_eq!(names(&items), vec!["y", "x"]);
    }

    #[test]
    fn test_stable_on_full_tie() {
        let data = vec![
            p(json!({"name": "same", "id": "1"})),
            p(json!({"name": "same", "id": "2"})),
            p(json!({"name": "same", "id": "3"})),
        ];
        let spec = SortSpec::new(vec![SortRule::desc(SortKey::Name)]);
        let mut items: Vec<&Property> = data.iter().collect();
        spec.sort(&mut items);
        let ids: Vec<_> = items.iter().map(|p| p.id.clone().unwrap_or_default()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_name_compare_ignores_case() {
        let data = vec![p(json!({"name": "beta"})), p(json!({"name": "Alpha"}))];
        let spec = SortSpec::new(vec![SortRule::asc(SortKey::Name)]);
        let mut items: Vec<&Property> = data.iter().collect();
        spec.sort(&mut items);
        assert_eq!(names(&items), vec!["Alpha", "beta"]);
    }

    #[test]
    fn test_toggle_header() {
        let mut spec = SortSpec::new(vec![
            SortRule::desc(SortKey::CreatedAt),
            SortRule::asc(SortKey::Name),
        ]);
        spec.toggle_header(SortKey::CreatedAt);
        assert_eq!(spec.rules(), &[SortRule::asc(SortKey::CreatedAt)]);

        spec.toggle_header(SortKey::Area);
        assert_eq!(spec.rules(), &[SortRule::asc(SortKey::Area)]);

        spec.toggle_header(SortKey::Area);
        assert_eq!(spec.rules(), &[SortRule::desc(SortKey::Area)]);
    }

    #[test]
    fn test_rule_editing() {
        let mut spec = SortSpec::default();
        assert!(spec.add_rule(SortKey::Deposit));
        assert!(spec.add_rule(SortKey::Name));
        assert!(!spec.add_rule(SortKey::Deposit));
        assert_eq!(spec.rules().len(), 2);

        spec.move_rule(1, 0);
        assert_eq!(spec.rules()[0].key, SortKey::Name);

        spec.set_direction(0, SortDirection::Asc);
        assert_eq!(spec.rules()[0], SortRule::asc(SortKey::Name));

        assert_eq!(spec.remove_rule(5), None);
        assert_eq!(spec.remove_rule(0), Some(SortRule::asc(SortKey::Name)));
        spec.clear();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_serde_shape() {
        let spec = SortSpec::new(vec![SortRule::desc(SortKey::TotalPrice)]);
        let json = serde_json::to_value(&spec).expect("serialize");
        assert_eq!(json, json!([{"key": "totalPrice", "direction": "desc"}]));
    }
}
