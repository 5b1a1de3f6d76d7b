//! Fallback chains for fields that have more than one spelling
//!
//! Older records were written by spreadsheet imports and earlier versions
//! of the listing form, so the same concept can live under different keys.
//! Each chain is an ordered list tried front to back; the first alias that
//! holds a non-blank value wins.

use crate::core::field::NumericField;
use crate::core::manager::ManagerDirectory;
use crate::core::property::Property;

/// One place a numeric concept can be read from
pub struct Alias {
    /// Wire name of the field, for diagnostics
    pub field: &'static str,
    read: fn(&Property) -> Option<&NumericField>,
}

impl Alias {
    pub fn read<'a>(&self, property: &'a Property) -> Option<&'a NumericField> {
        (self.read)(property)
    }
}

fn area(p: &Property) -> Option<&NumericField> {
    p.area.as_ref()
}
fn floor(p: &Property) -> Option<&NumericField> {
    p.floor.as_ref()
}
fn current_floor(p: &Property) -> Option<&NumericField> {
    p.current_floor.as_ref()
}
fn deposit(p: &Property) -> Option<&NumericField> {
    p.deposit.as_ref()
}
fn monthly_rent(p: &Property) -> Option<&NumericField> {
    p.monthly_rent.as_ref()
}
fn premium(p: &Property) -> Option<&NumericField> {
    p.premium.as_ref()
}
fn monthly_profit(p: &Property) -> Option<&NumericField> {
    p.monthly_profit.as_ref()
}
fn monthly_income(p: &Property) -> Option<&NumericField> {
    p.monthly_income.as_ref()
}
fn monthly_revenue(p: &Property) -> Option<&NumericField> {
    p.monthly_revenue.as_ref()
}
fn yield_percent(p: &Property) -> Option<&NumericField> {
    p.yield_percent.as_ref()
}

pub const AREA: &[Alias] = &[Alias { field: "area", read: area }];

/// `currentFloor` is only consulted when `floor` is absent or blank.
pub const FLOOR: &[Alias] = &[
    Alias { field: "floor", read: floor },
    Alias { field: "currentFloor", read: current_floor },
];

pub const DEPOSIT: &[Alias] = &[Alias { field: "deposit", read: deposit }];

pub const MONTHLY_RENT: &[Alias] = &[Alias { field: "monthlyRent", read: monthly_rent }];

pub const PREMIUM: &[Alias] = &[Alias { field: "premium", read: premium }];

/// `monthlyIncome` is the pre-rename spelling of `monthlyProfit`.
pub const MONTHLY_PROFIT: &[Alias] = &[
    Alias { field: "monthlyProfit", read: monthly_profit },
    Alias { field: "monthlyIncome", read: monthly_income },
];

pub const MONTHLY_REVENUE: &[Alias] = &[Alias { field: "monthlyRevenue", read: monthly_revenue }];

pub const YIELD: &[Alias] = &[Alias { field: "yieldPercent", read: yield_percent }];

/// First alias in `chain` holding a non-blank value
pub fn first_present<'a>(property: &'a Property, chain: &[Alias]) -> Option<&'a NumericField> {
    chain
        .iter()
        .filter_map(|alias| alias.read(property))
        .find(|value| !value.is_blank())
}

// =============================================================================
// Manager matching
// =============================================================================

/// A way of deciding whether a record belongs to one of the selected managers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerStrategy {
    /// Precondition: the record carries a non-empty `managerId`.
    /// Matches when that id is among the selected ids.
    ById,
    /// Precondition: the record has no `managerId` (legacy data).
    /// Selected ids are resolved to display names through the directory and
    /// matched against `managerName` or `manager`.
    ByLegacyName,
}

/// Strategies in the order they are tried; the first whose precondition
/// holds decides the outcome, later ones are not consulted.
pub const MANAGER_STRATEGIES: [ManagerStrategy; 2] =
    [ManagerStrategy::ById, ManagerStrategy::ByLegacyName];

impl ManagerStrategy {
    pub fn applies(&self, property: &Property) -> bool {
        let has_id = property
            .manager_id
            .as_deref()
            .is_some_and(|id| !id.is_empty());
        match self {
            ManagerStrategy::ById => has_id,
            ManagerStrategy::ByLegacyName => !has_id,
        }
    }

    pub fn matches(
        &self,
        property: &Property,
        selected_ids: &[String],
        directory: &ManagerDirectory,
    ) -> bool {
        match self {
            ManagerStrategy::ById => property
                .manager_id
                .as_ref()
                .is_some_and(|id| selected_ids.contains(id)),
            ManagerStrategy::ByLegacyName => {
                let names = directory.names_for(selected_ids);
                [property.manager_name.as_deref(), property.manager.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|name| names.contains(&name))
            }
        }
    }
}

/// Run the manager strategy chain for one record
pub fn manager_matches(
    property: &Property,
    selected_ids: &[String],
    directory: &ManagerDirectory,
) -> bool {
    MANAGER_STRATEGIES
        .iter()
        .find(|strategy| strategy.applies(property))
        .is_some_and(|strategy| strategy.matches(property, selected_ids, directory))
}
