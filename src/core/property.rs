//! The listing record and its typed accessor layer

use crate::core::field::{NumericField, calendar_day, lenient_flag, lenient_text};
use crate::core::resolve;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A property listing as returned by the backend
///
/// Every field may be absent. Fields the pipeline never inspects directly
/// are kept in `extra` so that text search still sees them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Property {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub industry_sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub industry_detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub operation_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<NumericField>,
    /// Legacy spelling of `floor`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_floor: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_rent: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_profit: Option<NumericField>,
    /// Legacy spelling of `monthlyProfit`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<NumericField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yield_percent: Option<NumericField>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub manager_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub manager_name: Option<String>,
    /// Free-text manager name from spreadsheet imports
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub manager: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_flag")]
    pub is_favorite: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Numeric attributes that can be filtered or sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKey {
    Area,
    Floor,
    Deposit,
    MonthlyRent,
    Premium,
    /// Derived: `deposit + premium`
    Total,
    MonthlyProfit,
    MonthlyRevenue,
    Yield,
}

impl Property {
    /// Build a record from loosely-typed JSON
    pub fn from_json(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Read a numeric attribute, defaulting to zero
    ///
    /// `Total` is recomputed from its two sources on every call.
    pub fn number(&self, key: NumericKey) -> f64 {
        let read = |chain: &[resolve::Alias]| {
            resolve::first_present(self, chain)
                .map(NumericField::as_f64)
                .unwrap_or(0.0)
        };

        match key {
            NumericKey::Area => read(resolve::AREA),
            NumericKey::Floor => read(resolve::FLOOR),
            NumericKey::Deposit => read(resolve::DEPOSIT),
            NumericKey::MonthlyRent => read(resolve::MONTHLY_RENT),
            NumericKey::Premium => read(resolve::PREMIUM),
            NumericKey::Total => read(resolve::DEPOSIT) + read(resolve::PREMIUM),
            NumericKey::MonthlyProfit => read(resolve::MONTHLY_PROFIT),
            NumericKey::MonthlyRevenue => read(resolve::MONTHLY_REVENUE),
            NumericKey::Yield => read(resolve::YIELD),
        }
    }

    /// Name, or an empty string
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Calendar day of `createdAt`, or an empty string
    pub fn created_day(&self) -> String {
        self.created_at.as_deref().map(calendar_day).unwrap_or_default()
    }

    /// Favorite flag; absent means not a favorite
    pub fn is_favorite(&self) -> bool {
        self.is_favorite.unwrap_or(false)
    }

    /// Display text of a non-numeric field, by its wire name
    ///
    /// Fields outside the typed set are read from `extra`; arrays are joined
    /// with `", "`. Absent fields are empty.
    pub fn text(&self, field: &str) -> String {
        let typed = match field {
            "id" => &self.id,
            "name" => &self.name,
            "address" => &self.address,
            "status" => &self.status,
            "industrySector" => &self.industry_sector,
            "industryDetail" => &self.industry_detail,
            "operationType" => &self.operation_type,
            "managerId" => &self.manager_id,
            "managerName" => &self.manager_name,
            "manager" => &self.manager,
            "createdAt" => &self.created_at,
            "updatedAt" => &self.updated_at,
            _ => return self.extra.get(field).map(value_text).unwrap_or_default(),
        };
        typed.clone().unwrap_or_default()
    }

    /// Lower-cased JSON rendering of the whole record, used by text search
    ///
    /// Key names are part of the rendering, so a search for `deposit`
    /// matches every record that has a deposit field.
    pub fn search_blob(&self) -> String {
        serde_json::to_string(self)
            .map(|s| s.to_lowercase())
            .unwrap_or_default()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
