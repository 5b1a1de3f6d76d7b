//! Staff directory used to resolve manager ids to display names

use crate::core::property::Property;
use serde::{Deserialize, Serialize};

/// A staff member who can be assigned to listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub id: String,
    pub name: String,
}

impl Manager {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The company's managers, as fetched from the users endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagerDirectory {
    managers: Vec<Manager>,
}

impl ManagerDirectory {
    pub fn new(managers: Vec<Manager>) -> Self {
        Self { managers }
    }

    pub fn managers(&self) -> &[Manager] {
        &self.managers
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// Display names of the managers whose id is in `ids`
    pub fn names_for(&self, ids: &[String]) -> Vec<&str> {
        self.managers
            .iter()
            .filter(|m| ids.contains(&m.id))
            .map(|m| m.name.as_str())
            .collect()
    }

    /// Name to show for a record's manager
    ///
    /// A directory hit on `managerId` wins; otherwise the record's own
    /// `managerName`, then `manager`, then `"-"`.
    pub fn display_name<'a>(&'a self, property: &'a Property) -> &'a str {
        property
            .manager_id
            .as_ref()
            .and_then(|id| self.managers.iter().find(|m| &m.id == id))
            .map(|m| m.name.as_str())
            .or(property.manager_name.as_deref())
            .or(property.manager.as_deref())
            .unwrap_or("-")
    }
}
