//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::sort::{SortKey, SortRule};
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Page-break marker inserted by the contract editor
pub const DEFAULT_PAGE_DELIMITER: &str = "<!-- GENUINE_PAGE_BREAK -->";

/// Shown in place of placeholders that have no value
pub const DEFAULT_UNFILLED_MARKER: &str =
    r#"<span style="background:#fff5f5; color:red;">[미입력]</span>"#;

/// Narrowest width a column can be dragged to, in pixels
pub const MIN_COLUMN_WIDTH: u32 = 30;

/// Width of a column with no configured width, in pixels
pub const FALLBACK_COLUMN_WIDTH: u32 = 100;

/// Table columns of the listing grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Known columns and their default widths in pixels, in default order
    pub widths: IndexMap<String, u32>,

    /// Default display order
    pub order: Vec<String>,

    /// Columns shown by default
    pub visible: Vec<String>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        let widths: IndexMap<String, u32> = [
            ("no", 50),
            ("isFavorite", 40),
            ("processStatus", 80),
            ("name", 200),
            ("grade", 80),
            ("address", 250),
            ("status", 80),
            ("type", 100),
            ("industryDetail", 100),
            ("operationType", 100),
            ("features", 150),
            ("floor", 60),
            ("area", 80),
            ("deposit", 100),
            ("monthlyRent", 100),
            ("premium", 100),
            ("totalPrice", 100),
            ("monthlyProfit", 100),
            ("monthlyRevenue", 100),
            ("yield", 80),
            ("manager", 80),
            ("createdAt", 100),
            ("updatedAt", 100),
        ]
        .into_iter()
        .map(|(k, w)| (k.to_string(), w))
        .collect();

        let order = [
            "no", "isFavorite", "processStatus", "grade", "name", "address", "status", "type",
            "industryDetail", "operationType", "features", "floor", "area", "deposit",
            "monthlyRent", "premium", "totalPrice", "monthlyProfit", "monthlyRevenue", "yield",
            "manager", "createdAt", "updatedAt",
        ];

        let visible = widths
            .keys()
            .filter(|k| k.as_str() != "yield")
            .cloned()
            .collect();

        Self {
            widths,
            order: order.iter().map(|k| k.to_string()).collect(),
            visible,
        }
    }
}

impl ColumnLayout {
    /// Whether `column` is a known column
    pub fn is_known(&self, column: &str) -> bool {
        self.widths.contains_key(column)
    }

    /// Configured default width of `column`
    pub fn width(&self, column: &str) -> u32 {
        self.widths
            .get(column)
            .copied()
            .unwrap_or(FALLBACK_COLUMN_WIDTH)
    }

    /// Reconcile a saved order with the known columns
    ///
    /// Duplicates and unknown columns are dropped; known columns missing from
    /// `saved` are appended in their default order.
    pub fn reconcile_order(&self, saved: impl IntoIterator<Item = String>) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut order: Vec<String> = saved
            .into_iter()
            .filter(|k| self.is_known(k) && seen.insert(k.clone()))
            .collect();

        for key in self.widths.keys() {
            if !seen.contains(key) {
                order.push(key.clone());
            }
        }
        order
    }
}

/// Contract template rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Literal that separates pages in a stored template
    pub page_delimiter: String,

    /// HTML substituted for placeholders with no value
    pub unfilled_marker: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            page_delimiter: DEFAULT_PAGE_DELIMITER.to_string(),
            unfilled_marker: DEFAULT_UNFILLED_MARKER.to_string(),
        }
    }
}

/// Where and how much to fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL of the backend, e.g. `https://erp.example.com`
    pub base_url: Option<String>,

    /// Cap on records per property list request
    pub limit: Option<usize>,
}

/// Complete configuration for the listing view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Page size used until the user picks another
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,

    /// Page sizes offered by the pagination control
    #[serde(default = "default_page_sizes")]
    pub page_sizes: Vec<usize>,

    /// Sort rules used when the user has none saved
    #[serde(default = "default_sort")]
    pub default_sort: Vec<SortRule>,

    #[serde(default)]
    pub columns: ColumnLayout,

    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    /// Directory for the file-backed preference store
    #[serde(default)]
    pub preferences_dir: Option<String>,
}

fn default_items_per_page() -> usize {
    20
}

fn default_page_sizes() -> Vec<usize> {
    vec![20, 50, 100]
}

fn default_sort() -> Vec<SortRule> {
    vec![SortRule::desc(SortKey::CreatedAt)]
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl ListingConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_string(),
                }
            } else {
                ConfigError::ParseError {
                    file: Some(path.to_string()),
                    message: e.to_string(),
                }
            }
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the listing view cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "items_per_page".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(size) = self.page_sizes.iter().find(|s| **s == 0) {
            return Err(ConfigError::InvalidValue {
                field: "page_sizes".to_string(),
                value: size.to_string(),
                message: "page sizes must be at least 1".to_string(),
            });
        }
        if !self.page_sizes.is_empty() && !self.page_sizes.contains(&self.items_per_page) {
            return Err(ConfigError::InvalidValue {
                field: "items_per_page".to_string(),
                value: self.items_per_page.to_string(),
                message: format!("must be one of page_sizes {:?}", self.page_sizes),
            });
        }
        if self.template.page_delimiter.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "template.page_delimiter".to_string(),
                value: String::new(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Create the default configuration
    pub fn default_config() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            page_sizes: default_page_sizes(),
            default_sort: default_sort(),
            columns: ColumnLayout::default(),
            template: TemplateConfig::default(),
            fetch: FetchConfig::default(),
            preferences_dir: None,
        }
    }
}
