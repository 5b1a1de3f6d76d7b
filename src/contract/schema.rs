//! Contract templates, their form schemas and document data

use crate::config::TemplateConfig;
use crate::contract::template::{placeholders, render, split_pages};
use crate::core::field::format_thousands;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Input widget kind of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Money,
    Currency,
    Date,
    Textarea,
    /// Heading that groups the fields after it; holds no value
    Section,
    /// Read-only explanatory text; holds no value
    Info,
}

impl FieldType {
    /// Whether the field collects a value
    pub fn is_input(&self) -> bool {
        !matches!(self, FieldType::Section | FieldType::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Placeholder key, e.g. `downPayment`
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTemplate {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub form_schema: Vec<FormField>,
    #[serde(default)]
    pub html_template: String,
}

impl ContractTemplate {
    pub fn pages<'t>(&'t self, config: &TemplateConfig) -> Vec<&'t str> {
        split_pages(&self.html_template, &config.page_delimiter)
    }

    pub fn page_count(&self, config: &TemplateConfig) -> usize {
        self.pages(config).len()
    }

    /// Form fields used on page `index`
    ///
    /// A field belongs to the page when its key, or its label, appears as a
    /// placeholder there. Out-of-range pages have no fields.
    pub fn page_schema(&self, index: usize, config: &TemplateConfig) -> Vec<&FormField> {
        let Some(page) = self.pages(config).get(index).copied() else {
            return Vec::new();
        };
        let keys = placeholders(page);
        self.form_schema
            .iter()
            .filter(|field| keys.contains(&field.key) || keys.contains(&field.label))
            .collect()
    }

    /// Form data pre-filled from the fields' default values
    pub fn default_form_data(&self) -> Map<String, Value> {
        self.form_schema
            .iter()
            .filter_map(|field| {
                field
                    .default_value
                    .as_ref()
                    .map(|value| (field.key.clone(), value.clone()))
            })
            .collect()
    }

    /// Required input fields that have no usable value in `data`
    pub fn missing_required<'t>(&'t self, data: &Map<String, Value>) -> Vec<&'t FormField> {
        self.form_schema
            .iter()
            .filter(|field| field.required && field.field_type.is_input())
            .filter(|field| match data.get(&field.key) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            })
            .collect()
    }

    pub fn render(&self, data: &Map<String, Value>, config: &TemplateConfig) -> Vec<String> {
        render(&self.html_template, data, config)
    }
}

/// One filled-in document of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDocument {
    pub id: String,
    pub project_id: String,
    pub template_id: String,
    pub name: String,
    /// Overrides the project's common data where keys match
    #[serde(default)]
    pub form_data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A deal with its shared data and the documents drawn up for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractProject {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub common_data: Map<String, Value>,
    #[serde(default)]
    pub documents: Vec<ContractDocument>,
}

impl ContractProject {
    pub fn document(&self, id: &str) -> Option<&ContractDocument> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Values for rendering document `id`
    pub fn document_data(&self, id: &str) -> Option<Map<String, Value>> {
        self.document(id)
            .map(|doc| effective_data(&self.common_data, &doc.form_data))
    }
}

/// Project data overlaid with document data, plus formatted numbers
///
/// Every numeric value `key` also gets a `key_fmt` entry with thousands
/// separators (`1500000` becomes `"1,500,000"`).
pub fn effective_data(common: &Map<String, Value>, form: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = common.clone();
    for (key, value) in form {
        merged.insert(key.clone(), value.clone());
    }

    let formatted: Vec<(String, Value)> = merged
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_f64()
                .map(|n| (format!("{}_fmt", key), Value::String(format_thousands(n))))
        })
        .collect();
    merged.extend(formatted);
    merged
}
