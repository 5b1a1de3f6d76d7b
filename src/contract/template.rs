//! Placeholder substitution and page splitting
//!
//! Rendering is a pure function of the template, the values and the
//! [`TemplateConfig`]; it never fails. A placeholder whose key has no value
//! is replaced by the configured unfilled marker so the gap is visible in
//! the preview and on paper.

use crate::config::TemplateConfig;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").unwrap())
}

/// Split a stored template into its pages
///
/// A template without the delimiter is a single page.
pub fn split_pages<'t>(template: &'t str, delimiter: &str) -> Vec<&'t str> {
    template.split(delimiter).collect()
}

/// Distinct placeholder keys on a page, trimmed, in order of first use
pub fn placeholders(page: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    placeholder_regex()
        .captures_iter(page)
        .map(|caps| caps[1].trim().to_string())
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Text substituted for a value
///
/// `null` renders as an empty string; structured values render as JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Substitute the placeholders of one page
///
/// Each `{{ key }}` is looked up by its trimmed key. Substituted text is not
/// scanned again, so values that happen to contain braces stay literal.
pub fn render_page(page: &str, values: &Map<String, Value>, config: &TemplateConfig) -> String {
    placeholder_regex()
        .replace_all(page, |caps: &regex::Captures| {
            let key = caps[1].trim();
            match values.get(key) {
                Some(value) => value_text(value),
                None => config.unfilled_marker.clone(),
            }
        })
        .into_owned()
}

/// Split a template into pages and render each one
pub fn render(template: &str, values: &Map<String, Value>, config: &TemplateConfig) -> Vec<String> {
    split_pages(template, &config.page_delimiter)
        .into_iter()
        .map(|page| render_page(page, values, config))
        .collect()
}
