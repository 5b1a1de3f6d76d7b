//! Printable listing reports
//!
//! Renders the records of a listing (usually every record that matches the
//! current filters, in sorted order) as a standalone HTML document sized for
//! A4 landscape. The HTML comes from a [`tera`] template with autoescaping,
//! so record text can never inject markup.

use crate::core::error::ReportError;
use crate::core::field::{calendar_day, format_thousands};
use crate::core::manager::ManagerDirectory;
use crate::core::property::{NumericKey, Property};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "listing_report.html";

/// Default report layout
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="ko">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
  @page { size: A4 landscape; margin: 12mm; }
  body { font-family: sans-serif; font-size: 11px; }
  h1 { font-size: 18px; margin: 0 0 4px; }
  .meta { color: #666; margin-bottom: 12px; }
  table { width: 100%; border-collapse: collapse; }
  th, td { border: 1px solid #ccc; padding: 3px 5px; }
  th { background: #f3f3f3; }
  td.num { text-align: right; }
  tr { page-break-inside: avoid; }
</style>
</head>
<body>
<h1>{{ title }}</h1>
<div class="meta">{{ generated_on }} · {{ total }}건</div>
<table>
<thead><tr>{% for column in columns %}<th>{{ column }}</th>{% endfor %}</tr></thead>
<tbody>
{% for row in rows %}<tr>{% for cell in row %}<td{% if cell.numeric %} class="num"{% endif %}>{{ cell.text }}</td>{% endfor %}</tr>
{% endfor %}</tbody>
</table>
</body>
</html>
"#;

/// Header text of a listing column
pub fn column_label(column: &str) -> &str {
    match column {
        "no" => "NO",
        "isFavorite" => "★",
        "processStatus" => "진행상황",
        "name" => "물건명",
        "grade" | "status" => "물건등급",
        "address" => "주소",
        "type" => "업종(중분류)",
        "industryDetail" => "업종(소분류)",
        "operationType" => "운영형태",
        "features" => "특징",
        "floor" => "층수",
        "area" => "면적",
        "deposit" => "보증금",
        "monthlyRent" => "임대료",
        "premium" => "권리금",
        "totalPrice" => "합계",
        "monthlyProfit" => "월순수익",
        "monthlyRevenue" => "월매출",
        "yield" => "수익률",
        "manager" => "담당자",
        "createdAt" => "등록일",
        "updatedAt" => "최종작성",
        other => other,
    }
}

fn numeric_column(column: &str) -> Option<NumericKey> {
    match column {
        "floor" => Some(NumericKey::Floor),
        "area" => Some(NumericKey::Area),
        "deposit" => Some(NumericKey::Deposit),
        "monthlyRent" => Some(NumericKey::MonthlyRent),
        "premium" => Some(NumericKey::Premium),
        "totalPrice" => Some(NumericKey::Total),
        "monthlyProfit" => Some(NumericKey::MonthlyProfit),
        "monthlyRevenue" => Some(NumericKey::MonthlyRevenue),
        "yield" => Some(NumericKey::Yield),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    pub numeric: bool,
}

/// Text of one table cell
///
/// `row_number` is the 1-based position shown in the `no` column.
pub fn cell(property: &Property, column: &str, row_number: usize, directory: &ManagerDirectory) -> Cell {
    if let Some(key) = numeric_column(column) {
        return Cell {
            text: format_thousands(property.number(key)),
            numeric: true,
        };
    }

    let text = match column {
        "no" => row_number.to_string(),
        "isFavorite" => (if property.is_favorite() { "★" } else { "" }).to_string(),
        "manager" => directory.display_name(property).to_string(),
        "type" => property.industry_sector.clone().unwrap_or_default(),
        "createdAt" => property.created_day(),
        "updatedAt" => property
            .updated_at
            .as_deref()
            .map(calendar_day)
            .unwrap_or_default(),
        other => property.text(other),
    };
    Cell {
        text,
        numeric: column == "no",
    }
}

/// A printable table of listings
#[derive(Debug, Clone)]
pub struct ListingReport {
    title: String,
    columns: Vec<String>,
    template: String,
}

impl ListingReport {
    pub fn new(title: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            title: title.into(),
            columns,
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Replace the layout; the template sees `title`, `generated_on`,
    /// `total`, `columns` (labels) and `rows` (lists of `{text, numeric}`)
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Table rows for `items`, numbered from 1
    pub fn rows(&self, items: &[&Property], directory: &ManagerDirectory) -> Vec<Vec<Cell>> {
        items
            .iter()
            .enumerate()
            .map(|(i, property)| {
                self.columns
                    .iter()
                    .map(|column| cell(property, column, i + 1, directory))
                    .collect()
            })
            .collect()
    }

    pub fn render(
        &self,
        items: &[&Property],
        directory: &ManagerDirectory,
        generated_on: NaiveDate,
    ) -> Result<String> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, &self.template)
            .map_err(|e| ReportError::Template {
                message: e.to_string(),
            })?;

        let labels: Vec<&str> = self.columns.iter().map(|c| column_label(c)).collect();
        let mut context = Context::new();
        context.insert("title", &self.title);
        context.insert("generated_on", &generated_on.format("%Y-%m-%d").to_string());
        context.insert("total", &items.len());
        context.insert("columns", &labels);
        context.insert("rows", &self.rows(items, directory));

        let html = tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| ReportError::Render {
                message: e.to_string(),
            })?;

        tracing::debug!(rows = items.len(), columns = self.columns.len(), "Rendered listing report");
        Ok(html)
    }
}
