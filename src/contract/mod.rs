//! Contract documents: templates, form schemas and rendering
//!
//! A [`ContractTemplate`] is an HTML body with `{{key}}` placeholders, split
//! into pages by a delimiter comment, plus the form fields that fill it. A
//! [`ContractProject`] holds data shared by all its documents; each
//! [`ContractDocument`] overlays its own form data on top.

pub mod schema;
pub mod template;

pub use schema::{
    ContractDocument, ContractProject, ContractTemplate, FieldType, FormField, effective_data,
};
pub use template::{placeholders, render, render_page, split_pages};
