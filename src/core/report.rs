//! Printable stock-count sheet
//!
//! Both renderers are read-only projections of the store: every row is
//! rendered with its system quantity and an empty column for the physical
//! count written by hand.

use chrono::NaiveDate;
use miette::Diagnostic;
use rust_embed::Embed;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};
use tera::Tera;
use thiserror::Error;

use crate::core::item::format_date;
use crate::core::store::RecordStore;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const COUNT_SHEET: &str = "count_sheet.html";

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("Template not found: {0}")]
    #[diagnostic(code(stk::report::template_missing))]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    #[diagnostic(code(stk::report::render))]
    RenderError(String),
}

/// Presentation settings for a count sheet
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub date: NaiveDate,
    pub placeholder_image: String,
}

#[derive(Debug, Serialize)]
struct SheetRow<'a> {
    image: &'a str,
    name: &'a str,
    sku: &'a str,
    quantity: u32,
}

/// Renders count sheets from embedded templates
pub struct ReportRenderer {
    tera: Tera,
}

impl ReportRenderer {
    pub fn new() -> Result<Self, ReportError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                let template_str = std::str::from_utf8(&content.data)
                    .map_err(|e| ReportError::RenderError(e.to_string()))?;
                tera.add_raw_template(filename, template_str)
                    .map_err(|e| ReportError::RenderError(e.to_string()))?;
            }
        }

        Ok(Self { tera })
    }

    /// HTML count sheet for screen preview or printing (values are escaped)
    pub fn render_html(
        &self,
        store: &RecordStore,
        options: &ReportOptions,
    ) -> Result<String, ReportError> {
        if !self.tera.get_template_names().any(|n| n == COUNT_SHEET) {
            return Err(ReportError::NotFound(COUNT_SHEET.to_string()));
        }

        let rows: Vec<SheetRow> = store
            .iter()
            .map(|item| SheetRow {
                image: item.image_or(&options.placeholder_image),
                name: &item.name,
                sku: &item.sku,
                quantity: item.quantity,
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("title", &options.title);
        context.insert("date", &format_date(options.date));
        context.insert("rows", &rows);
        context.insert("total", &store.total_quantity());

        self.tera
            .render(COUNT_SHEET, &context)
            .map_err(|e| ReportError::RenderError(e.to_string()))
    }
}

/// Count sheet as a plain-text or Markdown table
pub fn render_table(store: &RecordStore, options: &ReportOptions, markdown: bool) -> String {
    let mut output = String::new();
    if markdown {
        output.push_str(&format!("# {}\n\n", options.title));
        output.push_str(&format!("Printed: {}\n\n", format_date(options.date)));
    } else {
        output.push_str(&format!("{}  (printed {})\n", options.title, format_date(options.date)));
    }

    let mut builder = Builder::default();
    builder.push_record(["Image", "Name", "SKU", "System Qty", "Counted Qty"]);
    for item in store.iter() {
        builder.push_record([
            item.image_or(&options.placeholder_image).to_string(),
            item.name.clone(),
            item.sku.clone(),
            item.quantity.to_string(),
            String::new(),
        ]);
    }

    let mut table = builder.build();
    if markdown {
        table.with(Style::markdown());
    } else {
        table.with(Style::modern());
    }
    output.push_str(&table.to_string());
    output.push('\n');

    if markdown {
        output.push_str("\nCounted by: ____________________\n");
    } else {
        output.push_str("Counted by: ____________________\n");
    }
    output
}
