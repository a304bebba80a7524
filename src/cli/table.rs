//! Item list output for every `--format`
//!
//! TSV/Auto and Id stay single-line per item so they pipe cleanly.

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::core::backup;
use crate::core::item::{format_date, Item};
use crate::core::RecordStore;

const NAME_WIDTH: usize = 32;

/// Render items in the requested format
pub fn render_items(items: &[&Item], format: OutputFormat, show_summary: bool) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            out = serde_json::to_string_pretty(items).into_diagnostic()?;
            out.push('\n');
        }
        OutputFormat::Csv => {
            let store = RecordStore::from_items(items.iter().map(|i| (*i).clone()).collect());
            let mut buf = Vec::new();
            backup::write_csv(&store, &mut buf).into_diagnostic()?;
            out = String::from_utf8_lossy(&buf).into_owned();
        }
        OutputFormat::Md => {
            let mut builder = Builder::default();
            builder.push_record(["SKU", "Name", "Qty", "Last modified", "Image"]);
            for item in items {
                builder.push_record([
                    item.sku.clone(),
                    item.name.clone(),
                    item.quantity.to_string(),
                    format_date(item.last_modified),
                    item.image_url.clone(),
                ]);
            }
            let mut table = builder.build();
            table.with(Style::markdown());
            out.push_str(&table.to_string());
            out.push('\n');
        }
        OutputFormat::Id => {
            for item in items {
                out.push_str(&item.sku);
                out.push('\n');
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            let sku_width = items
                .iter()
                .map(|i| i.sku.chars().count())
                .max()
                .unwrap_or(0)
                .max(3);
            let name_width = NAME_WIDTH;

            out.push_str(&format!(
                "{}\n",
                style(format!(
                    "{:<sku_width$}  {:<name_width$}  {:>6}  {}",
                    "SKU", "NAME", "QTY", "MODIFIED"
                ))
                .bold()
            ));
            out.push_str(&format!("{}\n", "-".repeat(sku_width + name_width + 22)));
            for item in items {
                let qty = if item.quantity == 0 {
                    style(item.quantity.to_string()).red().to_string()
                } else {
                    item.quantity.to_string()
                };
                out.push_str(&format!(
                    "{}  {}  {:>6}  {}\n",
                    style(format!("{:<sku_width$}", item.sku)).cyan(),
                    pad(&truncate_str(&item.name, name_width), name_width),
                    qty,
                    style(format_date(item.last_modified)).dim()
                ));
            }
            if show_summary {
                out.push_str(&format!("\n{} item(s) found\n", style(items.len()).cyan()));
            }
        }
    }
    Ok(out)
}

pub fn print_items(items: &[&Item], format: OutputFormat, show_summary: bool) -> Result<()> {
    print!("{}", render_items(items, format, show_summary)?);
    Ok(())
}

/// Left-align by characters, not bytes
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// Print a single item as a field list
pub fn print_item(item: &Item, placeholder: &str) {
    println!("{}: {}", style("SKU").bold(), style(&item.sku).cyan());
    println!("{}: {}", style("Name").bold(), item.name);
    println!("{}: {}", style("Quantity").bold(), item.quantity);
    println!(
        "{}: {}",
        style("Last modified").bold(),
        format_date(item.last_modified)
    );
    if item.image_url.is_empty() {
        println!(
            "{}: {} {}",
            style("Image").bold(),
            placeholder,
            style("(placeholder)").dim()
        );
    } else {
        println!("{}: {}", style("Image").bold(), item.image_url);
    }
}
