//! `stk import` command - Bulk-import items from CSV, TSV or spreadsheet files
//!
//! Source headers are matched against the canonical field synonyms (see
//! `data/headers.yaml`, extendable through the `headers:` config key). Rows
//! are merged by sku: existing items are overwritten, new ones appended.

use console::style;
use miette::{miette, Result};
use std::path::PathBuf;

use crate::cli::context::{with_session, Context};
use crate::cli::GlobalOpts;
use crate::core::item::{format_date, today};
use crate::core::{Change, Field, ImportOutcome, Session};

#[derive(clap::Args, Debug, Clone)]
pub struct ImportArgs {
    /// File to import (.csv, .tsv, .xlsx, .xlsm, .xls, .ods)
    pub file: Option<PathBuf>,

    /// Worksheet to read (default: the first one)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Show what would change without saving
    #[arg(long)]
    pub dry_run: bool,

    /// Print a CSV template with the canonical headers
    #[arg(long)]
    pub template: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    if args.template {
        print_template();
        return Ok(());
    }
    with_session(global, |ctx, session| apply(args, ctx, session))
}

pub fn apply(args: ImportArgs, ctx: &Context, session: &mut Session) -> Result<()> {
    if args.template {
        print_template();
        return Ok(());
    }

    let file_path = args
        .file
        .ok_or_else(|| miette!("File required. Usage: stk import inventory.xlsx"))?;
    let headers = ctx.headers()?;

    if !ctx.quiet {
        println!(
            "{} Importing items from {}{}",
            style("→").blue(),
            style(file_path.display()).yellow(),
            if args.dry_run {
                style(" (dry run)").dim().to_string()
            } else {
                String::new()
            }
        );
    }

    let outcome = session.import_file(&file_path, args.sheet.as_deref(), &headers, args.dry_run)?;

    if !ctx.quiet {
        print_summary(&outcome, args.dry_run);
    }
    Ok(())
}

/// Summary block shared with `stk pull`
pub fn print_summary(outcome: &ImportOutcome, dry_run: bool) {
    let report = &outcome.report;

    println!();
    println!("{}", style("─".repeat(50)).dim());
    println!("{}", style("Import Summary").bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  Rows read:        {}", style(report.rows_read).cyan());
    match outcome.change {
        Change::Merged { inserted, updated } => {
            println!("  Items created:    {}", style(inserted).green());
            if updated > 0 {
                println!("  Items updated:    {}", style(updated).yellow());
            }
        }
        Change::Replaced { count } => {
            println!("  Items loaded:     {}", style(count).green());
        }
        _ => {}
    }
    if report.skipped > 0 {
        println!(
            "  Skipped:          {} {}",
            style(report.skipped).dim(),
            style("(empty sku)").dim()
        );
    }
    if !report.dropped_columns.is_empty() {
        println!(
            "  Ignored columns:  {}",
            style(report.dropped_columns.join(", ")).dim()
        );
    }
    if !report.synthesized.is_empty() {
        let fields: Vec<&str> = report.synthesized.iter().map(Field::as_str).collect();
        println!("  Defaulted fields: {}", style(fields.join(", ")).dim());
    }

    if dry_run {
        println!();
        println!("{}", style("Dry run complete. Nothing was saved.").yellow());
    }
}

fn print_template() {
    println!("{}", Field::header_row().join(","));
    println!(
        "A-100,Example item,https://example.com/a-100.png,12,{}",
        format_date(today())
    );
}
