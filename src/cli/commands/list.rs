//! `stk list` / `stk show` commands - Browse the inventory
//!
//! `stk search` is an alias of `list`: the query matches a case-insensitive
//! substring of the name or the sku.

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::context::Context;
use crate::cli::table::{print_item, print_items};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Session, StoreError};

#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Search term (substring of name or sku, case-insensitive)
    pub query: Option<String>,

    /// Show only the number of matching items
    #[arg(long)]
    pub count: bool,

    /// Show only items with zero quantity
    #[arg(long)]
    pub empty: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ShowArgs {
    /// Item sku
    pub sku: String,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::open(global)?;
    let session = ctx.session(ctx.status_view())?;
    apply(args, &ctx, &session)
}

pub fn apply(args: ListArgs, ctx: &Context, session: &Session) -> Result<()> {
    let store = session.store();
    let mut items = match args.query.as_deref() {
        Some(query) => store.search(query),
        None => store.iter().collect(),
    };
    if args.empty {
        items.retain(|i| i.quantity == 0);
    }

    if args.count {
        println!("{}", items.len());
        return Ok(());
    }

    if items.is_empty() && matches!(ctx.format, OutputFormat::Auto | OutputFormat::Tsv) {
        if !ctx.quiet {
            match args.query {
                Some(query) => println!("No items match '{}'", style(query).yellow()),
                None => println!(
                    "No items yet. Use {} or {} to add some.",
                    style("stk add").yellow(),
                    style("stk import").yellow()
                ),
            }
        }
        return Ok(());
    }

    print_items(&items, ctx.format, !ctx.quiet)
}

pub fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::open(global)?;
    let session = ctx.session(ctx.status_view())?;
    apply_show(args, &ctx, &session)
}

pub fn apply_show(args: ShowArgs, ctx: &Context, session: &Session) -> Result<()> {
    let item = session
        .store()
        .get(&args.sku)
        .ok_or(StoreError::NotFound { sku: args.sku })?;

    match ctx.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", item.sku),
        OutputFormat::Csv | OutputFormat::Md => print_items(&[item], ctx.format, false)?,
        OutputFormat::Auto | OutputFormat::Tsv => {
            print_item(item, ctx.config.placeholder_image())
        }
    }
    Ok(())
}
