//! `stk report` command - Printable stock-count sheet

use clap::ValueEnum;
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::context::Context;
use crate::cli::helpers::write_output;
use crate::cli::GlobalOpts;
use crate::core::report::render_table;
use crate::core::{ReportRenderer, Session};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportType {
    /// Printable HTML page
    #[default]
    Html,
    /// Markdown table
    Md,
    /// Plain-text table
    Text,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReportArgs {
    /// Output type
    #[arg(long = "type", short = 't', value_enum, default_value = "html")]
    pub kind: ReportType,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Heading (default: report_title from config)
    #[arg(long)]
    pub title: Option<String>,
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::open(global)?;
    let session = ctx.session(ctx.status_view())?;
    apply(args, &ctx, &session)
}

pub fn apply(args: ReportArgs, ctx: &Context, session: &Session) -> Result<()> {
    let options = ctx.report_options(args.title.as_deref());
    let store = session.store();

    let content = match args.kind {
        ReportType::Html => ReportRenderer::new()?.render_html(store, &options)?,
        ReportType::Md => render_table(store, &options, true),
        ReportType::Text => render_table(store, &options, false),
    };

    write_output(&content, args.output.as_deref())?;

    if let Some(path) = &args.output {
        if !ctx.quiet {
            println!(
                "{} Count sheet for {} item(s) written to {}",
                style("✓").green(),
                style(store.len()).cyan(),
                style(path.display()).cyan()
            );
        }
    }
    Ok(())
}
