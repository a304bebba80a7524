//! `stk export` command - Write the backup CSV

use console::style;
use miette::{IntoDiagnostic, Result};
use std::io;
use std::path::PathBuf;

use crate::cli::context::Context;
use crate::cli::GlobalOpts;
use crate::core::{backup, Session};

#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::open(global)?;
    let session = ctx.session(ctx.status_view())?;
    apply(args, &ctx, &session)
}

pub fn apply(args: ExportArgs, ctx: &Context, session: &Session) -> Result<()> {
    let store = session.store();
    match args.output {
        Some(path) => {
            backup::export(store, &path)?;
            if !ctx.quiet {
                println!(
                    "{} Exported {} item(s) to {}",
                    style("✓").green(),
                    style(store.len()).cyan(),
                    style(path.display()).cyan()
                );
            }
        }
        None => {
            backup::write_csv(store, io::stdout().lock()).into_diagnostic()?;
        }
    }
    Ok(())
}
