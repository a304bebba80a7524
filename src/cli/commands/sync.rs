//! `stk pull` / `stk push` commands - Whole-table remote sync
//!
//! Pull replaces every local item with the remote sheet; push overwrites the
//! remote sheet with every local item. Neither merges.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::import::print_summary;
use crate::cli::context::{with_session, Context};
use crate::cli::helpers::interactive;
use crate::cli::GlobalOpts;
use crate::core::{HttpSheet, RemoteSheet, Session};

#[derive(clap::Args, Debug, Clone)]
pub struct PullArgs {
    /// Sheet (tab) to read instead of the configured one
    #[arg(long)]
    pub sheet: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PushArgs {
    /// Sheet (tab) to write instead of the configured one
    #[arg(long)]
    pub sheet: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

fn remote_for(ctx: &Context, sheet: Option<String>) -> Result<HttpSheet> {
    let mut settings = ctx.config.remote.clone();
    if sheet.is_some() {
        settings.sheet = sheet;
    }
    Ok(HttpSheet::from_settings(&settings)?)
}

fn confirm(prompt: String) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

pub fn run_pull(args: PullArgs, global: &GlobalOpts) -> Result<()> {
    with_session(global, |ctx, session| apply_pull(args, ctx, session))
}

pub fn run_push(args: PushArgs, global: &GlobalOpts) -> Result<()> {
    with_session(global, |ctx, session| apply_push(args, ctx, session))
}

pub fn apply_pull(args: PullArgs, ctx: &Context, session: &mut Session) -> Result<()> {
    let remote = remote_for(ctx, args.sheet)?;
    let headers = ctx.headers()?;

    let local = session.store().len();
    if !args.yes && local > 0 && interactive() {
        let prompt = format!(
            "Replace {} local item(s) with {}?",
            local,
            remote.describe()
        );
        if !confirm(prompt)? {
            println!("{} Cancelled", style("!").yellow());
            return Ok(());
        }
    }

    if !ctx.quiet {
        println!(
            "{} Pulling from {}",
            style("→").blue(),
            style(remote.describe()).yellow()
        );
    }
    let outcome = session.pull(&remote, &headers)?;
    if !ctx.quiet {
        print_summary(&outcome, false);
    }
    Ok(())
}

pub fn apply_push(args: PushArgs, ctx: &Context, session: &mut Session) -> Result<()> {
    let remote = remote_for(ctx, args.sheet)?;

    if !args.yes && interactive() {
        let prompt = format!(
            "Overwrite {} with {} local item(s)?",
            remote.describe(),
            session.store().len()
        );
        if !confirm(prompt)? {
            println!("{} Cancelled", style("!").yellow());
            return Ok(());
        }
    }

    let count = session.push(&remote)?;
    if !ctx.quiet {
        println!(
            "{} Pushed {} item(s) to {}",
            style("✓").green(),
            style(count).cyan(),
            style(remote.describe()).yellow()
        );
    }
    Ok(())
}
