//! `stk shell` command - Interactive session
//!
//! Each line is parsed like a `stk` subcommand. Errors are printed and the
//! loop keeps going. After every change the full item list is re-rendered.
//! Unsaved changes are written on `quit` or end of input.

use clap::{Parser, Subcommand};
use console::style;
use dialoguer::Input;
use miette::{IntoDiagnostic, Result};
use std::io::{self, BufRead};

use crate::cli::commands::{
    add::{self, AddArgs},
    adjust::{self, AdjustArgs, SetArgs},
    export::{self, ExportArgs},
    import::{self, ImportArgs},
    list::{self, ListArgs, ShowArgs},
    report::{self, ReportArgs},
    rm::{self, RmArgs},
    sync::{self, PullArgs, PushArgs},
};
use crate::cli::context::Context;
use crate::cli::helpers::{interactive, split_args};
use crate::cli::view::ConsoleView;
use crate::cli::GlobalOpts;
use crate::core::Session;

#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "stk>", disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Register an item
    Add(AddArgs),
    /// List items
    #[command(alias = "search", alias = "ls")]
    List(ListArgs),
    /// Show one item
    Show(ShowArgs),
    /// Increase quantity by one
    Inc(AdjustArgs),
    /// Decrease quantity by one
    Dec(AdjustArgs),
    /// Set quantity
    Set(SetArgs),
    /// Delete an item
    #[command(alias = "delete")]
    Rm(RmArgs),
    /// Bulk-import a file
    Import(ImportArgs),
    /// Write the backup CSV
    Export(ExportArgs),
    /// Replace the local inventory with the remote sheet
    Pull(PullArgs),
    /// Replace the remote sheet with the local inventory
    Push(PushArgs),
    /// Render the count sheet
    Report(ReportArgs),
    /// Save changes now
    Save,
    /// Save and leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// What the loop should do after a line
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(global: &GlobalOpts) -> Result<()> {
    let ctx = Context::open(global)?;
    let mut session = ctx.session(ConsoleView::full_list(ctx.quiet))?;
    let tty = interactive();

    if !ctx.quiet {
        println!(
            "{} {} item(s) loaded from {}. Type {} for commands.",
            style("→").blue(),
            style(session.store().len()).cyan(),
            style(ctx.workspace.store_path().display()).cyan(),
            style("help").yellow()
        );
    }

    // the prompt reads the terminal itself, so stdin is only locked when piped
    let mut lines = (!tty).then(|| io::stdin().lock().lines());
    loop {
        let line = if tty {
            match Input::<String>::new()
                .with_prompt("stk")
                .allow_empty(true)
                .interact_text()
            {
                Ok(line) => line,
                Err(_) => break,
            }
        } else {
            match lines.as_mut().and_then(|l| l.next()) {
                Some(line) => line.into_diagnostic()?,
                None => break,
            }
        };

        match handle_line(&line, &ctx, &mut session) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("{:?}", e),
        }
    }

    let dirty = session.is_dirty();
    ctx.save(&mut session)?;
    if dirty && !ctx.quiet {
        println!("{} Saved {} item(s)", style("✓").green(), session.store().len());
    }
    Ok(())
}

fn handle_line(line: &str, ctx: &Context, session: &mut Session) -> Result<Flow> {
    let Some(words) = split_args(line) else {
        return Err(miette::miette!("Unterminated quote"));
    };
    if words.is_empty() {
        return Ok(Flow::Continue);
    }

    let parsed = match ShellLine::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) => {
            // --help and parse errors both end up here
            let _ = e.print();
            return Ok(Flow::Continue);
        }
    };

    match parsed.command {
        ShellCommand::Add(args) => add::apply(args, ctx, session)?,
        ShellCommand::List(args) => list::apply(args, ctx, session)?,
        ShellCommand::Show(args) => list::apply_show(args, ctx, session)?,
        ShellCommand::Inc(args) => adjust::apply_inc(args, ctx, session)?,
        ShellCommand::Dec(args) => adjust::apply_dec(args, ctx, session)?,
        ShellCommand::Set(args) => adjust::apply_set(args, ctx, session)?,
        ShellCommand::Rm(args) => rm::apply(args, ctx, session)?,
        ShellCommand::Import(args) => import::apply(args, ctx, session)?,
        ShellCommand::Export(args) => export::apply(args, ctx, session)?,
        ShellCommand::Pull(args) => sync::apply_pull(args, ctx, session)?,
        ShellCommand::Push(args) => sync::apply_push(args, ctx, session)?,
        ShellCommand::Report(args) => report::apply(args, ctx, session)?,
        ShellCommand::Save => {
            let dirty = session.is_dirty();
            ctx.save(session)?;
            if !ctx.quiet {
                if dirty {
                    println!("{} Saved {} item(s)", style("✓").green(), session.store().len());
                } else {
                    println!("{} Nothing to save", style("!").yellow());
                }
            }
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ShellCommand {
        ShellLine::try_parse_from(split_args(line).unwrap())
            .unwrap()
            .command
    }

    #[test]
    fn test_parse_shell_lines() {
        match parse(r#"add A-1 "Red Apple" --qty 3"#) {
            ShellCommand::Add(args) => {
                assert_eq!(args.sku.as_deref(), Some("A-1"));
                assert_eq!(args.name.as_deref(), Some("Red Apple"));
                assert_eq!(args.qty, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(parse("search apple"), ShellCommand::List(_)));
        assert!(matches!(parse("set A-1 7"), ShellCommand::Set(SetArgs { quantity: 7, .. })));
        assert!(matches!(parse("exit"), ShellCommand::Quit));
    }

    #[test]
    fn test_rejects_negative_quantity() {
        let words = split_args("set A-1 -3").unwrap();
        assert!(ShellLine::try_parse_from(words).is_err());
    }
}
