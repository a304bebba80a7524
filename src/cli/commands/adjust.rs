//! `stk inc` / `stk dec` / `stk set` commands - Quantity adjustments

use console::style;
use miette::Result;

use crate::cli::context::{with_session, Context};
use crate::cli::GlobalOpts;
use crate::core::{Change, Session};

#[derive(clap::Args, Debug, Clone)]
pub struct AdjustArgs {
    /// Item sku
    pub sku: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SetArgs {
    /// Item sku
    pub sku: String,

    /// New quantity
    pub quantity: u32,
}

pub fn run_inc(args: AdjustArgs, global: &GlobalOpts) -> Result<()> {
    with_session(global, |ctx, session| apply_inc(args, ctx, session))
}

pub fn run_dec(args: AdjustArgs, global: &GlobalOpts) -> Result<()> {
    with_session(global, |ctx, session| apply_dec(args, ctx, session))
}

pub fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    with_session(global, |ctx, session| apply_set(args, ctx, session))
}

pub fn apply_inc(args: AdjustArgs, ctx: &Context, session: &mut Session) -> Result<()> {
    let change = session.increment(&args.sku)?;
    report_unchanged(ctx, session, &change, "already at the maximum");
    Ok(())
}

pub fn apply_dec(args: AdjustArgs, ctx: &Context, session: &mut Session) -> Result<()> {
    let change = session.decrement(&args.sku)?;
    report_unchanged(ctx, session, &change, "already at 0");
    Ok(())
}

pub fn apply_set(args: SetArgs, ctx: &Context, session: &mut Session) -> Result<()> {
    let change = session.set_quantity(&args.sku, args.quantity)?;
    report_unchanged(ctx, session, &change, "already at that quantity");
    Ok(())
}

fn report_unchanged(ctx: &Context, session: &Session, change: &Change, reason: &str) {
    if ctx.quiet {
        return;
    }
    if let Change::Unchanged { sku } = change {
        let quantity = session.store().get(sku).map(|i| i.quantity).unwrap_or(0);
        println!(
            "{} {} {} ({})",
            style("!").yellow(),
            style(sku).cyan(),
            reason,
            quantity
        );
    }
}
