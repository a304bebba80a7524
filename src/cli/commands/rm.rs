//! `stk rm` command - Delete an item

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::context::{with_session, Context};
use crate::cli::helpers::interactive;
use crate::cli::GlobalOpts;
use crate::core::{Session, StoreError};

#[derive(clap::Args, Debug, Clone)]
pub struct RmArgs {
    /// Item sku
    pub sku: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    with_session(global, |ctx, session| apply(args, ctx, session))
}

pub fn apply(args: RmArgs, _ctx: &Context, session: &mut Session) -> Result<()> {
    let item = session
        .store()
        .get(&args.sku)
        .ok_or_else(|| StoreError::NotFound {
            sku: args.sku.clone(),
        })?;

    if !args.yes && interactive() {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {} ({})?", item.sku, item.name))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("{} Cancelled", style("!").yellow());
            return Ok(());
        }
    }

    session.remove(&args.sku)?;
    Ok(())
}
