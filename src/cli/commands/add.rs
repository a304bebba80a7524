//! `stk add` command - Register an item

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::context::{with_session, Context};
use crate::cli::helpers::interactive;
use crate::cli::GlobalOpts;
use crate::core::{NewItem, Session};

#[derive(clap::Args, Debug, Clone)]
pub struct AddArgs {
    /// Stock-keeping unit (prompted for when omitted on a terminal)
    pub sku: Option<String>,

    /// Item name (prompted for when omitted on a terminal)
    pub name: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,

    /// Initial quantity
    #[arg(long, short = 'n', default_value_t = 0)]
    pub qty: u32,

    /// Prompt for every field, even ones given on the command line
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

pub fn run(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    with_session(global, |ctx, session| apply(args, ctx, session))
}

pub fn apply(args: AddArgs, _ctx: &Context, session: &mut Session) -> Result<()> {
    let item = if args.interactive || (interactive() && (args.sku.is_none() || args.name.is_none()))
    {
        prompt(args)?
    } else {
        NewItem {
            sku: args.sku.unwrap_or_default(),
            name: args.name.unwrap_or_default(),
            image_url: args.image,
            quantity: args.qty,
        }
    };

    session.add(item)?;
    Ok(())
}

/// Fill the registration form on the terminal
fn prompt(args: AddArgs) -> Result<NewItem> {
    let theme = ColorfulTheme::default();
    println!("{}", style("New item").bold());

    let sku: String = Input::with_theme(&theme)
        .with_prompt("SKU")
        .with_initial_text(args.sku.unwrap_or_default())
        .interact_text()
        .into_diagnostic()?;
    let name: String = Input::with_theme(&theme)
        .with_prompt("Name")
        .with_initial_text(args.name.unwrap_or_default())
        .interact_text()
        .into_diagnostic()?;
    let image: String = Input::with_theme(&theme)
        .with_prompt("Image URL")
        .with_initial_text(args.image.unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;
    let quantity: u32 = Input::with_theme(&theme)
        .with_prompt("Quantity")
        .default(args.qty)
        .interact_text()
        .into_diagnostic()?;

    Ok(NewItem {
        sku,
        name,
        image_url: Some(image).filter(|s| !s.trim().is_empty()),
        quantity,
    })
}
