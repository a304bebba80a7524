//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    add::AddArgs,
    adjust::{AdjustArgs, SetArgs},
    completions::CompletionsArgs,
    config::ConfigCommands,
    export::ExportArgs,
    import::ImportArgs,
    init::InitArgs,
    list::{ListArgs, ShowArgs},
    report::ReportArgs,
    rm::RmArgs,
    sync::{PullArgs, PushArgs},
};

#[derive(Parser)]
#[command(name = "stk")]
#[command(author, version, about = "Stocktake inventory toolkit")]
#[command(long_about = "Track stock-keeping units, bulk-import spreadsheets, sync with a remote sheet and print stock-count sheets.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .stk/)
    #[arg(long, global = true, env = "STK_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new workspace
    Init(InitArgs),

    /// Register an item (overwrites an existing sku)
    Add(AddArgs),

    /// List items, optionally filtered by a name/sku search
    #[command(alias = "search", alias = "ls")]
    List(ListArgs),

    /// Show one item
    Show(ShowArgs),

    /// Increase an item's quantity by one
    Inc(AdjustArgs),

    /// Decrease an item's quantity by one (never below zero)
    Dec(AdjustArgs),

    /// Set an item's quantity
    Set(SetArgs),

    /// Delete an item
    #[command(alias = "delete")]
    Rm(RmArgs),

    /// Bulk-import items from a CSV/TSV/XLSX file
    Import(ImportArgs),

    /// Export a backup CSV with the five canonical columns
    Export(ExportArgs),

    /// Replace the local inventory with the remote sheet
    Pull(PullArgs),

    /// Replace the remote sheet with the local inventory
    Push(PushArgs),

    /// Render the printable stock-count sheet
    Report(ReportArgs),

    /// Interactive session
    Shell,

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (aligned table for terminals)
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (backup layout)
    Csv,
    /// Markdown tables
    Md,
    /// Just skus, one per line
    Id,
}
