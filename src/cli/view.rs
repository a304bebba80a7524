//! Console view notified by the session after each mutation

use console::style;

use crate::cli::table::render_items;
use crate::cli::OutputFormat;
use crate::core::{Change, RecordStore, View};

/// How much to print per change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// One status line
    Status,
    /// Status line followed by the whole list
    FullList,
}

#[derive(Debug, Clone)]
pub struct ConsoleView {
    mode: Mode,
    quiet: bool,
}

impl ConsoleView {
    /// One line per change, for one-shot commands
    pub fn status(quiet: bool) -> Self {
        Self {
            mode: Mode::Status,
            quiet,
        }
    }

    /// Re-render the full list after every change, for the shell
    pub fn full_list(quiet: bool) -> Self {
        Self {
            mode: Mode::FullList,
            quiet,
        }
    }
}

/// Human-readable summary of a change
pub fn describe(change: &Change) -> String {
    match change {
        Change::Added { sku, replaced: false } => {
            format!("Added {}", style(sku).cyan())
        }
        Change::Added { sku, replaced: true } => {
            format!("Replaced {}", style(sku).cyan())
        }
        Change::Adjusted { sku, from, to } => {
            format!("{} quantity {} → {}", style(sku).cyan(), from, style(to).bold())
        }
        Change::Removed { sku } => format!("Removed {}", style(sku).cyan()),
        Change::Merged { inserted, updated } => {
            format!("Imported {} new, {} updated", inserted, updated)
        }
        Change::Replaced { count } => format!("Inventory replaced with {} item(s)", count),
        Change::Unchanged { sku } => format!("{} unchanged", style(sku).cyan()),
    }
}

impl View for ConsoleView {
    fn refresh(&mut self, store: &RecordStore, change: &Change) {
        if self.quiet {
            return;
        }
        println!("{} {}", style("✓").green(), describe(change));

        if self.mode == Mode::FullList {
            let items: Vec<_> = store.iter().collect();
            match render_items(&items, OutputFormat::Auto, true) {
                Ok(out) => {
                    println!();
                    print!("{}", out);
                }
                Err(e) => tracing::warn!("failed to render list: {e}"),
            }
        }
    }
}
