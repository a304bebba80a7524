//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod context;
pub mod helpers;
pub mod table;
pub mod view;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};
pub use context::Context;
