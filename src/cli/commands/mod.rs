//! CLI command implementations
//!
//! Commands that touch the inventory expose an `apply` function taking the
//! shared [`Context`](crate::cli::Context) and [`Session`](crate::core::Session),
//! so one-shot invocations and the interactive shell run the same code.

pub mod add;
pub mod adjust;
pub mod completions;
pub mod config;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod report;
pub mod rm;
pub mod shell;
pub mod sync;
