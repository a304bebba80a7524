//! Stocktake: a small inventory toolkit
//!
//! Tracks stock-keeping units in a per-session record store, merges
//! spreadsheet imports by sku, syncs whole tables with a remote sheet and
//! renders printable count sheets.

pub mod cli;
pub mod core;
pub mod logging;
