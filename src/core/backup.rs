//! Backup files: the canonical five-column CSV
//!
//! The same format is used for `stk export` and for the workspace state file.

use csv::{ReaderBuilder, WriterBuilder};
use miette::Diagnostic;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::item::Item;
use crate::core::store::RecordStore;

#[derive(Debug, Error, Diagnostic)]
pub enum BackupError {
    #[error("Cannot access {path}")]
    #[diagnostic(code(stk::backup::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid backup file {path}: {message}")]
    #[diagnostic(
        code(stk::backup::format),
        help("Backup files need the header sku,name,image_url,quantity,last_modified; use `stk import` for other layouts")
    )]
    Format { path: PathBuf, message: String },
}

/// Write every item as canonical CSV, header row included
pub fn write_csv<W: Write>(store: &RecordStore, writer: W) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    if store.is_empty() {
        // serde only emits a header alongside the first record
        wtr.write_record(crate::core::item::Field::header_row())?;
    }
    for item in store.iter() {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read canonical CSV strictly
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Item>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.deserialize().collect()
}

/// Export the store to a file
pub fn export(store: &RecordStore, path: &Path) -> Result<(), BackupError> {
    let file = File::create(path).map_err(|source| BackupError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(store, BufWriter::new(file)).map_err(|e| BackupError::Format {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a backup file written by [`export`]
pub fn load(path: &Path) -> Result<RecordStore, BackupError> {
    let file = File::open(path).map_err(|source| BackupError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let items = read_csv(BufReader::new(file)).map_err(|e| BackupError::Format {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(RecordStore::from_items(items))
}
