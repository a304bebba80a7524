//! Import normalizer - maps arbitrary tables onto the canonical item schema

use chrono::NaiveDate;
use miette::Diagnostic;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::headers::HeaderMap;
use crate::core::item::{parse_date, today, Field, Item};

/// A table as read from a file or remote sheet: one header row plus data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Split a grid whose first row is the header row
    pub fn from_grid(mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let headers = grid.remove(0);
        Self {
            headers,
            rows: grid,
        }
    }

    /// Header row followed by data rows
    pub fn into_grid(self) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.headers);
        grid.extend(self.rows);
        grid
    }

    /// Canonical table for a set of items
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        Self {
            headers: Field::header_row(),
            rows: items.into_iter().map(Item::to_row).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ImportError {
    #[error("Unsupported file type '{extension}' for {path}")]
    #[diagnostic(
        code(stk::import::unsupported_format),
        help("Supported file types: .csv, .tsv, .xlsx, .xlsm, .xls, .ods")
    )]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Cannot read {path}")]
    #[diagnostic(code(stk::import::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed delimited file {path}: {message}")]
    #[diagnostic(
        code(stk::import::csv),
        help("Check that the file is UTF-8 encoded and has one header row")
    )]
    Csv { path: PathBuf, message: String },

    #[error("Cannot read workbook {path}: {message}")]
    #[diagnostic(code(stk::import::workbook))]
    Workbook { path: PathBuf, message: String },

    #[error("Worksheet '{sheet}' not found")]
    #[diagnostic(code(stk::import::sheet_not_found), help("Available sheets: {available}"))]
    SheetNotFound { sheet: String, available: String },

    #[error("No column could be mapped to 'sku' (headers: {headers})")]
    #[diagnostic(
        code(stk::import::no_key_column),
        help("Rename the key column to one of: {accepted}")
    )]
    NoKeyColumn { headers: String, accepted: String },
}

/// Summary of one normalization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Data rows read from the source
    pub rows_read: usize,
    /// Rows dropped because their sku was empty
    pub skipped: usize,
    /// Source headers that did not map to any field
    pub dropped_columns: Vec<String>,
    /// Canonical fields absent from the source and filled with defaults
    pub synthesized: Vec<Field>,
}

/// Normalized rows plus what happened on the way
#[derive(Debug, Clone)]
pub struct Normalized {
    pub items: Vec<Item>,
    pub report: ImportReport,
}

/// Coerce a quantity cell to a non-negative integer
///
/// A lone comma followed by one or two digits is a decimal comma (`3,5`);
/// any other comma is a thousands separator (`1,200`). Decimals are
/// truncated, negative and unparsable values become 0, and values above
/// `u32::MAX` saturate.
pub fn coerce_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let cleaned: String = match trimmed.split_once(',') {
        Some((whole, frac))
            if !trimmed.contains('.')
                && (1..=2).contains(&frac.len())
                && frac.chars().all(|c| c.is_ascii_digit()) =>
        {
            format!("{whole}.{frac}")
        }
        _ => trimmed.chars().filter(|c| *c != ',').collect(),
    };
    if cleaned.is_empty() {
        return 0;
    }
    if let Ok(n) = cleaned.parse::<i64>() {
        return n.clamp(0, i64::from(u32::MAX)) as u32;
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f.is_finite() => f.trunc().clamp(0.0, f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Maps raw tables onto canonical items
pub struct Normalizer<'a> {
    headers: &'a HeaderMap,
    today: NaiveDate,
}

impl<'a> Normalizer<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self::with_date(headers, today())
    }

    /// Use a fixed date for synthesized `last_modified` values
    pub fn with_date(headers: &'a HeaderMap, today: NaiveDate) -> Self {
        Self { headers, today }
    }

    pub fn normalize(&self, table: &RawTable) -> Result<Normalized, ImportError> {
        if table.is_empty() {
            return Ok(Normalized {
                items: Vec::new(),
                report: ImportReport::default(),
            });
        }

        let mut report = ImportReport {
            rows_read: table.rows.len(),
            ..ImportReport::default()
        };

        // Leftmost column wins when several map to the same field
        let mut columns: BTreeMap<Field, usize> = BTreeMap::new();
        for (idx, header) in table.headers.iter().enumerate() {
            match self.headers.resolve(header) {
                Some(field) => {
                    if columns.contains_key(&field) {
                        warn!(header = header.trim(), %field, "duplicate column for field ignored");
                    } else {
                        debug!(header = header.trim(), %field, "mapped column");
                        columns.insert(field, idx);
                    }
                }
                None => report.dropped_columns.push(header.trim().to_string()),
            }
        }

        let sku_col = match columns.get(&Field::Sku) {
            Some(&idx) => idx,
            None => {
                return Err(ImportError::NoKeyColumn {
                    headers: table
                        .headers
                        .iter()
                        .map(|h| h.trim())
                        .collect::<Vec<_>>()
                        .join(", "),
                    accepted: self.headers.synonyms(Field::Sku).join(", "),
                })
            }
        };

        report.synthesized = Field::ALL
            .iter()
            .copied()
            .filter(|f| !columns.contains_key(f))
            .collect();

        let cell = |row: &[String], field: Field| -> String {
            columns
                .get(&field)
                .and_then(|&idx| row.get(idx))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let mut items = Vec::with_capacity(table.rows.len());
        for (row_idx, row) in table.rows.iter().enumerate() {
            let sku = row.get(sku_col).map(|s| s.trim()).unwrap_or_default();
            if sku.is_empty() {
                // Spreadsheets often carry trailing blank rows
                if row.iter().any(|c| !c.trim().is_empty()) {
                    warn!(row = row_idx + 2, "row without sku skipped");
                }
                report.skipped += 1;
                continue;
            }

            items.push(Item {
                sku: sku.to_string(),
                name: cell(row, Field::Name),
                image_url: cell(row, Field::ImageUrl),
                quantity: coerce_quantity(&cell(row, Field::Quantity)),
                last_modified: parse_date(&cell(row, Field::LastModified)).unwrap_or(self.today),
            });
        }

        debug!(
            items = items.len(),
            skipped = report.skipped,
            dropped = ?report.dropped_columns,
            "normalized table"
        );
        Ok(Normalized { items, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn fixed_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity("12"), 12);
        assert_eq!(coerce_quantity(" 7 "), 7);
        assert_eq!(coerce_quantity("1,200"), 1200);
        assert_eq!(coerce_quantity("3.9"), 3);
        assert_eq!(coerce_quantity("12.0"), 12);
        assert_eq!(coerce_quantity("-4"), 0);
        assert_eq!(coerce_quantity("abc"), 0);
        assert_eq!(coerce_quantity(""), 0);
        assert_eq!(coerce_quantity("99999999999"), u32::MAX);
        assert_eq!(coerce_quantity("NaN"), 0);
    }

    #[test]
    fn test_coerce_quantity_decimal_comma() {
        assert_eq!(coerce_quantity("3,5"), 3);
        assert_eq!(coerce_quantity("12,75"), 12);
        assert_eq!(coerce_quantity("-2,5"), 0);
        assert_eq!(coerce_quantity("1,200"), 1200);
        assert_eq!(coerce_quantity("1,234,567"), 1234567);
        assert_eq!(coerce_quantity("1,200.75"), 1200);
        assert_eq!(coerce_quantity("3,x"), 0);
    }

    #[test]
    fn test_korean_headers_fill_defaults() {
        let headers = HeaderMap::builtin().unwrap();
        let table = RawTable::new(
            strings(&["코드", "품명", "수량"]),
            vec![strings(&["A-100", "사과", "15"]), strings(&["B-200", "배", "n/a"])],
        );

        let out = Normalizer::with_date(&headers, fixed_date())
            .normalize(&table)
            .unwrap();

        assert_eq!(out.items.len(), 2);
        let apple = &out.items[0];
        assert_eq!(apple.sku, "A-100");
        assert_eq!(apple.name, "사과");
        assert_eq!(apple.image_url, "");
        assert_eq!(apple.quantity, 15);
        assert_eq!(apple.last_modified, fixed_date());
        assert_eq!(out.items[1].quantity, 0);
        assert_eq!(
            out.report.synthesized,
            vec![Field::ImageUrl, Field::LastModified]
        );
    }

    #[test]
    fn test_whitespace_and_unknown_headers() {
        let headers = HeaderMap::builtin().unwrap();
        let table = RawTable::new(
            strings(&["  SKU ", " Name", "Supplier", " Stock "]),
            vec![strings(&["X1", "Widget", "ACME", "4"])],
        );

        let out = Normalizer::with_date(&headers, fixed_date())
            .normalize(&table)
            .unwrap();

        assert_eq!(out.items[0].quantity, 4);
        assert_eq!(out.items[0].name, "Widget");
        assert_eq!(out.report.dropped_columns, vec!["Supplier"]);
    }

    #[test]
    fn test_leftmost_duplicate_column_wins() {
        let headers = HeaderMap::builtin().unwrap();
        let table = RawTable::new(
            strings(&["sku", "name", "수량", "초기 수량"]),
            vec![strings(&["X1", "Widget", "5", "99"])],
        );

        let out = Normalizer::with_date(&headers, fixed_date())
            .normalize(&table)
            .unwrap();
        assert_eq!(out.items[0].quantity, 5);
    }

    #[test]
    fn test_existing_dates_are_kept() {
        let headers = HeaderMap::builtin().unwrap();
        let table = RawTable::new(
            strings(&["sku", "name", "최근수정일"]),
            vec![
                strings(&["X1", "Widget", "2024-02-29"]),
                strings(&["X2", "Gadget", "someday"]),
            ],
        );

        let out = Normalizer::with_date(&headers, fixed_date())
            .normalize(&table)
            .unwrap();
        assert_eq!(
            out.items[0].last_modified,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(out.items[1].last_modified, fixed_date());
    }

    #[test]
    fn test_rows_without_sku_are_skipped() {
        let headers = HeaderMap::builtin().unwrap();
        let table = RawTable::new(
            strings(&["sku", "name"]),
            vec![
                strings(&["X1", "Widget"]),
                strings(&["", "Orphan"]),
                strings(&["", ""]),
                strings(&["X2"]),
            ],
        );

        let out = Normalizer::with_date(&headers, fixed_date())
            .normalize(&table)
            .unwrap();
        assert_eq!(out.items.len(), 2);
        assert_eq!(out.items[1].name, "");
        assert_eq!(out.report.rows_read, 4);
        assert_eq!(out.report.skipped, 2);
    }

    #[test]
    fn test_missing_key_column_is_an_error() {
        let headers = HeaderMap::builtin().unwrap();
        let table = RawTable::new(strings(&["name", "qty"]), vec![strings(&["Widget", "1"])]);

        let err = Normalizer::with_date(&headers, fixed_date())
            .normalize(&table)
            .unwrap_err();
        assert!(matches!(err, ImportError::NoKeyColumn { .. }));
    }

    #[test]
    fn test_empty_table() {
        let headers = HeaderMap::builtin().unwrap();
        let out = Normalizer::new(&headers)
            .normalize(&RawTable::default())
            .unwrap();
        assert!(out.items.is_empty());
    }

    #[test]
    fn test_grid_conversion() {
        let table = RawTable::from_grid(vec![strings(&["sku"]), strings(&["A"])]);
        assert_eq!(table.headers, strings(&["sku"]));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.clone().into_grid().len(), 2);
    }
}
