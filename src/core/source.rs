//! Reading delimited files and workbooks into raw tables

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::core::normalize::{ImportError, RawTable};

/// File types accepted for bulk import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Tsv,
    Workbook,
}

impl SourceKind {
    /// Detect the file type from its extension
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(SourceKind::Csv),
            "tsv" | "tab" => Ok(SourceKind::Tsv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(SourceKind::Workbook),
            _ => Err(ImportError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension
                },
            }),
        }
    }
}

/// Read a whole file into memory as a raw table
///
/// `sheet` selects a worksheet in workbooks; the first one is used otherwise.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<RawTable, ImportError> {
    let kind = SourceKind::from_path(path)?;
    debug!(path = %path.display(), ?kind, "reading import source");

    match kind {
        SourceKind::Csv => read_delimited(path, b','),
        SourceKind::Tsv => read_delimited(path, b'\t'),
        SourceKind::Workbook => read_workbook(path, sheet),
    }
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let csv_error = |e: csv::Error| ImportError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(RawTable::new(headers, rows))
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable, ImportError> {
    let workbook_error = |message: String| ImportError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let names = workbook.sheet_names();

    let name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| ImportError::SheetNotFound {
                sheet: wanted.to_string(),
                available: names.join(", "),
            })?,
        None => names
            .first()
            .cloned()
            .ok_or_else(|| workbook_error("workbook has no worksheets".to_string()))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| workbook_error(e.to_string()))?;

    let grid: Vec<Vec<String>> = range
        .rows()
        .map(|r| r.iter().map(cell_to_string).collect())
        .collect();

    debug!(sheet = %name, rows = grid.len(), "read worksheet");
    Ok(RawTable::from_grid(grid))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v
            .as_datetime()
            .map(|dt| dt.date().format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| v.to_string()),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(
            SourceKind::from_path(Path::new("a.CSV")).unwrap(),
            SourceKind::Csv
        );
        assert_eq!(
            SourceKind::from_path(Path::new("a.xlsx")).unwrap(),
            SourceKind::Workbook
        );
        assert!(matches!(
            SourceKind::from_path(Path::new("a.txt")),
            Err(ImportError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            SourceKind::from_path(Path::new("noext")),
            Err(ImportError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_read_csv() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("items.csv");
        fs::write(&path, "코드,품명,수량\nA-1, 사과 ,3\nB-2,\"배, 큰 것\",4\n").unwrap();

        let table = read_table(&path, None).unwrap();
        assert_eq!(table.headers, vec!["코드", "품명", "수량"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "사과");
        assert_eq!(table.rows[1][1], "배, 큰 것");
    }

    #[test]
    fn test_read_tsv_ragged_rows() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("items.tsv");
        fs::write(&path, "sku\tname\tqty\nA\tApple\nB\tBanana\t2\textra\n").unwrap();

        let table = read_table(&path, None).unwrap();
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn test_non_utf8_csv_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.csv");
        fs::write(&path, b"sku,name\nA,\xff\xfe\n").unwrap();

        assert!(matches!(
            read_table(&path, None),
            Err(ImportError::Csv { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_table(Path::new("/definitely/not/here.csv"), None),
            Err(ImportError::Io { .. })
        ));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_read_xlsx_fixture() {
        let table = read_table(&fixture("stock.xlsx"), None).unwrap();
        assert_eq!(
            table.headers,
            vec!["SKU (코드)", "상품명", "수량", "최근수정일", "이미지"]
        );
        assert_eq!(table.rows.len(), 2);
        // Numeric sku and quantity cells lose the trailing ".0"
        assert_eq!(table.rows[0][0], "1001");
        assert_eq!(table.rows[0][1], "사과");
        assert_eq!(table.rows[0][2], "12");
        // Date-formatted serial cell
        assert_eq!(table.rows[0][3], "2024-03-01");
        assert_eq!(table.rows[0][4], "");
        assert_eq!(table.rows[1][0], "B-2");
        assert_eq!(table.rows[1][2], "1,200");

        let named = read_table(&fixture("stock.xlsx"), Some("재고")).unwrap();
        assert_eq!(named.rows.len(), 2);
    }

    #[test]
    fn test_xlsx_fixture_normalizes() {
        use crate::core::normalize::Normalizer;
        use crate::core::HeaderMap;
        use chrono::NaiveDate;

        let table = read_table(&fixture("stock.xlsx"), None).unwrap();
        let headers = HeaderMap::builtin().unwrap();
        let today = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let out = Normalizer::with_date(&headers, today)
            .normalize(&table)
            .unwrap();

        assert_eq!(out.items.len(), 2);
        let apple = &out.items[0];
        assert_eq!(apple.sku, "1001");
        assert_eq!(apple.name, "사과");
        assert_eq!(apple.quantity, 12);
        assert_eq!(
            apple.last_modified,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(apple.image_url.is_empty());

        let pear = &out.items[1];
        assert_eq!(pear.quantity, 1200);
        assert_eq!(
            pear.last_modified,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert!(out.report.dropped_columns.is_empty());
    }

    #[test]
    fn test_garbage_workbook_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fake.xlsx");
        fs::write(&path, "this is not a zip archive").unwrap();

        assert!(matches!(
            read_table(&path, None),
            Err(ImportError::Workbook { .. })
        ));
    }
}
