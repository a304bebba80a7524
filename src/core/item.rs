//! Inventory item record and the canonical field list

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical fields every imported table is normalized to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Sku,
    Name,
    ImageUrl,
    Quantity,
    LastModified,
}

impl Field {
    /// All canonical fields in backup column order
    pub const ALL: [Field; 5] = [
        Field::Sku,
        Field::Name,
        Field::ImageUrl,
        Field::Quantity,
        Field::LastModified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Sku => "sku",
            Field::Name => "name",
            Field::ImageUrl => "image_url",
            Field::Quantity => "quantity",
            Field::LastModified => "last_modified",
        }
    }

    /// Canonical header row used by backups and remote pushes
    pub fn header_row() -> Vec<String> {
        Self::ALL.iter().map(|f| f.as_str().to_string()).collect()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the record store, keyed by `sku`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub quantity: u32,
    pub last_modified: NaiveDate,
}

impl Item {
    /// Image to display, falling back to the given placeholder
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.image_url.trim().is_empty() {
            placeholder
        } else {
            &self.image_url
        }
    }

    /// Cells in canonical column order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.sku.clone(),
            self.name.clone(),
            self.image_url.clone(),
            self.quantity.to_string(),
            format_date(self.last_modified),
        ]
    }
}

/// Form input for a new item (registration form / `stk add`)
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub sku: String,
    pub name: String,
    pub image_url: Option<String>,
    pub quantity: u32,
}

/// Current local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse the date forms spreadsheets commonly produce
///
/// Timestamps keep only their date part.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}
