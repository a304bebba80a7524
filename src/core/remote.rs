//! Remote spreadsheet adapter
//!
//! Synchronization is always whole-table: a pull reads every row of the
//! remote sheet and a push overwrites all of it. There is no diffing.

use miette::Diagnostic;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::core::normalize::{ImportError, RawTable};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_SHEET: &str = "inventory";

/// A remote table that can be read and replaced as a whole
pub trait RemoteSheet {
    /// Short description for status messages
    fn describe(&self) -> String;

    /// Read the full table, header row first
    fn fetch(&self) -> Result<RawTable, RemoteError>;

    /// Overwrite the full table
    fn replace(&self, table: &RawTable) -> Result<(), RemoteError>;
}

#[derive(Debug, Error, Diagnostic)]
pub enum RemoteError {
    #[error("Remote sync is not configured: '{key}' is missing")]
    #[diagnostic(
        code(stk::remote::not_configured),
        help("Set remote.{key} in .stk/config.yaml or the {env} environment variable")
    )]
    NotConfigured { key: &'static str, env: &'static str },

    #[error("Invalid remote URL '{url}': {message}")]
    #[diagnostic(code(stk::remote::invalid_url), help("Check remote.base_url"))]
    InvalidUrl { url: String, message: String },

    #[error("Cannot reach {url}: {message}")]
    #[diagnostic(
        code(stk::remote::transport),
        help("Check the network connection and remote.base_url, then try again")
    )]
    Transport { url: String, message: String },

    #[error("Remote rejected the credentials (HTTP {status})")]
    #[diagnostic(
        code(stk::remote::auth),
        help("Refresh the access token (remote.token / STK_REMOTE_TOKEN) and make sure the spreadsheet is shared with that account")
    )]
    Auth { status: u16 },

    #[error("Sheet '{sheet}' does not exist in the remote spreadsheet")]
    #[diagnostic(
        code(stk::remote::missing_sheet),
        help("Create a tab named '{sheet}' in the spreadsheet or change remote.sheet")
    )]
    MissingSheet { sheet: String },

    #[error("Remote error (HTTP {status}): {message}")]
    #[diagnostic(code(stk::remote::api))]
    Api { status: u16, message: String },

    #[error("Unexpected response from remote: {message}")]
    #[diagnostic(code(stk::remote::decode))]
    Decode { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Import(#[from] ImportError),
}

/// Connection settings for [`HttpSheet`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub base_url: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub sheet: Option<String>,
    pub token: Option<String>,
}

impl RemoteSettings {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn sheet(&self) -> &str {
        self.sheet.as_deref().unwrap_or(DEFAULT_SHEET)
    }

    /// Merge another layer into this one (other takes precedence)
    pub fn merge(&mut self, other: RemoteSettings) {
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if other.spreadsheet_id.is_some() {
            self.spreadsheet_id = other.spreadsheet_id;
        }
        if other.sheet.is_some() {
            self.sheet = other.sheet;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'a str,
    values: Vec<Vec<String>>,
}

/// Spreadsheet values API client (Google Sheets v4 layout)
pub struct HttpSheet {
    http: Client,
    base_url: Url,
    spreadsheet_id: String,
    sheet: String,
    token: Option<String>,
}

impl HttpSheet {
    pub fn from_settings(settings: &RemoteSettings) -> Result<Self, RemoteError> {
        Self::with_client(settings, Client::new())
    }

    fn with_client(settings: &RemoteSettings, http: Client) -> Result<Self, RemoteError> {
        let spreadsheet_id = settings
            .spreadsheet_id
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or(RemoteError::NotConfigured {
                key: "spreadsheet_id",
                env: "STK_SPREADSHEET_ID",
            })?;
        if settings.sheet().trim().is_empty() {
            return Err(RemoteError::NotConfigured {
                key: "sheet",
                env: "STK_SHEET",
            });
        }
        let base_url = Url::parse(settings.base_url()).map_err(|e| RemoteError::InvalidUrl {
            url: settings.base_url().to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            http,
            base_url,
            spreadsheet_id,
            sheet: settings.sheet().to_string(),
            token: settings.token.clone(),
        })
    }

    /// `{base}/v4/spreadsheets/{id}/{tail..}`
    fn api_url(&self, tail: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "URL cannot have a path".to_string(),
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.spreadsheet_id.as_str()])
            .extend(tail);
        Ok(url)
    }

    /// `{base}/v4/spreadsheets/{id}/values/{sheet}{suffix}`
    fn values_url(&self, suffix: &str) -> Result<Url, RemoteError> {
        let last = format!("{}{}", self.sheet, suffix);
        self.api_url(&["values", last.as_str()])
    }

    /// A1 ranges outside a grid of `rows` x `cols` written from A1
    fn stale_ranges(&self, rows: usize, cols: usize) -> Vec<String> {
        let quoted = format!("'{}'", self.sheet.replace('\'', "''"));
        let mut ranges = vec![format!("{}!A{}:ZZZ", quoted, rows + 1)];
        if cols > 0 && rows > 0 {
            ranges.push(format!("{}!{}1:ZZZ{}", quoted, column_letters(cols + 1), rows));
        }
        ranges
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and return the body of a successful response
    fn send(&self, builder: RequestBuilder, url: &Url) -> Result<String, RemoteError> {
        let transport = |e: reqwest::Error| RemoteError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = builder.send().map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport)?;
        debug!(status, bytes = body.len(), "remote response");

        if (200..300).contains(&status) {
            Ok(body)
        } else {
            Err(classify_failure(status, &body, &self.sheet))
        }
    }
}

impl RemoteSheet for HttpSheet {
    fn describe(&self) -> String {
        format!("{}/{}", self.spreadsheet_id, self.sheet)
    }

    #[instrument(skip(self), fields(sheet = %self.sheet))]
    fn fetch(&self) -> Result<RawTable, RemoteError> {
        let url = self.values_url("")?;
        let body = self.send(self.request(Method::GET, url.clone()), &url)?;
        let range: ValueRange = serde_json::from_str(&body).map_err(|e| RemoteError::Decode {
            message: e.to_string(),
        })?;

        let grid = range
            .values
            .into_iter()
            .map(|row| row.iter().map(value_to_string).collect())
            .collect();
        Ok(RawTable::from_grid(grid))
    }

    /// Write the new grid from A1, then clear whatever the old table left
    /// below or to the right of it
    ///
    /// A failed write leaves the remote table as it was.
    #[instrument(skip(self, table), fields(sheet = %self.sheet, rows = table.rows.len()))]
    fn replace(&self, table: &RawTable) -> Result<(), RemoteError> {
        let grid = table.clone().into_grid();
        let rows = grid.len();
        let cols = grid.iter().map(Vec::len).max().unwrap_or(0);

        let mut url = self.values_url("")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = ValueRangeBody {
            range: &self.sheet,
            major_dimension: "ROWS",
            values: grid,
        };
        self.send(self.request(Method::PUT, url.clone()).json(&body), &url)?;

        let clear_url = self.api_url(&["values:batchClear"])?;
        let ranges = self.stale_ranges(rows, cols);
        self.send(
            self.request(Method::POST, clear_url.clone())
                .json(&serde_json::json!({ "ranges": ranges })),
            &clear_url,
        )?;
        Ok(())
    }
}

/// Spreadsheet column name for a 1-based index (1 = A, 27 = AA)
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Map a non-success response onto the error taxonomy
pub fn classify_failure(status: u16, body: &str, sheet: &str) -> RemoteError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().chars().take(200).collect());

    match status {
        401 | 403 => RemoteError::Auth { status },
        404 => RemoteError::MissingSheet {
            sheet: sheet.to_string(),
        },
        400 if message.contains("Unable to parse range") => RemoteError::MissingSheet {
            sheet: sheet.to_string(),
        },
        _ => RemoteError::Api { status, message },
    }
}
