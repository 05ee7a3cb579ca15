//! Google Sheets ledger integration.
//!
//! Reads and appends worksheet rows through the Sheets v4 REST API and
//! resolves a spreadsheet title to its id through Drive v3.
//!
//! API docs: https://developers.google.com/sheets/api/reference/rest
//! Base URL: https://sheets.googleapis.com/v4/
//! Auth: `Authorization: Bearer {token}`. The token is issued out of band;
//! this client never refreshes it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use super::Ledger;
use crate::config::LedgerConfig;
use crate::types::{SandwichError, Worksheet};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";
const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
const LEDGER_NAME: &str = "google-sheets";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// Sheets `ValueRange`. `values` is omitted entirely for an empty range.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Drive `files.list` response, trimmed to what lookup needs.
#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
}

// ---------------------------------------------------------------------------
// Range helpers
// ---------------------------------------------------------------------------

/// Convert a 1-based column index to its A1 letters (1 → A, 27 → AA).
pub fn column_letters(column: usize) -> Option<String> {
    if column == 0 {
        return None;
    }
    let mut n = column;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).ok()
}

/// Quote a worksheet title for use in an A1 range (`'sales'`).
fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// A1 range covering a whole worksheet.
fn sheet_range(worksheet: Worksheet) -> String {
    quote_title(worksheet.as_str())
}

/// A1 range covering one whole column of a worksheet.
fn column_range(worksheet: Worksheet, column: usize) -> Result<String, SandwichError> {
    let letters = column_letters(column).ok_or(SandwichError::InvalidColumn(column))?;
    Ok(format!("{}!{letters}:{letters}", quote_title(worksheet.as_str())))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Google Sheets ledger client bound to one spreadsheet.
pub struct GoogleSheetsLedger {
    http: Client,
    token: SecretString,
    spreadsheet_id: String,
    sheets_base: String,
    drive_base: String,
}

impl GoogleSheetsLedger {
    /// Create a client for a known spreadsheet id.
    ///
    /// `timeout` of `None` lets requests block until the service answers.
    pub fn new(spreadsheet_id: String, token: SecretString, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent("love-sandwiches/0.1.0 (sales-ledger)");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("Failed to build HTTP client for Google Sheets")?;

        Ok(Self {
            http,
            token,
            spreadsheet_id,
            sheets_base: SHEETS_BASE_URL.to_string(),
            drive_base: DRIVE_BASE_URL.to_string(),
        })
    }

    /// Point the client at different API roots (emulators, proxies).
    pub fn with_base_urls(mut self, sheets_base: &str, drive_base: &str) -> Self {
        self.sheets_base = sheets_base.trim_end_matches('/').to_string();
        self.drive_base = drive_base.trim_end_matches('/').to_string();
        self
    }

    /// Build a client from config, resolving the spreadsheet by name when
    /// no id is given.
    pub async fn connect(cfg: &LedgerConfig, token: SecretString) -> Result<Self> {
        let ledger = Self::new(String::new(), token, cfg.request_timeout())?.with_base_urls(
            cfg.sheets_base_url.as_deref().unwrap_or(SHEETS_BASE_URL),
            cfg.drive_base_url.as_deref().unwrap_or(DRIVE_BASE_URL),
        );
        match (&cfg.spreadsheet_id, &cfg.spreadsheet_name) {
            (Some(id), _) => Ok(Self {
                spreadsheet_id: id.clone(),
                ..ledger
            }),
            (None, Some(name)) => ledger.bind_by_name(name).await,
            (None, None) => Err(SandwichError::Config(
                "no spreadsheet_id or spreadsheet_name configured".into(),
            )
            .into()),
        }
    }

    /// Look a spreadsheet up by title through Drive and bind to the first
    /// match.
    async fn bind_by_name(mut self, name: &str) -> Result<Self> {
        self.spreadsheet_id = self.find_spreadsheet_id(name).await?;
        info!(name, id = %self.spreadsheet_id, "Opened spreadsheet");
        Ok(self)
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    // -- Internal helpers ------------------------------------------------

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.sheets_base,
            self.spreadsheet_id,
            urlencoding::encode(range),
        )
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(self.token.expose_secret())
    }

    /// Send a request and turn transport or HTTP failures into
    /// `RemoteAccess` errors tagged with `target`.
    async fn send(&self, req: RequestBuilder, target: &str) -> Result<Response> {
        let resp = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| SandwichError::RemoteAccess {
                worksheet: target.to_string(),
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SandwichError::RemoteAccess {
                worksheet: target.to_string(),
                message: format!("HTTP {status}: {body}"),
            }
            .into());
        }

        Ok(resp)
    }

    async fn read_values(&self, range: &str, major_dimension: &str, target: &str) -> Result<ValueRange> {
        let url = self.values_url(range);
        debug!(url = %url, major_dimension, "Reading ledger values");

        let req = self.http.get(&url).query(&[("majorDimension", major_dimension)]);
        let resp = self.send(req, target).await?;
        let values: ValueRange = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse Sheets values response for {target}"))?;
        Ok(values)
    }

    async fn find_spreadsheet_id(&self, name: &str) -> Result<String> {
        let query = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false",
            name.replace('\'', "\\'"),
        );
        let url = format!("{}/files", self.drive_base);
        debug!(url = %url, name, "Looking up spreadsheet");

        let req = self
            .http
            .get(&url)
            .query(&[("q", query.as_str()), ("fields", "files(id,name)")]);
        let resp = self.send(req, name).await?;
        let list: DriveFileList = resp
            .json()
            .await
            .context("Failed to parse Drive files.list response")?;

        pick_spreadsheet(list, name)
    }
}

fn pick_spreadsheet(list: DriveFileList, name: &str) -> Result<String> {
    match list.files.into_iter().next() {
        Some(file) => {
            debug!(id = %file.id, name = %file.name, "Spreadsheet found");
            Ok(file.id)
        }
        None => Err(SandwichError::RemoteAccess {
            worksheet: name.to_string(),
            message: "spreadsheet not found or not shared with this account".into(),
        }
        .into()),
    }
}

/// A `COLUMNS`-major read of one column holds at most one inner list.
fn first_column(values: ValueRange) -> Vec<String> {
    values.values.into_iter().next().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Ledger trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl Ledger for GoogleSheetsLedger {
    async fn append_row(&self, worksheet: Worksheet, row: &[i64]) -> Result<()> {
        let range = sheet_range(worksheet);
        let url = format!("{}:append", self.values_url(&range));
        debug!(url = %url, ?row, "Appending ledger row");

        let req = self
            .http
            .post(&url)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": [row] }));
        self.send(req, worksheet.as_str()).await?;

        info!(worksheet = %worksheet, ?row, "Row appended");
        Ok(())
    }

    async fn get_all_rows(&self, worksheet: Worksheet) -> Result<Vec<Vec<String>>> {
        let range = sheet_range(worksheet);
        let values = self.read_values(&range, "ROWS", worksheet.as_str()).await?;
        debug!(worksheet = %worksheet, rows = values.values.len(), "Rows read");
        Ok(values.values)
    }

    async fn get_column(&self, worksheet: Worksheet, column: usize) -> Result<Vec<String>> {
        let range = column_range(worksheet, column)?;
        let values = self.read_values(&range, "COLUMNS", worksheet.as_str()).await?;
        let column_values = first_column(values);
        debug!(worksheet = %worksheet, column, cells = column_values.len(), "Column read");
        Ok(column_values)
    }

    fn name(&self) -> &str {
        LEDGER_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
