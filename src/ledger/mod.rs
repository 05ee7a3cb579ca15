//! Remote ledger gateway.
//!
//! Defines the `Ledger` trait over the remote spreadsheet and provides the
//! Google Sheets implementation. The ledger handle is built once in `main`
//! and passed by reference to every component that needs it.

pub mod sheets;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Worksheet;

/// Abstraction over a remote tabular store with named worksheets.
///
/// Implementors never cache: every read reflects the remote state at call
/// time. Failures are returned as-is; callers treat them as fatal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Append one row to the end of a worksheet.
    async fn append_row(&self, worksheet: Worksheet, row: &[i64]) -> Result<()>;

    /// Read every row of a worksheet as raw cell strings.
    async fn get_all_rows(&self, worksheet: Worksheet) -> Result<Vec<Vec<String>>>;

    /// Read one column of a worksheet, in row order. `column` is 1-based.
    async fn get_column(&self, worksheet: Worksheet, column: usize) -> Result<Vec<String>>;

    /// Ledger name for logging and identification.
    fn name(&self) -> &str;
}
