//! Shared types for the Love Sandwiches ledger tool.
//!
//! Every row the tool reads, writes, or prints is positionally aligned to
//! the same six sandwich items, so the row types here all revolve around
//! [`ITEM_COUNT`].

use std::fmt;

/// Number of sandwich items tracked in every worksheet row.
pub const ITEM_COUNT: usize = 6;

/// Render a row the way the operator expects to read it: `[1, 2, 3]`.
fn fmt_row(values: &[i64], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v}")?;
    }
    write!(f, "]")
}

// ---------------------------------------------------------------------------
// Worksheets
// ---------------------------------------------------------------------------

/// Named worksheets in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Worksheet {
    Sales,
    Stock,
    Surplus,
}

impl Worksheet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Worksheet::Sales => "sales",
            Worksheet::Stock => "stock",
            Worksheet::Surplus => "surplus",
        }
    }
}

impl fmt::Display for Worksheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Units sold per item at the most recent market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesRow([i64; ITEM_COUNT]);

impl SalesRow {
    /// Convert validated operator tokens into integers.
    ///
    /// Applies the same rules as [`crate::input::check`], so tokens that
    /// already passed validation always convert.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ValidationError> {
        let mut values = [0i64; ITEM_COUNT];
        let mut parsed = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref();
            let value = token
                .trim()
                .parse::<i64>()
                .map_err(|_| ValidationError::NotAnInteger {
                    token: token.to_string(),
                })?;
            parsed.push(value);
        }
        if parsed.len() != ITEM_COUNT {
            return Err(ValidationError::WrongCount {
                expected: ITEM_COUNT,
                actual: parsed.len(),
            });
        }
        values.copy_from_slice(&parsed);
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

impl fmt::Display for SalesRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_row(&self.0, f)
    }
}

/// Latest stock levels read back from the "stock" worksheet.
///
/// Width is whatever the remote row holds; the surplus calculator checks
/// it against the sales row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow(pub Vec<i64>);

impl StockRow {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

impl fmt::Display for StockRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_row(&self.0, f)
    }
}

/// Stock minus sales per item. Positive is waste, negative means demand
/// outran what was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurplusRow(pub Vec<i64>);

impl SurplusRow {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

impl fmt::Display for SurplusRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_row(&self.0, f)
    }
}

/// Recommended stock to prepare for the next market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedStockRow(pub Vec<i64>);

impl ProjectedStockRow {
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

impl fmt::Display for ProjectedStockRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_row(&self.0, f)
    }
}

/// The most recent raw sales cells, one column per item, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SalesHistoryColumns(pub Vec<Vec<String>>);

impl SalesHistoryColumns {
    pub fn columns(&self) -> &[Vec<String>] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Malformed operator input. Always recovered by re-prompting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("cannot convert {token:?} to an integer")]
    NotAnInteger { token: String },

    #[error("exactly {expected} values required, you provided {actual}")]
    WrongCount { expected: usize, actual: usize },
}

/// Fatal errors. Any of these ends the run.
#[derive(Debug, thiserror::Error)]
pub enum SandwichError {
    #[error("Non-numeric value in {worksheet} worksheet: {value:?}")]
    Parse { worksheet: Worksheet, value: String },

    #[error("Ledger access failed ({worksheet}): {message}")]
    RemoteAccess { worksheet: String, message: String },

    #[error("Row length mismatch: stock has {stock} items, sales has {sales}")]
    LengthMismatch { stock: usize, sales: usize },

    #[error("Surplus for item {item} overflows: stock {stock} minus sales {sales}")]
    Overflow { item: usize, stock: i64, sales: i64 },

    #[error("The {0} worksheet has no data rows")]
    EmptyWorksheet(Worksheet),

    #[error("No sales history for item {item}")]
    EmptyHistory { item: usize },

    #[error("Invalid column index {0} (columns start at 1)")]
    InvalidColumn(usize),

    #[error("Input closed before valid sales data was entered")]
    InputClosed,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Parse one ledger cell, tagging failures with the worksheet they came from.
pub fn parse_cell(worksheet: Worksheet, value: &str) -> Result<i64, SandwichError> {
    value.trim().parse::<i64>().map_err(|_| SandwichError::Parse {
        worksheet,
        value: value.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
