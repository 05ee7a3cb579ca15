//! Surplus calculation.
//!
//! Surplus is stock minus sales for each item. Positive values are waste,
//! negative values are sandwiches that could have been sold had they been
//! made. Rows of different widths are rejected, never truncated, and a
//! difference that does not fit in `i64` is an error, never wrapped.

use anyhow::Result;
use tracing::debug;

use crate::ledger::Ledger;
use crate::types::{parse_cell, SandwichError, StockRow, SurplusRow, Worksheet};

/// Subtract sales from stock position by position.
pub fn calculate_surplus(stock_row: &[i64], sales_row: &[i64]) -> Result<SurplusRow, SandwichError> {
    if stock_row.len() != sales_row.len() {
        return Err(SandwichError::LengthMismatch {
            stock: stock_row.len(),
            sales: sales_row.len(),
        });
    }

    let surplus = stock_row
        .iter()
        .zip(sales_row)
        .enumerate()
        .map(|(item, (&stock, &sales))| {
            stock
                .checked_sub(sales)
                .ok_or(SandwichError::Overflow { item, stock, sales })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SurplusRow(surplus))
}

/// Fetch the most recent row of the "stock" worksheet as integers.
///
/// The first `header_rows` rows are labels, not stock, and never count as
/// the latest row.
pub async fn latest_stock_row(ledger: &dyn Ledger, header_rows: usize) -> Result<StockRow> {
    let rows = ledger.get_all_rows(Worksheet::Stock).await?;
    let last = rows
        .get(header_rows..)
        .and_then(|data| data.last())
        .ok_or(SandwichError::EmptyWorksheet(Worksheet::Stock))?;

    let values = last
        .iter()
        .map(|cell| parse_cell(Worksheet::Stock, cell))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = rows.len(), stock = ?values, "Latest stock row");
    Ok(StockRow(values))
}
