//! Recent sales history sampling.

use anyhow::Result;
use tracing::debug;

use crate::ledger::Ledger;
use crate::types::{SalesHistoryColumns, Worksheet, ITEM_COUNT};

/// How many of the most recent sales entries feed the projection.
pub const HISTORY_WINDOW: usize = 5;

/// Read the last [`HISTORY_WINDOW`] sales cells for every item.
///
/// Sheet columns are 1-based, so item `i` lives in column `i + 1`. The
/// first `header_rows` cells of each column are labels and are never
/// sampled. A column with fewer data cells than the window is returned
/// whole.
pub async fn sample_history(ledger: &dyn Ledger, header_rows: usize) -> Result<SalesHistoryColumns> {
    let mut columns = Vec::with_capacity(ITEM_COUNT);
    for item in 0..ITEM_COUNT {
        let mut column = ledger.get_column(Worksheet::Sales, item + 1).await?;
        let data = column.split_off(header_rows.min(column.len()));
        columns.push(last_entries(data, HISTORY_WINDOW));
    }
    debug!(?columns, "Sampled sales history");
    Ok(SalesHistoryColumns(columns))
}

fn last_entries(mut column: Vec<String>, window: usize) -> Vec<String> {
    let start = column.len().saturating_sub(window);
    column.split_off(start)
}
