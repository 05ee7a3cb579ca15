//! The single per-invocation cycle.
//!
//! Collect sales → record them → compute and record surplus → sample
//! recent sales → project next stock → report. Runs once; any ledger or
//! parse failure aborts the cycle, leaving earlier appends in place.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::calc::history::sample_history;
use crate::calc::projection::StockProjector;
use crate::calc::surplus::{calculate_surplus, latest_stock_row};
use crate::input::collect_sales_row;
use crate::ledger::Ledger;
use crate::types::{ProjectedStockRow, SalesRow, SurplusRow, Worksheet};

/// Everything one cycle produced.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub sales: SalesRow,
    pub surplus: SurplusRow,
    pub projected: ProjectedStockRow,
    pub timestamp: DateTime<Utc>,
}

/// Append a row, narrating progress to the operator.
async fn update_worksheet<W: Write>(
    ledger: &dyn Ledger,
    worksheet: Worksheet,
    row: &[i64],
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Updating {worksheet} worksheet...\n")?;
    ledger.append_row(worksheet, row).await?;
    writeln!(out, "{worksheet} worksheet updated successfully!\n")?;
    Ok(())
}

/// Run one full cycle against `ledger`, reading operator input from
/// `input` and writing operator-facing text to `out`. The first
/// `header_rows` rows of each worksheet are labels and never read as data.
pub async fn run_cycle<R: BufRead, W: Write>(
    ledger: &dyn Ledger,
    projector: &StockProjector,
    header_rows: usize,
    input: &mut R,
    out: &mut W,
) -> Result<CycleReport> {
    let tokens = collect_sales_row(input, out)?;
    let sales = SalesRow::from_tokens(&tokens)?;
    info!(sales = %sales, "Sales data accepted");

    update_worksheet(ledger, Worksheet::Sales, sales.as_slice(), out).await?;

    writeln!(out, "Calculating surplus data...\n")?;
    let stock = latest_stock_row(ledger, header_rows).await?;
    let surplus = calculate_surplus(stock.as_slice(), sales.as_slice())?;
    info!(stock = %stock, surplus = %surplus, "Surplus calculated");

    update_worksheet(ledger, Worksheet::Surplus, surplus.as_slice(), out).await?;

    let history = sample_history(ledger, header_rows).await?;
    writeln!(out, "Calculating stock data...\n")?;
    let projected = projector.project_stock(&history)?;

    writeln!(out, "Stock to prepare for the next market:")?;
    writeln!(out, "{projected}")?;
    out.flush()?;

    Ok(CycleReport {
        sales,
        surplus,
        projected,
        timestamp: Utc::now(),
    })
}
