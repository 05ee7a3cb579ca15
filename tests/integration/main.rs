//! End-to-end cycle tests against an in-memory ledger.


use std::io::Cursor;

use tokio_test::{assert_err, assert_ok};

use mock_ledger::MemoryLedger;
use sandwich_ledger::calc::projection::StockProjector;
use sandwich_ledger::engine::cycle::{run_cycle, CycleReport};
use sandwich_ledger::ledger::Ledger;
use sandwich_ledger::types::{SandwichError, Worksheet};

/// `MemoryLedger` seeds one label row on every worksheet.
const HEADER_ROWS: usize = 1;

async fn run(ledger: &MemoryLedger, input: &str) -> (anyhow::Result<CycleReport>, String) {
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut out = Vec::new();
    let result = run_cycle(ledger, &StockProjector::default(), HEADER_ROWS, &mut reader, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

fn seeded() -> MemoryLedger {
    MemoryLedger::new()
        .with_rows(Worksheet::Stock, &[[30; 6], [20; 6]])
        .with_rows(
            Worksheet::Sales,
            &[
                [12, 3, 40, 7, 0, 9],
                [10, 5, 35, 8, 1, 9],
                [14, 4, 30, 6, 0, 9],
                [8, 6, 45, 9, 2, 9],
                [6, 2, 50, 5, 2, 9],
            ],
        )
}

#[tokio::test]
async fn test_full_cycle() {
    let ledger = seeded();
    let (result, text) = run(&ledger, "5,5,5,5,5,5\n").await;
    let report = assert_ok!(result);

    assert_eq!(ledger.last_row(Worksheet::Sales), Some(vec![5; 6]));
    assert_eq!(ledger.last_row(Worksheet::Surplus), Some(vec![15; 6]));
    assert_eq!(report.surplus.as_slice(), &[15; 6]);

    // Last five sales per item, the new row included:
    // bacon 10,14,8,6,5 → mean 8.6 → 9.46
    // chicken 5,4,6,2,5 → 4.4 → 4.84
    // ham 35,30,45,50,5 → 33 → 36.3
    // tuna 8,6,9,5,5 → 6.6 → 7.26
    // turkey 1,0,2,2,5 → 2 → 2.2
    // egg 9,9,9,9,5 → 8.2 → 9.02
    assert_eq!(report.projected.as_slice(), &[9, 5, 36, 7, 2, 9]);
    assert!(text.contains("[9, 5, 36, 7, 2, 9]"));

    // Stock is maintained elsewhere and never written here.
    assert_eq!(ledger.rows(Worksheet::Stock).len(), 3);
}

#[tokio::test]
async fn test_retry_then_single_write() {
    let ledger = seeded();
    let (result, text) = run(&ledger, "1,2\n1,2,3,4,5,six\n5,5,5,5,5,5\n").await;
    assert_ok!(result);

    assert_eq!(text.matches("Invalid data:").count(), 2);
    // header + 5 seeded + 1 new
    assert_eq!(ledger.rows(Worksheet::Sales).len(), 7);
    assert_eq!(ledger.rows(Worksheet::Surplus).len(), 2);
}

#[tokio::test]
async fn test_invalid_input_only_writes_nothing() {
    let ledger = seeded();
    let (result, _) = run(&ledger, "1,2,3,4,5\n").await;
    let err = assert_err!(result);

    assert!(matches!(
        err.downcast_ref::<SandwichError>(),
        Some(SandwichError::InputClosed)
    ));
    assert_eq!(ledger.rows(Worksheet::Sales).len(), 6);
    assert_eq!(ledger.rows(Worksheet::Surplus).len(), 1);
}

#[tokio::test]
async fn test_short_history_uses_what_exists() {
    let ledger = MemoryLedger::new()
        .with_rows(Worksheet::Stock, &[[20; 6]])
        .with_rows(
            Worksheet::Sales,
            &[[1, 2, 3, 4, 5, 6], [3, 4, 5, 6, 7, 8]],
        );

    let (result, _) = run(&ledger, "5,0,10,2,3,10\n").await;
    let report = assert_ok!(result);

    // Header skipped, three data rows per item:
    // means 3, 2, 6, 4, 5, 8 → ×1.1 → 3.3, 2.2, 6.6, 4.4, 5.5, 8.8
    assert_eq!(report.projected.as_slice(), &[3, 2, 7, 4, 6, 9]);
    assert_eq!(report.surplus.as_slice(), &[15, 20, 10, 18, 17, 10]);
}

#[tokio::test]
async fn test_single_prior_row_projects_from_two_entries() {
    let ledger = MemoryLedger::new()
        .with_rows(Worksheet::Stock, &[[20; 6]])
        .with_rows(Worksheet::Sales, &[[4; 6]]);

    let (result, _) = run(&ledger, "5,5,5,5,5,5\n").await;
    let report = assert_ok!(result);

    // mean 4.5 × 1.1 = 4.95
    assert_eq!(report.projected.as_slice(), &[5; 6]);
    assert_eq!(ledger.last_row(Worksheet::Sales), Some(vec![5; 6]));
    assert_eq!(ledger.last_row(Worksheet::Surplus), Some(vec![15; 6]));
}

#[tokio::test]
async fn test_first_ever_sale_projects_from_itself() {
    let ledger = MemoryLedger::new().with_rows(Worksheet::Stock, &[[20; 6]]);

    let (result, _) = run(&ledger, "10,0,1,2,3,4\n").await;
    let report = assert_ok!(result);

    assert_eq!(report.projected.as_slice(), &[11, 0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_header_only_stock_sheet_is_fatal() {
    let ledger = MemoryLedger::new().with_rows(Worksheet::Sales, &[[4; 6]]);

    let (result, _) = run(&ledger, "5,5,5,5,5,5\n").await;
    let err = assert_err!(result);

    assert!(matches!(
        err.downcast_ref::<SandwichError>(),
        Some(SandwichError::EmptyWorksheet(Worksheet::Stock))
    ));
    assert_eq!(ledger.rows(Worksheet::Surplus).len(), 1);
}

#[tokio::test]
async fn test_surplus_overflow_is_fatal_before_surplus_write() {
    let ledger = seeded();

    let (result, _) = run(&ledger, "-9223372036854775808,5,5,5,5,5\n").await;
    let err = assert_err!(result);

    assert!(matches!(
        err.downcast_ref::<SandwichError>(),
        Some(SandwichError::Overflow { item: 0, .. })
    ));
    assert_eq!(ledger.last_row(Worksheet::Sales), Some(vec![i64::MIN, 5, 5, 5, 5, 5]));
    assert_eq!(ledger.rows(Worksheet::Surplus).len(), 1);
}

#[tokio::test]
async fn test_surplus_append_failure_keeps_sales_row() {
    let ledger = seeded();
    ledger.fail_appends_to(Worksheet::Surplus);

    let (result, _) = run(&ledger, "5,5,5,5,5,5\n").await;
    let err = assert_err!(result);

    assert!(matches!(
        err.downcast_ref::<SandwichError>(),
        Some(SandwichError::RemoteAccess { .. })
    ));
    assert_eq!(ledger.last_row(Worksheet::Sales), Some(vec![5; 6]));
    assert_eq!(ledger.rows(Worksheet::Surplus).len(), 1);
}

#[tokio::test]
async fn test_empty_stock_sheet_is_fatal() {
    let ledger = seeded();
    ledger.clear(Worksheet::Stock);

    let (result, _) = run(&ledger, "5,5,5,5,5,5\n").await;
    let err = assert_err!(result);

    assert!(matches!(
        err.downcast_ref::<SandwichError>(),
        Some(SandwichError::EmptyWorksheet(Worksheet::Stock))
    ));
    assert_eq!(ledger.rows(Worksheet::Surplus).len(), 1);
}

#[tokio::test]
async fn test_non_numeric_stock_is_fatal() {
    let ledger = seeded();
    ledger.push_raw(Worksheet::Stock, &["20", "20", "20", "n/a", "20", "20"]);

    let (result, _) = run(&ledger, "5,5,5,5,5,5\n").await;
    let err = assert_err!(result);

    assert!(matches!(
        err.downcast_ref::<SandwichError>(),
        Some(SandwichError::Parse { worksheet: Worksheet::Stock, .. })
    ));
    assert_eq!(ledger.rows(Worksheet::Surplus).len(), 1);
}

#[tokio::test]
async fn test_reads_are_stable_without_writes() {
    let ledger = seeded();

    let first = assert_ok!(ledger.get_all_rows(Worksheet::Sales).await);
    let second = assert_ok!(ledger.get_all_rows(Worksheet::Sales).await);
    assert_eq!(first, second);

    let col_a = assert_ok!(ledger.get_column(Worksheet::Sales, 3).await);
    let col_b = assert_ok!(ledger.get_column(Worksheet::Sales, 3).await);
    assert_eq!(col_a, col_b);
    assert_eq!(col_a.last().map(String::as_str), Some("50"));

    assert_eq!(ledger.read_count(), 4);
}

#[tokio::test]
async fn test_reads_reflect_new_writes() {
    let ledger = seeded();
    let before = assert_ok!(ledger.get_column(Worksheet::Sales, 1).await);
    assert_ok!(ledger.append_row(Worksheet::Sales, &[99, 0, 0, 0, 0, 0]).await);
    let after = assert_ok!(ledger.get_column(Worksheet::Sales, 1).await);

    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after.last().map(String::as_str), Some("99"));
}
