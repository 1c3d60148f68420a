#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::{LedgerError, ValidationError};

fn temp_ledger() -> (tempfile::TempDir, Ledger) {
    let dir = tempfile::tempdir().unwrap();
    let store = LedgerFile::new(dir.path().join("ledger.csv"));
    let ledger = Ledger::open(store).unwrap();
    (dir, ledger)
}

fn draft(date: &str, description: &str, category: &str, debit: Decimal, credit: Decimal) -> Draft {
    Draft {
        date: date.into(),
        description: description.into(),
        category: category.into(),
        debit,
        credit,
    }
}

/// Seed: credit 1000, debit 200, debit 300 → balances 1000, 800, 500.
fn seed_three(ledger: &mut Ledger) {
    ledger
        .add(draft("2024-01-01", "Paycheck", "Income", Decimal::ZERO, dec!(1000)))
        .unwrap();
    ledger
        .add(draft("2024-01-05", "Rent", "Expenses", dec!(200), Decimal::ZERO))
        .unwrap();
    ledger
        .add(draft("2024-01-09", "Groceries", "Expenses", dec!(300), Decimal::ZERO))
        .unwrap();
}

fn assert_balance_invariant(entries: &[Transaction]) {
    let mut acc = Decimal::ZERO;
    for entry in entries {
        acc += entry.credit - entry.debit;
        assert_eq!(entry.balance, acc);
    }
}

// ── add ───────────────────────────────────────────────────────

#[test]
fn test_add_first_transaction() {
    let (_dir, mut ledger) = temp_ledger();
    let txn = ledger
        .add(draft("2024-01-01", "Paycheck", "Income", Decimal::ZERO, dec!(1000)))
        .unwrap();

    assert_eq!(txn.id, Some(1));
    assert_eq!(txn.balance, dec!(1000.00));

    let summary = ledger.summary();
    assert_eq!(summary.total_debit, Decimal::ZERO);
    assert_eq!(summary.total_credit, dec!(1000));
    assert_eq!(summary.balance, dec!(1000));
}

#[test]
fn test_add_extends_running_balance() {
    let (_dir, mut ledger) = temp_ledger();
    ledger
        .add(draft("2024-01-01", "Paycheck", "Income", Decimal::ZERO, dec!(1000)))
        .unwrap();
    let second = ledger
        .add(draft("2024-01-05", "Rent", "Expenses", dec!(200), Decimal::ZERO))
        .unwrap();

    assert_eq!(second.balance, dec!(800.00));
    assert_balance_invariant(ledger.list());
}

#[test]
fn test_add_invalid_draft_leaves_store_unchanged() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    let err = ledger
        .add(draft("2024-01-10", "", "Income", Decimal::ZERO, dec!(1)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidRecord { .. }));
    assert_eq!(ledger.list().len(), 3);
    assert_balance_invariant(ledger.list());
}

#[test]
fn test_add_keeps_insertion_order_not_date_order() {
    let (_dir, mut ledger) = temp_ledger();
    ledger
        .add(draft("2024-06-01", "Later", "Income", Decimal::ZERO, dec!(100)))
        .unwrap();
    ledger
        .add(draft("2024-01-01", "Earlier", "Income", Decimal::ZERO, dec!(50)))
        .unwrap();

    let entries = ledger.list();
    assert_eq!(entries[0].description, "Later");
    assert_eq!(entries[1].description, "Earlier");
    // Balance runs over insertion order, not chronological order
    assert_eq!(entries[1].balance, dec!(150.00));
}

// ── remove ────────────────────────────────────────────────────

#[test]
fn test_remove_middle_recomputes() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    ledger.remove(1).unwrap();

    let entries = ledger.list();
    assert_eq!(entries.len(), 2);
    // The record that sat at position 2 moved down to position 1
    assert_eq!(entries[1].description, "Groceries");
    // Its balance no longer includes the removed record's delta
    assert_eq!(entries[1].balance, dec!(700.00));
    assert_balance_invariant(entries);
}

#[test]
fn test_remove_out_of_range() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    let err = ledger.remove(3).unwrap_err();
    assert!(matches!(err, LedgerError::IndexOutOfRange(3)));
    assert_eq!(ledger.list().len(), 3);
}

#[test]
fn test_remove_keeps_ids_stable() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    ledger.remove(0).unwrap();

    let ids: Vec<Option<i64>> = ledger.list().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![Some(2), Some(3)]);
}

#[test]
fn test_remove_by_id_after_positions_shift() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    // Shift positions, then remove by the stable id
    ledger.remove(0).unwrap();
    ledger.remove_by_id(3).unwrap();

    let entries = ledger.list();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, Some(2));
    assert_balance_invariant(entries);
}

#[test]
fn test_remove_by_id_unknown() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    let err = ledger.remove_by_id(99).unwrap_err();
    assert!(matches!(err, LedgerError::UnknownId(99)));
    assert_eq!(ledger.list().len(), 3);
}

#[test]
fn test_remove_many() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    ledger.remove_many(&[2, 0]).unwrap();

    let entries = ledger.list();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].description, "Rent");
    assert_eq!(entries[0].balance, dec!(-200.00));
}

#[test]
fn test_remove_many_is_atomic() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    let err = ledger.remove_many(&[0, 7]).unwrap_err();
    assert!(matches!(err, LedgerError::IndexOutOfRange(7)));
    // Nothing was removed
    assert_eq!(ledger.list().len(), 3);
    assert_balance_invariant(ledger.list());
}

#[test]
fn test_remove_many_ignores_duplicate_positions() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    ledger.remove_many(&[1, 1]).unwrap();
    assert_eq!(ledger.list().len(), 2);
}

// ── replace_all ───────────────────────────────────────────────

fn table(rows: &[[&str; 5]]) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = ["Date", "Description", "Category", "Debit", "Credit"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows = rows
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect();
    (headers, rows)
}

#[test]
fn test_replace_all_adopts_rows_in_order() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    let (headers, rows) = table(&[
        ["2024-03-01", "Salary", "Income", "0", "2000"],
        ["2024-03-02", "Utilities", "Expenses", "150", "0"],
    ]);
    let count = ledger.replace_all(&headers, &rows).unwrap();

    assert_eq!(count, 2);
    let entries = ledger.list();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].description, "Salary");
    assert_eq!(entries[0].balance, dec!(2000.00));
    assert_eq!(entries[1].balance, dec!(1850.00));
    assert_balance_invariant(entries);
}

#[test]
fn test_replace_all_missing_column_leaves_store_unchanged() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);
    let before: Vec<Transaction> = ledger.list().to_vec();

    let headers: Vec<String> = ["Date", "Description", "Debit", "Credit"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows = vec![vec![
        "2024-03-01".to_string(),
        "Salary".to_string(),
        "0".to_string(),
        "2000".to_string(),
    ]];

    let err = ledger.replace_all(&headers, &rows).unwrap_err();
    match err {
        LedgerError::Validation(ValidationError::MissingColumns(names)) => {
            assert_eq!(names, vec!["Category".to_string()]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
    assert_eq!(ledger.list(), &before[..]);
}

#[test]
fn test_replace_all_bad_date_leaves_store_unchanged() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    let (headers, rows) = table(&[
        ["2024-03-01", "ok", "Income", "0", "10"],
        ["soon", "bad", "Income", "0", "10"],
    ]);
    let err = ledger.replace_all(&headers, &rows).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::BadDate { row: 2, .. })
    ));
    assert_eq!(ledger.list().len(), 3);
}

#[test]
fn test_replace_all_extends_category_set() {
    let (_dir, mut ledger) = temp_ledger();

    let (headers, rows) = table(&[["2024-03-01", "Beans", "Groceries", "12.50", "0"]]);
    ledger.replace_all(&headers, &rows).unwrap();
    assert!(ledger.categories().contains("Groceries"));

    // A later add with the bulk-loaded category passes validation
    ledger
        .add(draft("2024-03-02", "More beans", "groceries", dec!(8), Decimal::ZERO))
        .unwrap();
    assert_eq!(ledger.list().len(), 2);
}

#[test]
fn test_replace_all_assigns_fresh_ids() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    let (headers, rows) = table(&[["2024-03-01", "Salary", "Income", "0", "2000"]]);
    ledger.replace_all(&headers, &rows).unwrap();

    // Ids keep counting up; none are recycled from the discarded entries
    assert_eq!(ledger.list()[0].id, Some(4));
}

// ── recompute ─────────────────────────────────────────────────

#[test]
fn test_recompute_is_idempotent() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    let before: Vec<Transaction> = ledger.list().to_vec();
    let mut entries = before.clone();
    balance::recompute(&mut entries);
    assert_eq!(entries, before);
}

#[test]
fn test_recompute_can_go_negative() {
    let (_dir, mut ledger) = temp_ledger();
    ledger
        .add(draft("2024-01-01", "Rent", "Expenses", dec!(750), Decimal::ZERO))
        .unwrap();
    assert_eq!(ledger.summary().balance, dec!(-750.00));
}

// ── persistence ───────────────────────────────────────────────

#[test]
fn test_reopen_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");

    let mut ledger = Ledger::open(LedgerFile::new(path.clone())).unwrap();
    seed_three(&mut ledger);
    let before: Vec<Transaction> = ledger.list().to_vec();
    drop(ledger);

    let reopened = Ledger::open(LedgerFile::new(path)).unwrap();
    assert_eq!(reopened.list(), &before[..]);
}

#[test]
fn test_reopen_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");

    let mut ledger = Ledger::open(LedgerFile::new(path.clone())).unwrap();
    seed_three(&mut ledger);
    ledger.remove_many(&[0, 1, 2]).unwrap();
    drop(ledger);

    let reopened = Ledger::open(LedgerFile::new(path)).unwrap();
    assert!(reopened.list().is_empty());
    assert_eq!(reopened.summary().balance, Decimal::ZERO);
}

#[test]
fn test_reopen_restores_bulk_loaded_categories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");

    let mut ledger = Ledger::open(LedgerFile::new(path.clone())).unwrap();
    let (headers, rows) = table(&[["2024-03-01", "Beans", "Groceries", "12.50", "0"]]);
    ledger.replace_all(&headers, &rows).unwrap();
    drop(ledger);

    let reopened = Ledger::open(LedgerFile::new(path)).unwrap();
    assert!(reopened.categories().contains("Groceries"));
}

#[test]
fn test_save_failure_keeps_memory_authoritative() {
    let dir = tempfile::tempdir().unwrap();
    // Parent directory does not exist, so every save fails
    let path = dir.path().join("missing").join("ledger.csv");

    let mut ledger = Ledger::open(LedgerFile::new(path.clone())).unwrap();
    let err = ledger
        .add(draft("2024-01-01", "Paycheck", "Income", Decimal::ZERO, dec!(1000)))
        .unwrap_err();

    assert!(err.is_persistence());
    // The mutation stands in memory; the caller may fix the path and retry
    assert_eq!(ledger.list().len(), 1);
    assert_eq!(ledger.summary().balance, dec!(1000.00));

    std::fs::create_dir_all(dir.path().join("missing")).unwrap();
    ledger.save().unwrap();
    let reopened = Ledger::open(LedgerFile::new(path)).unwrap();
    assert_eq!(reopened.list().len(), 1);
}

// ── summary ───────────────────────────────────────────────────

#[test]
fn test_summary_empty() {
    let (_dir, ledger) = temp_ledger();
    let summary = ledger.summary();
    assert_eq!(summary.total_debit, Decimal::ZERO);
    assert_eq!(summary.total_credit, Decimal::ZERO);
    assert_eq!(summary.balance, Decimal::ZERO);
}

#[test]
fn test_summary_totals() {
    let (_dir, mut ledger) = temp_ledger();
    seed_three(&mut ledger);

    let summary = ledger.summary();
    assert_eq!(summary.total_debit, dec!(500));
    assert_eq!(summary.total_credit, dec!(1000));
    assert_eq!(summary.balance, dec!(500.00));
}
