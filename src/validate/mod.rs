use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::{parse_date, Transaction};

pub(crate) const REQUIRED_COLUMNS: [&str; 5] =
    ["Date", "Description", "Category", "Debit", "Credit"];

struct ColumnMap {
    date: usize,
    description: usize,
    category: usize,
    debit: usize,
    credit: usize,
}

/// Check an external table against the required schema and turn its rows
/// into transactions with zeroed balances. Pure: the caller decides what to
/// do with the result.
///
/// Checks run in order: required columns, then every date, then the amount
/// columns. One bad row rejects the whole table. Row numbers in errors are
/// 1-based. A Balance column in the input is accepted and ignored; balances
/// are always recomputed by the store.
pub(crate) fn validate(
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<Vec<Transaction>, ValidationError> {
    let cols = map_columns(headers)?;

    for (i, row) in rows.iter().enumerate() {
        let raw = cell(row, cols.date);
        if parse_date(raw).is_none() {
            return Err(ValidationError::BadDate {
                row: i + 1,
                value: raw.to_string(),
            });
        }
    }

    let mut entries = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let debit = parse_amount(row, cols.debit, "Debit", i + 1)?;
        let credit = parse_amount(row, cols.credit, "Credit", i + 1)?;

        // Dates were checked above; a second parse cannot fail.
        let Some(date) = parse_date(cell(row, cols.date)) else {
            continue;
        };
        entries.push(Transaction {
            id: None,
            date,
            description: cell(row, cols.description).to_string(),
            category: cell(row, cols.category).to_string(),
            debit,
            credit,
            balance: Decimal::ZERO,
        });
    }
    Ok(entries)
}

fn map_columns(headers: &[String]) -> Result<ColumnMap, ValidationError> {
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| position(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingColumns(missing));
    }

    // The lookups cannot fail past the missing-columns check.
    match (
        position("Date"),
        position("Description"),
        position("Category"),
        position("Debit"),
        position("Credit"),
    ) {
        (Some(date), Some(description), Some(category), Some(debit), Some(credit)) => {
            Ok(ColumnMap {
                date,
                description,
                category,
                debit,
                credit,
            })
        }
        _ => Err(ValidationError::MissingColumns(
            REQUIRED_COLUMNS.iter().map(|n| n.to_string()).collect(),
        )),
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", |s| s.trim())
}

fn parse_amount(
    row: &[String],
    index: usize,
    column: &str,
    row_number: usize,
) -> Result<Decimal, ValidationError> {
    let raw = cell(row, index);
    let bad = || ValidationError::BadNumber {
        row: row_number,
        column: column.to_string(),
        value: raw.to_string(),
    };
    let value = parse_decimal(raw).ok_or_else(bad)?;
    if value < Decimal::ZERO {
        return Err(bad());
    }
    Ok(value.round_dp(2))
}

/// Coerce common money formats to a decimal: currency symbols, thousands
/// separators and surrounding quotes are tolerated, `(x)` reads as negative.
/// Empty cells read as zero.
pub(crate) fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned = s
        .replace(['$', ',', '"'], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(&cleaned).ok()
}
