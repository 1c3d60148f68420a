use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::Transaction;

/// Debit/credit totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthlySummary {
    pub(crate) month: String,
    pub(crate) debit: Decimal,
    pub(crate) credit: Decimal,
}

/// Group the ledger by calendar month (`YYYY-MM`), ascending.
/// Insertion order does not matter here; only the dates do.
pub(crate) fn monthly_summary(entries: &[Transaction]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for entry in entries {
        let key = entry.date.format("%Y-%m").to_string();
        let totals = months.entry(key).or_default();
        totals.0 += entry.debit;
        totals.1 += entry.credit;
    }
    months
        .into_iter()
        .map(|(month, (debit, credit))| MonthlySummary {
            month,
            debit,
            credit,
        })
        .collect()
}

/// Total debit per category, largest first. Categories with no debit
/// activity are omitted.
pub(crate) fn spending_by_category(entries: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for entry in entries {
        if entry.is_debit() {
            *totals.entry(entry.category.as_str()).or_default() += entry.debit;
        }
    }
    let mut result: Vec<(String, Decimal)> = totals
        .into_iter()
        .map(|(name, total)| (name.to_string(), total))
        .collect();
    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}
