use rust_decimal::Decimal;

use crate::models::Transaction;

/// Rewrite every balance as the running net of credit minus debit, in store
/// order. Idempotent: a sequence that already satisfies the recurrence is
/// left unchanged.
pub(crate) fn recompute(entries: &mut [Transaction]) {
    let mut acc = Decimal::ZERO;
    for entry in entries.iter_mut() {
        acc += entry.amount();
        entry.balance = acc;
    }
}
