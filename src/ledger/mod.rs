mod balance;

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{CategorySet, Draft, Transaction};
use crate::storage::LedgerFile;
use crate::validate;

/// The ordered transaction store. Owns the entries, the category set and the
/// backing file; every mutation funnels through `commit`, so balances are
/// recomputed and the file rewritten before the call returns.
///
/// Mutations take `&mut self`, so the borrow checker serializes writers;
/// readers holding `&self` can never observe a half-recomputed sequence.
pub(crate) struct Ledger {
    entries: Vec<Transaction>,
    categories: CategorySet,
    store: LedgerFile,
    next_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) total_debit: Decimal,
    pub(crate) total_credit: Decimal,
    pub(crate) balance: Decimal,
}

impl Ledger {
    /// Load the ledger from its backing file. An absent file yields an empty
    /// ledger; an unreadable or corrupt file is an error, so existing data is
    /// never silently discarded.
    pub(crate) fn open(store: LedgerFile) -> Result<Ledger> {
        let mut entries = store.load()?;
        let mut categories = CategorySet::default();
        let mut next_id = 1;
        for entry in entries.iter_mut() {
            entry.id = Some(next_id);
            next_id += 1;
            categories.add(&entry.category);
        }
        balance::recompute(&mut entries);
        Ok(Ledger {
            entries,
            categories,
            store,
            next_id,
        })
    }

    // ── Mutations ─────────────────────────────────────────────

    /// Validate a draft, append it, recompute balances and persist.
    /// Returns the finalized record, id and balance included.
    pub(crate) fn add(&mut self, draft: Draft) -> Result<Transaction> {
        let mut entry = Transaction::from_draft(draft, &self.categories)?;
        entry.id = Some(self.next_id);
        self.next_id += 1;
        let prior = self.entries.last().map_or(Decimal::ZERO, |e| e.balance);
        entry.balance = prior + entry.amount();
        let finalized = entry.clone();
        self.entries.push(entry);
        self.commit()?;
        Ok(finalized)
    }

    /// Remove the record at `index` in current store order. Later records
    /// shift down one position; their ids do not change.
    pub(crate) fn remove(&mut self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(LedgerError::IndexOutOfRange(index));
        }
        self.entries.remove(index);
        self.commit()
    }

    /// Remove the record carrying the given stable id, wherever it now sits.
    pub(crate) fn remove_by_id(&mut self, id: i64) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == Some(id))
            .ok_or(LedgerError::UnknownId(id))?;
        self.entries.remove(index);
        self.commit()
    }

    /// Remove a batch of positions atomically: either every listed position
    /// is valid and all are removed with one recompute and one save, or
    /// nothing is removed.
    pub(crate) fn remove_many(&mut self, indices: &[usize]) -> Result<()> {
        let unique: BTreeSet<usize> = indices.iter().copied().collect();
        if let Some(&bad) = unique.iter().find(|&&i| i >= self.entries.len()) {
            return Err(LedgerError::IndexOutOfRange(bad));
        }
        // Highest first, so earlier removals do not shift later targets.
        for &index in unique.iter().rev() {
            self.entries.remove(index);
        }
        self.commit()
    }

    /// Validate an external table and adopt it wholesale, in its given row
    /// order. On any validation failure the current contents are untouched.
    /// Returns the number of adopted rows.
    pub(crate) fn replace_all(&mut self, headers: &[String], rows: &[Vec<String>]) -> Result<usize> {
        let mut entries = validate::validate(headers, rows)?;
        for entry in entries.iter_mut() {
            entry.id = Some(self.next_id);
            self.next_id += 1;
            self.categories.add(&entry.category);
        }
        self.entries = entries;
        self.commit()?;
        Ok(self.entries.len())
    }

    /// Rewrite the backing file from the in-memory state. The retry path
    /// after a mutation that reported a persistence failure.
    pub(crate) fn save(&mut self) -> Result<()> {
        self.store.save(&self.entries)
    }

    fn commit(&mut self) -> Result<()> {
        balance::recompute(&mut self.entries);
        self.save()
    }

    // ── Read-only views ───────────────────────────────────────

    pub(crate) fn list(&self) -> &[Transaction] {
        &self.entries
    }

    pub(crate) fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub(crate) fn summary(&self) -> Summary {
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        for entry in &self.entries {
            total_debit += entry.debit;
            total_credit += entry.credit;
        }
        Summary {
            total_debit,
            total_credit,
            balance: self.entries.last().map_or(Decimal::ZERO, |e| e.balance),
        }
    }
}

#[cfg(test)]
mod tests;
