use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::CategorySet;

/// A caller-supplied candidate transaction. Carries no id and no balance;
/// both are assigned by the ledger when the draft is accepted.
#[derive(Debug, Clone)]
pub struct Draft {
    pub date: String,
    pub description: String,
    pub category: String,
    pub debit: Decimal,
    pub credit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
}

impl Transaction {
    /// Validate a draft and turn it into a transaction with a zeroed balance.
    /// Fields are checked in order; the first violation is reported.
    pub fn from_draft(draft: Draft, categories: &CategorySet) -> Result<Transaction> {
        let date = parse_date(draft.date.trim()).ok_or_else(|| LedgerError::InvalidRecord {
            field: "date",
            reason: format!("cannot parse '{}'", draft.date),
        })?;

        let description = draft.description.trim().to_string();
        if description.is_empty() {
            return Err(LedgerError::InvalidRecord {
                field: "description",
                reason: "must not be empty".into(),
            });
        }

        let category = categories.canonical(&draft.category).ok_or_else(|| {
            LedgerError::InvalidRecord {
                field: "category",
                reason: format!(
                    "'{}' is not one of: {}",
                    draft.category,
                    categories.names().join(", ")
                ),
            }
        })?;

        if draft.debit < Decimal::ZERO || draft.credit < Decimal::ZERO {
            return Err(LedgerError::InvalidRecord {
                field: "amount",
                reason: "debit and credit must not be negative".into(),
            });
        }
        let positive =
            u8::from(draft.debit > Decimal::ZERO) + u8::from(draft.credit > Decimal::ZERO);
        if positive != 1 {
            return Err(LedgerError::InvalidRecord {
                field: "amount",
                reason: "exactly one of debit/credit must be positive".into(),
            });
        }

        Ok(Transaction {
            id: None,
            date,
            description,
            category,
            debit: draft.debit.round_dp(2),
            credit: draft.credit.round_dp(2),
            balance: Decimal::ZERO,
        })
    }

    /// Net effect of this transaction on the running balance.
    pub fn amount(&self) -> Decimal {
        self.credit - self.debit
    }

    pub fn is_debit(&self) -> bool {
        self.debit > Decimal::ZERO
    }
}

/// Parse a date, trying ISO first and then the common bank-export formats.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    for fmt in &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%d/%m/%Y", "%m/%d/%y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}
