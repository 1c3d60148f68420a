use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{LedgerError, Result};
use crate::models::Transaction;

/// Column order of the backing file. Fixed; a file with a different header
/// is treated as corrupt rather than guessed at.
pub(crate) const FILE_COLUMNS: [&str; 6] =
    ["Date", "Description", "Category", "Debit", "Credit", "Balance"];

/// The flat-file home of the ledger: one CSV row per transaction, store
/// order preserved, amounts as plain decimal text with two fractional
/// digits, dates as ISO `YYYY-MM-DD`.
pub(crate) struct LedgerFile {
    path: PathBuf,
}

impl LedgerFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the whole file. An absent file is an empty ledger; anything
    /// malformed rejects the whole load, so existing data is never silently
    /// dropped. Ids are not persisted; the store reassigns them.
    pub(crate) fn load(&self) -> Result<Vec<Transaction>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let headers = rdr.headers()?.clone();
        let names: Vec<&str> = headers.iter().map(str::trim).collect();
        let header_ok = names.len() == FILE_COLUMNS.len()
            && names
                .iter()
                .zip(FILE_COLUMNS)
                .all(|(a, b)| a.eq_ignore_ascii_case(b));
        if !header_ok {
            return Err(LedgerError::Corrupt {
                line: 1,
                reason: format!("unexpected header: {}", names.join(",")),
            });
        }

        let mut entries = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result?;
            let line = i + 2; // 1-based, counting the header row
            entries.push(parse_row(&record, line)?);
        }
        Ok(entries)
    }

    /// Rewrite the file from scratch with the given sequence.
    pub(crate) fn save(&self, entries: &[Transaction]) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.path)?;
        wtr.write_record(FILE_COLUMNS)?;
        for entry in entries {
            wtr.write_record([
                entry.date.format("%Y-%m-%d").to_string(),
                entry.description.clone(),
                entry.category.clone(),
                format!("{:.2}", entry.debit),
                format!("{:.2}", entry.credit),
                format!("{:.2}", entry.balance),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn parse_row(record: &csv::StringRecord, line: usize) -> Result<Transaction> {
    let field = |i: usize| record.get(i).unwrap_or("").trim();

    let date = NaiveDate::parse_from_str(field(0), "%Y-%m-%d").map_err(|_| LedgerError::Corrupt {
        line,
        reason: format!("bad date '{}'", field(0)),
    })?;
    let amount = |i: usize| -> Result<Decimal> {
        Decimal::from_str(field(i)).map_err(|_| LedgerError::Corrupt {
            line,
            reason: format!("bad amount '{}' in {}", field(i), FILE_COLUMNS[i]),
        })
    };

    Ok(Transaction {
        id: None,
        date,
        description: field(1).to_string(),
        category: field(2).to_string(),
        debit: amount(3)?,
        credit: amount(4)?,
        balance: amount(5)?,
    })
}
