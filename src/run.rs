use anyhow::Result;
use rust_decimal::Decimal;
use std::path::Path;

use crate::ledger::Ledger;
use crate::models::{Draft, DEFAULT_CATEGORIES};
use crate::{report, validate};

pub(crate) fn as_cli(args: &[String], ledger: &mut Ledger) -> Result<()> {
    match args[1].as_str() {
        "add" => cli_add(&args[2..], ledger),
        "list" | "ls" => cli_list(ledger),
        "remove" | "rm" => cli_remove(&args[2..], ledger),
        "load" => cli_load(&args[2..], ledger),
        "summary" | "s" => cli_summary(ledger),
        "report" => cli_report(ledger),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("ledgerbook {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("Ledgerbook — local-only transaction ledger with running balances");
    println!();
    println!("Usage: ledgerbook [command] [--file <path>]");
    println!();
    println!("Commands:");
    println!("  add <date> <description> <category> <debit|credit> <amount>");
    println!("                                Record a transaction");
    println!("  list                          Print the ledger in store order");
    println!("  remove <pos>...               Delete by position (as printed by list)");
    println!("    --id <id>                   Delete by stable id instead");
    println!("  load <file.csv>               Replace the ledger from a CSV table");
    println!("  summary                       Totals and current balance");
    println!("  report                        Monthly totals and spending by category");
    println!("  --file <path>                 Use this ledger file instead of the default");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Default categories: {}", DEFAULT_CATEGORIES.join(", "));
}

fn cli_add(args: &[String], ledger: &mut Ledger) -> Result<()> {
    if args.len() != 5 {
        anyhow::bail!("Usage: ledgerbook add <date> <description> <category> <debit|credit> <amount>");
    }

    let amount = validate::parse_decimal(&args[4])
        .ok_or_else(|| anyhow::anyhow!("Not a valid amount: {}", args[4]))?;
    let (debit, credit) = match args[3].to_lowercase().as_str() {
        "debit" | "d" => (amount, Decimal::ZERO),
        "credit" | "c" => (Decimal::ZERO, amount),
        other => anyhow::bail!("Expected 'debit' or 'credit', got '{other}'"),
    };

    let draft = Draft {
        date: args[0].clone(),
        description: args[1].clone(),
        category: args[2].clone(),
        debit,
        credit,
    };

    match ledger.add(draft) {
        Ok(txn) => {
            println!(
                "Added #{}: {} {} — balance ${:.2}",
                txn.id.unwrap_or(0),
                txn.date.format("%Y-%m-%d"),
                txn.description,
                txn.balance
            );
            Ok(())
        }
        Err(e) if e.is_persistence() => {
            // The entry is in memory but the file write failed; retry once
            // before giving up so a transient failure does not lose the add.
            eprintln!("Warning: ledger not saved: {e}");
            ledger.save()?;
            println!("Saved on retry");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cli_list(ledger: &mut Ledger) -> Result<()> {
    let entries = ledger.list();
    if entries.is_empty() {
        println!("Ledger is empty");
        return Ok(());
    }

    println!(
        "{:<5} {:<5} {:<12} {:<28} {:<14} {:>10} {:>10} {:>12}",
        "#", "ID", "Date", "Description", "Category", "Debit", "Credit", "Balance"
    );
    println!("{}", "─".repeat(100));
    for (i, txn) in entries.iter().enumerate() {
        println!(
            "{:<5} {:<5} {:<12} {:<28} {:<14} {:>10} {:>10} {:>12}",
            i + 1,
            txn.id.unwrap_or(0),
            txn.date.format("%Y-%m-%d"),
            truncate(&txn.description, 28),
            truncate(&txn.category, 14),
            format!("{:.2}", txn.debit),
            format!("{:.2}", txn.credit),
            format!("{:.2}", txn.balance),
        );
    }
    Ok(())
}

fn cli_remove(args: &[String], ledger: &mut Ledger) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: ledgerbook remove <pos>... | remove --id <id>");
    }

    if args[0] == "--id" {
        let id: i64 = args
            .get(1)
            .ok_or_else(|| anyhow::anyhow!("--id requires a value"))?
            .parse()?;
        ledger.remove_by_id(id)?;
        println!("Removed transaction #{id}");
        return Ok(());
    }

    // Positions are 1-based as printed by `list`.
    let mut indices = Vec::with_capacity(args.len());
    for arg in args {
        let pos: usize = arg.parse()?;
        if pos == 0 {
            anyhow::bail!("Positions start at 1");
        }
        indices.push(pos - 1);
    }

    if let [index] = indices[..] {
        ledger.remove(index)?;
    } else {
        ledger.remove_many(&indices)?;
    }
    println!("Removed {} transaction(s)", indices.len());
    Ok(())
}

fn cli_load(args: &[String], ledger: &mut Ledger) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: ledgerbook load <file.csv>");
    }
    let path = Path::new(&args[0]);
    if !path.exists() {
        anyhow::bail!("File not found: {}", args[0]);
    }

    let (headers, rows) = read_table(path)?;
    let count = ledger.replace_all(&headers, &rows)?;
    let summary = ledger.summary();
    println!(
        "Loaded {count} transactions — current balance ${:.2}",
        summary.balance
    );
    Ok(())
}

/// Read a CSV file as a header row plus string rows, the shape the schema
/// validator expects.
fn read_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    if rows.is_empty() {
        anyhow::bail!("CSV file is empty");
    }
    let headers = rows.remove(0);
    Ok((headers, rows))
}

fn cli_summary(ledger: &mut Ledger) -> Result<()> {
    let summary = ledger.summary();
    let count = ledger.list().len();

    println!("Ledgerbook");
    println!("{}", "─".repeat(40));
    println!("  Total Debits:  ${:.2}", summary.total_debit);
    println!("  Total Credits: ${:.2}", summary.total_credit);
    println!("  Balance:       ${:.2}", summary.balance);
    println!("  Transactions:  {count}");
    println!("  Categories:    {}", ledger.categories().names().join(", "));
    Ok(())
}

fn cli_report(ledger: &mut Ledger) -> Result<()> {
    let entries = ledger.list();
    if entries.is_empty() {
        println!("No transactions available for reporting");
        return Ok(());
    }

    println!("Monthly Totals:");
    println!("  {:<10} {:>12} {:>12}", "Month", "Debit", "Credit");
    for month in report::monthly_summary(entries) {
        println!(
            "  {:<10} {:>12} {:>12}",
            month.month,
            format!("{:.2}", month.debit),
            format!("{:.2}", month.credit),
        );
    }

    let spending = report::spending_by_category(entries);
    if !spending.is_empty() {
        println!();
        println!("Spending by Category:");
        for (name, total) in &spending {
            println!("  {name:<24} ${:.2}", total);
        }
    }
    Ok(())
}

/// Truncate to `max` visible characters, appending "…" if shortened.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let shortened: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{shortened}…")
}
