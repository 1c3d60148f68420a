mod error;
mod ledger;
mod models;
mod report;
mod run;
mod storage;
mod validate;

use anyhow::{Context, Result};
use std::path::PathBuf;

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let path = match take_file_flag(&mut args)? {
        Some(path) => path,
        None => default_data_path()?,
    };

    let store = storage::LedgerFile::new(path.clone());
    let mut ledger = ledger::Ledger::open(store)
        .with_context(|| format!("Failed to open ledger file: {}", path.display()))?;

    match args.len() {
        1 => {
            run::print_usage();
            Ok(())
        }
        2.. => run::as_cli(&args, &mut ledger),
        _ => {
            eprintln!("Usage: ledgerbook [command]");
            Ok(())
        }
    }
}

/// Strip a `--file <path>` pair from the arguments, wherever it appears.
fn take_file_flag(args: &mut Vec<String>) -> Result<Option<PathBuf>> {
    let Some(i) = args.iter().position(|a| a == "--file") else {
        return Ok(None);
    };
    if i + 1 >= args.len() {
        anyhow::bail!("--file requires a path");
    }
    let path = args.remove(i + 1);
    args.remove(i);
    Ok(Some(PathBuf::from(path)))
}

fn default_data_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "ledgerbook", "Ledgerbook")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("ledger.csv"))
}
