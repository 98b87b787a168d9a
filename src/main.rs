use anyhow::{bail, Result};
use std::env;
use std::path::Path;

use budget_ledger::{import_entries, load_csv, logging, summarize, Config, LedgerStore, VERSION};

const USAGE: &str = "usage: budget-ledger [summary | list | import <file.csv>]";

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_env()?;

    match args.get(1).map(String::as_str) {
        None | Some("summary") => run_summary(&config)?,
        Some("list") => run_list(&config)?,
        Some("import") => match args.get(2) {
            Some(path) => run_import(&config, Path::new(path))?,
            None => bail!("{}", USAGE),
        },
        Some("help") | Some("--help") | Some("-h") => println!("budget-ledger {}\n{}", VERSION, USAGE),
        Some(other) => bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}

fn run_import(config: &Config, csv_path: &Path) -> Result<()> {
    println!("📂 Loading {:?}...", csv_path);
    let entries = load_csv(csv_path)?;
    println!("✓ Parsed {} transactions", entries.len());

    let store = config.open_store()?;
    let inserted = import_entries(store.as_ref(), entries)?;
    println!("✓ Inserted {} transactions", inserted);

    print_summary(store.as_ref())
}

fn run_list(config: &Config) -> Result<()> {
    let store = config.open_store()?;
    let transactions = store.list_all()?;

    if transactions.is_empty() {
        println!("No transactions recorded.");
        return Ok(());
    }

    println!("{:>6}  {:<8}  {:>12}  {}", "ID", "KIND", "AMOUNT", "CATEGORY");
    for tx in &transactions {
        println!(
            "{:>6}  {:<8}  {:>12.2}  {}",
            tx.id, tx.kind, tx.amount, tx.category
        );
    }

    Ok(())
}

fn run_summary(config: &Config) -> Result<()> {
    let store = config.open_store()?;
    print_summary(store.as_ref())
}

fn print_summary(store: &dyn LedgerStore) -> Result<()> {
    let summary = summarize(&store.list_all()?);

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total income:   {:>12.2}", summary.total_income);
    println!("Total expenses: {:>12.2}", summary.total_expenses);
    println!("Balance:        {:>12.2}", summary.balance);

    Ok(())
}
