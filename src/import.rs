// 📂 CSV import
//
// Expected header: kind,amount,category
// The whole file is validated before anything is appended, and the rows go
// in as one batch, so a bad row or a storage failure leaves the ledger
// untouched.

use crate::ledger::{Kind, NewTransaction};
use crate::store::LedgerStore;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ImportRow {
    kind: String,
    amount: f64,
    #[serde(default)]
    category: String,
}

pub fn load_csv(csv_path: &Path) -> Result<Vec<NewTransaction>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;
    load_csv_from_reader(file)
}

pub fn load_csv_from_reader<R: Read>(reader: R) -> Result<Vec<NewTransaction>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut entries = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row: ImportRow =
            result.with_context(|| format!("Failed to deserialize row on line {}", line))?;

        let kind: Kind = row
            .kind
            .parse()
            .with_context(|| format!("Invalid kind on line {}", line))?;
        let entry = NewTransaction::new(kind, row.amount, row.category)
            .with_context(|| format!("Invalid amount on line {}", line))?;

        entries.push(entry);
    }

    Ok(entries)
}

/// Append every entry in order, all or nothing; returns how many were stored
pub fn import_entries(store: &dyn LedgerStore, entries: Vec<NewTransaction>) -> Result<usize> {
    let inserted = store
        .append_batch(entries)
        .context("Failed to append imported transactions")?
        .len();

    tracing::info!(inserted, "csv import finished");

    Ok(inserted)
}
