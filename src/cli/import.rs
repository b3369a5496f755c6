use std::path::PathBuf;

use crate::cli::{notify, open_db, Severity};
use crate::error::Result;
use crate::exchange::parse_import;
use crate::store::ExpenseStore;

pub fn run(file: &str) -> Result<()> {
    let file_path = PathBuf::from(file);
    let text = std::fs::read_to_string(&file_path)?;

    // Parse before touching the store so a bad file changes nothing.
    let parsed = parse_import(&text)?;

    let conn = open_db()?;
    let mut store = ExpenseStore::open(&conn);
    let added = store.merge_import(parsed.records)?;

    notify(Severity::Success, &format!("Imported {added} new expenses!"));
    if parsed.skipped > 0 {
        println!("{} entries skipped (no usable id)", parsed.skipped);
    }
    Ok(())
}
