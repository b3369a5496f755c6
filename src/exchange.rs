use chrono::NaiveDate;
use serde_json::Value;
use tracing::warn;

use crate::error::{Result, SpendError};
use crate::models::Expense;

/// Records read from a JSON array, plus how many elements had to be dropped
/// because they could not form an expense at all.
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub records: Vec<Expense>,
    pub skipped: usize,
}

/// Parse a JSON document holding an array of expenses.
///
/// Fails on invalid JSON or when the top level is not an array. Elements are
/// not validated beyond needing an integer `id`; an element without one is
/// skipped and counted.
pub fn parse_import(text: &str) -> Result<ParsedImport> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(SpendError::InvalidImport(
            "expected a JSON array of expenses".to_string(),
        ));
    };

    let mut parsed = ParsedImport::default();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Expense>(item) {
            Ok(expense) => parsed.records.push(expense),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed expense");
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

pub fn export_json(records: &[Expense]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("expenses_{}.json", date.format("%Y-%m-%d"))
}
