use crate::cli::{notify, open_db, Severity};
use crate::error::{Result, SpendError};
use crate::models::ExpensePatch;
use crate::store::ExpenseStore;

pub fn run(
    id: i64,
    amount: Option<&str>,
    category: Option<&str>,
    date: Option<&str>,
    description: Option<&str>,
) -> Result<()> {
    let patch = ExpensePatch::from_raw(amount, category, date, description)?;
    if patch.is_empty() {
        return Err(SpendError::Other(
            "Nothing to change: pass --amount, --category, --date or --description".to_string(),
        ));
    }

    let conn = open_db()?;
    let mut store = ExpenseStore::open(&conn);
    if !store.update(id, &patch)? {
        return Err(SpendError::ExpenseNotFound(id));
    }
    notify(Severity::Success, "Expense updated successfully!");
    Ok(())
}
