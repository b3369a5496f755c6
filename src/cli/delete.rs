use crate::cli::{notify, open_db, Severity};
use crate::error::Result;
use crate::store::ExpenseStore;

pub fn run(id: i64) -> Result<()> {
    let conn = open_db()?;
    let mut store = ExpenseStore::open(&conn);
    if store.remove(id)? {
        notify(Severity::Success, "Expense deleted successfully!");
    } else {
        notify(Severity::Error, &format!("No expense with id {id}; nothing deleted."));
    }
    Ok(())
}
