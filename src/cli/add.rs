use chrono::Local;

use crate::cli::{notify, open_db, Severity};
use crate::error::Result;
use crate::models::ExpenseDraft;
use crate::store::ExpenseStore;

pub fn run(amount: &str, category: &str, date: Option<&str>, description: Option<&str>) -> Result<()> {
    let now = Local::now();
    let draft = ExpenseDraft::from_raw(amount, category, date, description, now.date_naive())?;

    let conn = open_db()?;
    let mut store = ExpenseStore::open(&conn);
    let expense = store.add_draft(draft, now)?;

    notify(Severity::Success, "Expense added successfully!");
    println!("ID: {}", expense.id);
    Ok(())
}
