use crate::db::{open_data_dir, DB_FILE};
use crate::error::Result;
use crate::fmt::{format_bytes, money};
use crate::reports::aggregate;
use crate::settings::load_settings;
use crate::store::load_expenses;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join(DB_FILE);

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());
    println!("Currency:   {}", settings.currency_symbol);

    if !db_path.exists() {
        println!();
        println!("No expenses recorded yet. Run `spendbook add` to start.");
        return Ok(());
    }

    let size = std::fs::metadata(&db_path)?.len();
    println!("DB size:    {}", format_bytes(size));

    let conn = open_data_dir(&data_dir)?;
    let expenses = load_expenses(&conn);
    let all: Vec<_> = expenses.iter().collect();
    let summary = aggregate(&all);

    println!();
    println!("Expenses:     {}", summary.count);
    println!("Categories:   {}", summary.categories.len());
    println!("Grand total:  {}", money(&settings.currency_symbol, summary.total));
    Ok(())
}
