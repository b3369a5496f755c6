use chrono::Local;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::{open_db, view_state};
use crate::error::Result;
use crate::fmt::{format_category_name, format_date, money};
use crate::models::category_icon;
use crate::period::search;
use crate::settings::load_settings;
use crate::store::ExpenseStore;

pub fn run(
    period: Option<&str>,
    month: Option<&str>,
    term: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    let settings = load_settings();
    let conn = open_db()?;
    let store = ExpenseStore::open(&conn);

    let today = Local::now().date_naive();
    let view = view_state(period, month);
    let in_window = view.filter(store.expenses(), today);
    let shown = search(&in_window, term.unwrap_or_default(), category);

    if shown.is_empty() {
        println!("No expenses found");
        println!("Start tracking your expenses with `spendbook add`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Category", "Description", "Amount"]);
    for e in &shown {
        table.add_row(vec![
            Cell::new(e.id),
            Cell::new(format_date(&e.date)),
            Cell::new(format!("{} {}", category_icon(&e.category), format_category_name(&e.category))),
            Cell::new(&e.description),
            Cell::new(money(&settings.currency_symbol, e.amount)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}\n{table}", view.label(today));
    Ok(())
}
