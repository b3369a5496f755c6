use chrono::Local;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{open_db, view_state};
use crate::error::Result;
use crate::fmt::{format_category_name, money};
use crate::models::category_icon;
use crate::reports::aggregate;
use crate::settings::load_settings;
use crate::store::ExpenseStore;

pub fn run(period: Option<&str>, month: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let symbol = &settings.currency_symbol;
    let conn = open_db()?;
    let store = ExpenseStore::open(&conn);

    let today = Local::now().date_naive();
    let view = view_state(period, month);
    let summary = aggregate(&view.filter(store.expenses(), today));

    println!("{}", view.label(today).bold());
    println!("Total:         {}", money(symbol, summary.total));
    println!("Transactions:  {}", summary.count);
    println!();

    if summary.categories.is_empty() {
        println!("No expenses in this period");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%", "Count"]);
    for item in &summary.categories {
        table.add_row(vec![
            Cell::new(format!("{} {}", category_icon(&item.category), format_category_name(&item.category))),
            Cell::new(money(symbol, item.total)),
            Cell::new(format!("{:.1}%", item.pct)),
            Cell::new(item.count),
        ]);
    }
    println!("Category Breakdown\n{table}");
    Ok(())
}
