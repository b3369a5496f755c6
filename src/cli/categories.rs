use comfy_table::{Cell, Table};

use crate::fmt::format_category_name;
use crate::models::Category;

pub fn run() {
    let mut table = Table::new();
    table.set_header(vec!["", "Tag", "Name"]);
    for cat in Category::ALL {
        table.add_row(vec![
            Cell::new(cat.icon()),
            Cell::new(cat.tag()),
            Cell::new(format_category_name(cat.tag())),
        ]);
    }
    println!("Categories\n{table}");
}
