use std::path::PathBuf;

use chrono::Local;

use crate::cli::{notify, open_db, Severity};
use crate::error::Result;
use crate::exchange::{export_file_name, export_json};
use crate::settings::get_data_dir;
use crate::store::load_expenses;

fn default_path() -> PathBuf {
    let name = export_file_name(Local::now().date_naive());
    get_data_dir().join("exports").join(name)
}

pub fn run(output: Option<String>) -> Result<()> {
    let conn = open_db()?;
    let expenses = load_expenses(&conn);
    let json = export_json(&expenses)?;

    let path = output.map(PathBuf::from).unwrap_or_else(default_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, format!("{json}\n"))?;

    notify(Severity::Success, "Data exported successfully!");
    println!("Wrote {} expenses to {}", expenses.len(), path.display());
    Ok(())
}
