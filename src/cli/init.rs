use std::path::PathBuf;

use crate::db::open_data_dir;
use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>, currency: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(symbol) = currency {
        settings.currency_symbol = symbol;
    }
    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    open_data_dir(&resolved)?;
    std::fs::create_dir_all(resolved.join("exports"))?;
    std::fs::create_dir_all(resolved.join("backups"))?;

    println!("Initialized spendbook at {}", resolved.display());
    Ok(())
}
