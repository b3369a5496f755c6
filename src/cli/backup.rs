use std::path::PathBuf;

use rusqlite::backup::Backup;
use tracing::info;

use crate::cli::{notify, open_db, Severity};
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::get_data_dir;

pub fn run(output: Option<String>) -> Result<()> {
    let conn = open_db()?;

    let dest_path = match output {
        Some(p) => PathBuf::from(p),
        None => {
            let backups_dir = get_data_dir().join("backups");
            std::fs::create_dir_all(&backups_dir)?;
            let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
            backups_dir.join(format!("spendbook-{stamp}.db"))
        }
    };

    let mut dest_conn = rusqlite::Connection::open(&dest_path)?;
    let backup = Backup::new(&conn, &mut dest_conn)?;
    backup.run_to_completion(100, std::time::Duration::from_millis(10), None)?;
    info!(path = %dest_path.display(), "backup complete");

    let size = std::fs::metadata(&dest_path)?.len();
    notify(Severity::Success, &format!("Backup saved to {}", dest_path.display()));
    println!("Size: {}", format_bytes(size));
    Ok(())
}
