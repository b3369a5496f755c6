pub mod add;
pub mod backup;
pub mod categories;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod status;
pub mod summary;

use clap::{Parser, Subcommand};
use colored::Colorize;
use rusqlite::Connection;

use crate::db::open_data_dir;
use crate::error::Result;
use crate::period::{Period, ViewState};
use crate::settings::get_data_dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Report the outcome of an action to the user.
pub fn notify(severity: Severity, message: &str) {
    match severity {
        Severity::Success => println!("{}", message.green()),
        Severity::Error => eprintln!("{}", message.red()),
    }
}

pub(crate) fn open_db() -> Result<Connection> {
    open_data_dir(&get_data_dir())
}

/// Build the view for one invocation. `--month` on its own implies the month
/// period; with no flags at all the view is today.
pub(crate) fn view_state(period: Option<&str>, month: Option<&str>) -> ViewState {
    let period = match (period, month) {
        (Some(p), _) => Period::from_name(p),
        (None, Some(_)) => Period::Month,
        (None, None) => Period::default(),
    };
    let mut view = ViewState::default();
    view.select_period(period, month);
    view
}

#[derive(Parser)]
#[command(name = "spendbook", about = "Track personal expenses and see where the money goes.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for spendbook data (default: ~/Documents/spendbook)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Currency symbol used when showing amounts
        #[arg(long)]
        currency: Option<String>,
    },
    /// Record a new expense.
    Add {
        /// Amount spent
        amount: String,
        /// Category tag (see `spendbook categories`)
        #[arg(long, short)]
        category: String,
        /// Transaction date: YYYY-MM-DD (default: today)
        #[arg(long, short)]
        date: Option<String>,
        /// Free-text note
        #[arg(long, short = 'm')]
        description: Option<String>,
    },
    /// List expenses in a period, optionally searched and filtered.
    List {
        /// today, week, month, year or all
        #[arg(long, short)]
        period: Option<String>,
        /// Month to show: YYYY-MM (implies --period month)
        #[arg(long)]
        month: Option<String>,
        /// Match description, category or amount
        #[arg(long, short)]
        search: Option<String>,
        /// Only this category tag
        #[arg(long, short)]
        category: Option<String>,
    },
    /// Show total, count and category breakdown for a period.
    Summary {
        /// today, week, month, year or all
        #[arg(long, short)]
        period: Option<String>,
        /// Month to show: YYYY-MM (implies --period month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Delete an expense by ID.
    Delete {
        /// Expense ID (shown in `spendbook list`)
        id: i64,
    },
    /// Change fields of an existing expense.
    Edit {
        /// Expense ID (shown in `spendbook list`)
        id: i64,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Merge expenses from a JSON export, skipping IDs already present.
    Import {
        /// Path to a JSON file holding an array of expenses
        file: String,
    },
    /// Write all expenses to a JSON file.
    Export {
        /// Output path (default: <data_dir>/exports/expenses_YYYY-MM-DD.json)
        #[arg(long)]
        output: Option<String>,
    },
    /// List the known categories.
    Categories,
    /// Back up the database.
    Backup {
        /// Output path (default: <data_dir>/backups/spendbook-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show data location and overall totals.
    Status,
}
