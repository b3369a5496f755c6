mod cli;
mod db;
mod error;
mod exchange;
mod fmt;
mod models;
mod period;
mod reports;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{notify, Cli, Commands, Severity};

/// Log filter comes from `SPENDBOOK_LOG`, e.g. `SPENDBOOK_LOG=debug`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("SPENDBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::summary::run(None, None),
        Some(command) => match command {
            Commands::Init { data_dir, currency } => cli::init::run(data_dir, currency),
            Commands::Add {
                amount,
                category,
                date,
                description,
            } => cli::add::run(&amount, &category, date.as_deref(), description.as_deref()),
            Commands::List {
                period,
                month,
                search,
                category,
            } => cli::list::run(
                period.as_deref(),
                month.as_deref(),
                search.as_deref(),
                category.as_deref(),
            ),
            Commands::Summary { period, month } => cli::summary::run(period.as_deref(), month.as_deref()),
            Commands::Delete { id } => cli::delete::run(id),
            Commands::Edit {
                id,
                amount,
                category,
                date,
                description,
            } => cli::edit::run(
                id,
                amount.as_deref(),
                category.as_deref(),
                date.as_deref(),
                description.as_deref(),
            ),
            Commands::Import { file } => cli::import::run(&file),
            Commands::Export { output } => cli::export::run(output),
            Commands::Categories => {
                cli::categories::run();
                Ok(())
            }
            Commands::Backup { output } => cli::backup::run(output),
            Commands::Status => cli::status::run(),
        },
    };

    if let Err(e) = result {
        notify(Severity::Error, &format!("Error: {e}"));
        std::process::exit(1);
    }
}
