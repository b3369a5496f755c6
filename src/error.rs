use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpendError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid import: {0}")]
    InvalidImport(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Expense id {0} is already in use")]
    DuplicateId(i64),

    #[error("No expense with id {0}")]
    ExpenseNotFound(i64),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SpendError>;
