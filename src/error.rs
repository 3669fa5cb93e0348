use thiserror::Error;

#[derive(Error, Debug)]
pub enum MsarError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Report fetch failed: {0}")]
    Fetch(String),

    #[error("Invalid date: {0} (use YYYY-MM-DD or YYYYMMDD)")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("No accounts found in {0}")]
    NoAccounts(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MsarError>;
