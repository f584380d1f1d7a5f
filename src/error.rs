use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexicardError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("corrupt review store: {0}")]
    CorruptStore(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("review store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, LexicardError>;
