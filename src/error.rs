use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog returned status {0}")]
    CatalogStatus(u16),

    #[error("Invalid amount range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },
}

pub type Result<T> = std::result::Result<T, SalesError>;
