use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EcofactorError {
    #[error("unsupported file format: {0}. Export the sheet as comma-separated text (.csv) and import that instead.")]
    UnsupportedFormat(String),

    #[error("failed to parse input: {0}")]
    ParseError(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("fuel '{name}' not found in catalog")]
    FuelNotFound { name: String },

    #[error("fuel '{fuel}' is not valid for sector '{sector}'")]
    SectorMismatch { fuel: String, sector: String },

    #[error("failed to load fuel catalog from {path}: {reason}")]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("invalid fuel catalog: {0}")]
    CatalogInvalid(String),

    #[error("invalid emission factor record: {0}")]
    InvalidRecord(String),

    #[error("record '{id}' is system-owned and cannot be modified")]
    ReadOnlyRecord { id: String },

    #[error("record '{id}' not found")]
    RecordNotFound { id: String },

    #[error("store error: {0}")]
    Store(String),

    #[error("processing failed: {0}")]
    Processing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
