// src/utils/error.rs
use thiserror::Error;

/// Failures that make a single filing unusable. The caller logs them and
/// moves on to the next filing.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Filer section missing from file {file}")]
    MissingFiler { file: String },

    #[error("EIN missing from file {file}")]
    MissingEin { file: String },

    #[error("Organization name missing from file {file}")]
    MissingOrgName { file: String },

    #[error("Malformed XML in file {file}: {source}")]
    Xml {
        file: String,
        #[source]
        source: roxmltree::Error,
    },
}

impl ExtractError {
    /// Name of the filing the failure belongs to.
    pub fn file(&self) -> &str {
        match self {
            ExtractError::MissingFiler { file }
            | ExtractError::MissingEin { file }
            | ExtractError::MissingOrgName { file }
            | ExtractError::Xml { file, .. } => file,
        }
    }
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid probability {probability} for name '{name}'")]
    InvalidProbability { name: String, probability: f64 },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Name table error: {0}")]
    Table(#[from] TableError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
