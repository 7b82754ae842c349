// ABOUTME: Error types for row source parsing
// ABOUTME: Defines specific error types for reading and parsing delimited data

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowSourceError {
    #[error("Failed to read data file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse delimited data: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Data file contains no header record")]
    MissingHeader,
}

pub type Result<T> = std::result::Result<T, RowSourceError>;
