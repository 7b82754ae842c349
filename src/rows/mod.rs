// ABOUTME: Row source module for mail merge data files
// ABOUTME: Parses delimited data into header and per-row field dictionaries

pub mod error;
pub mod source;

pub use error::{Result, RowSourceError};
pub use source::{FieldDelimiter, FieldQuote, Row, RowDictionary, RowSet, RowWarning};
