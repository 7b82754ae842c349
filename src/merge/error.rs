// ABOUTME: Error types for merge orchestration
// ABOUTME: Distinguishes job-fatal conditions from per-row failures carried in outcomes

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Access denied for sender '{sender}': {reason}")]
    AccessDenied { sender: String, reason: String },

    #[error("Unknown sender identity: {0}")]
    UnknownIdentity(String),

    #[error("Template '{field}' is {length} bytes, exceeding the {limit} byte limit")]
    TemplateTooLong {
        field: String,
        length: usize,
        limit: usize,
    },

    #[error("Row source error: {0}")]
    RowSourceError(#[from] crate::rows::RowSourceError),

    #[error("Mail collaborator error: {0}")]
    MailError(#[from] crate::mail::MailError),
}

pub type Result<T> = std::result::Result<T, MergeError>;
