// ABOUTME: Error types for mail collaborator operations
// ABOUTME: Covers message saving, attachment retrieval, and serialization failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Failed to save message to folder '{folder}': {message}")]
    SaveFailed { folder: String, message: String },

    #[error("Attachment not found: {0}")]
    AttachmentNotFound(String),

    #[error("Failed to serialize message: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MailError>;
