// ABOUTME: Attachment store collaborator fetching attachment content and metadata
// ABOUTME: Ships a filesystem-backed implementation resolving references as paths

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::{MailError, Result};
use crate::merge::message::PartData;

/// One fetched attachment: the id the compose session knows it by, display
/// metadata, and where its bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub charset: Option<String>,
    pub data: PartData,
}

#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn fetch(&self, reference: &Path) -> Result<Attachment>;
}

/// Attachment store resolving references directly as filesystem paths.
/// The attachment id is the file stem, which is what inline references in
/// an HTML body are keyed by.
#[derive(Debug, Clone, Default)]
pub struct FsAttachmentStore;

impl FsAttachmentStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AttachmentStore for FsAttachmentStore {
    async fn fetch(&self, reference: &Path) -> Result<Attachment> {
        if !tokio::fs::try_exists(reference).await.unwrap_or(false) {
            return Err(MailError::AttachmentNotFound(
                reference.display().to_string(),
            ));
        }

        let name = reference
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "attachment".to_string());

        let id = reference
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| name.clone());

        let mime_type = mime_for_extension(reference).to_string();

        debug!("Fetched attachment '{}' ({})", name, mime_type);

        Ok(Attachment {
            id,
            name,
            mime_type,
            charset: None,
            data: PartData::File(PathBuf::from(reference)),
        })
    }
}

fn mime_for_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "eml" => "message/rfc822",
        _ => "application/octet-stream",
    }
}
