// ABOUTME: Message sink collaborator storing one resolved message per call
// ABOUTME: Ships a filesystem sink writing JSON documents and a dry-run sink that only logs

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{MailError, Result};
use crate::merge::message::ResolvedMessage;

/// Save-to-folder collaborator. Each save call is treated as atomic; the
/// core never appends to a folder concurrently through the same sink.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Names of the folders that exist in the backing store.
    async fn folders(&self) -> Result<Vec<String>>;

    async fn save(&self, folder: &str, message: &ResolvedMessage) -> Result<()>;
}

/// Filesystem sink: folders are subdirectories of a root, and each message
/// is stored as a pretty-printed JSON document. Wire-format MIME
/// composition belongs to the host mail system, not here.
#[derive(Debug, Clone)]
pub struct FsMessageSink {
    root: PathBuf,
}

impl FsMessageSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl MessageSink for FsMessageSink {
    async fn folders(&self) -> Result<Vec<String>> {
        let mut folders = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(_) => return Ok(folders),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                folders.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(folders)
    }

    async fn save(&self, folder: &str, message: &ResolvedMessage) -> Result<()> {
        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(format!("{}.json", Uuid::new_v4()));
        let document = serde_json::to_vec_pretty(message)?;

        tokio::fs::write(&path, document)
            .await
            .map_err(|e| MailError::SaveFailed {
                folder: folder.to_string(),
                message: e.to_string(),
            })?;

        debug!("Saved message '{}' to {}", message.subject, path.display());
        Ok(())
    }
}

/// Sink for dry runs: accepts a fixed folder list and logs each message
/// instead of storing it.
#[derive(Debug, Clone)]
pub struct DryRunSink {
    folders: Vec<String>,
}

impl DryRunSink {
    pub fn accepting(folders: Vec<String>) -> Self {
        Self { folders }
    }
}

#[async_trait]
impl MessageSink for DryRunSink {
    async fn folders(&self) -> Result<Vec<String>> {
        Ok(self.folders.clone())
    }

    async fn save(&self, folder: &str, message: &ResolvedMessage) -> Result<()> {
        info!(
            "[dry run] would save to '{}': subject='{}' to={:?}",
            folder, message.subject, message.to
        );
        Ok(())
    }
}
