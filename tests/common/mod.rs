// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides a capturing message sink, canned identities, and request builders

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use mailmill::mail::{ConfigIdentityLookup, MailError, MessageSink, SenderIdentity};
use mailmill::merge::{MergeRequest, Priority, ResolvedMessage, SendMode};
use mailmill::rows::{FieldDelimiter, FieldQuote, RowSet};

/// Message sink that records every save in memory. Can be configured to
/// reject saves whose subject contains a marker string.
pub struct MemorySink {
    folders: Vec<String>,
    fail_subject: Option<String>,
    saved: Mutex<Vec<(String, ResolvedMessage)>>,
}

impl MemorySink {
    pub fn new(folders: &[&str]) -> Self {
        Self {
            folders: folders.iter().map(|f| f.to_string()).collect(),
            fail_subject: None,
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_when_subject_contains(mut self, marker: &str) -> Self {
        self.fail_subject = Some(marker.to_string());
        self
    }

    pub fn saved_messages(&self) -> Vec<(String, ResolvedMessage)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSink for MemorySink {
    async fn folders(&self) -> mailmill::mail::Result<Vec<String>> {
        Ok(self.folders.clone())
    }

    async fn save(&self, folder: &str, message: &ResolvedMessage) -> mailmill::mail::Result<()> {
        if let Some(marker) = &self.fail_subject {
            if message.subject.contains(marker) {
                return Err(MailError::SaveFailed {
                    folder: folder.to_string(),
                    message: "simulated sink failure".to_string(),
                });
            }
        }

        self.saved
            .lock()
            .unwrap()
            .push((folder.to_string(), message.clone()));
        Ok(())
    }
}

pub fn test_identity() -> SenderIdentity {
    SenderIdentity {
        name: "Jane Doe".to_string(),
        email: "jane@example.org".to_string(),
        organization: Some("Example Corp".to_string()),
    }
}

pub fn identity_lookup() -> ConfigIdentityLookup {
    let mut identities = HashMap::new();
    identities.insert("work".to_string(), test_identity());
    ConfigIdentityLookup::new(identities)
}

pub fn base_request() -> MergeRequest {
    MergeRequest {
        from: "work".to_string(),
        subject: "Hello {{name}}".to_string(),
        body: "Hi {{name}}, this is for you.".to_string(),
        to: vec!["{{email}}".to_string()],
        cc: Vec::new(),
        bcc: Vec::new(),
        reply_to: Vec::new(),
        followup_to: Vec::new(),
        mode: SendMode::Plain,
        notify: false,
        priority: Priority::Normal,
        folder: Some("Drafts".to_string()),
        attachments: Vec::new(),
    }
}

/// Parse semicolon-delimited test data.
pub fn rows(data: &str) -> RowSet {
    RowSet::parse(
        data.as_bytes(),
        FieldDelimiter::Semicolon,
        FieldQuote::Double,
    )
    .unwrap()
}

pub fn two_person_rows() -> RowSet {
    rows("name;email\nAlice;alice@x.com\nBob;bob@x.com\n")
}
