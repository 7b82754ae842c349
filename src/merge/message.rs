// ABOUTME: Per-row message description handed to the message sink
// ABOUTME: Holds resolved headers, recipients, bodies, and attachment parts

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Where an attachment part's bytes live. Inline data is stored base64
/// encoded when the message is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartData {
    File(PathBuf),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartDisposition {
    Attachment,
    Inline { content_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePart {
    pub name: String,
    pub mime_type: String,
    pub charset: Option<String>,
    pub disposition: PartDisposition,
    pub data: PartData,
}

/// The fully resolved output for one data row, with zero remaining tags.
/// Ownership passes to the message sink immediately after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMessage {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub reply_to: Vec<String>,
    pub followup_to: Vec<String>,
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
    pub headers: Vec<Header>,
    pub parts: Vec<MessagePart>,
}

impl ResolvedMessage {
    pub fn new(from: String, subject: String) -> Self {
        Self {
            from,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            reply_to: Vec::new(),
            followup_to: Vec::new(),
            subject,
            text_body: None,
            html_body: None,
            headers: Vec::new(),
            parts: Vec::new(),
        }
    }

    pub fn push_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push(Header {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn push_part(&mut self, part: MessagePart) {
        self.parts.push(part);
    }

    pub fn inline_parts(&self) -> impl Iterator<Item = &MessagePart> {
        self.parts
            .iter()
            .filter(|p| matches!(p.disposition, PartDisposition::Inline { .. }))
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
