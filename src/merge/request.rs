// ABOUTME: Merge job input: templates, recipients, and validated per-job settings
// ABOUTME: Setting enums fall back to documented defaults on unrecognized input

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use super::error::{MergeError, Result};

/// Body encoding for produced messages. Unrecognized configuration values
/// fall back to plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendMode {
    Html,
    #[default]
    Plain,
}

impl SendMode {
    pub fn from_config(value: &str) -> Self {
        match value {
            "html" => Self::Html,
            "plain" | "text" => Self::Plain,
            other => {
                warn!("Unrecognized send mode '{}', using plain", other);
                Self::Plain
            }
        }
    }
}

/// Message priority. Flags 1, 2, 4, 5 map to labelled levels; 3 or any
/// other value means normal, which adds no header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Priority {
    Highest,
    High,
    #[default]
    Normal,
    Low,
    Lowest,
}

impl From<u8> for Priority {
    fn from(flag: u8) -> Self {
        match flag {
            1 => Self::Highest,
            2 => Self::High,
            4 => Self::Low,
            5 => Self::Lowest,
            _ => Self::Normal,
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Highest => 1,
            Priority::High => 2,
            Priority::Normal => 3,
            Priority::Low => 4,
            Priority::Lowest => 5,
        }
    }
}

impl Priority {
    /// X-Priority header value, like `1 (Highest)`. Normal priority gets
    /// no header.
    pub fn header_value(&self) -> Option<String> {
        let label = match self {
            Self::Highest => "Highest",
            Self::High => "High",
            Self::Normal => return None,
            Self::Low => "Low",
            Self::Lowest => "Lowest",
        };
        Some(format!("{} ({})", u8::from(*self), label))
    }
}

/// Caller-supplied resource bounds for a merge job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeLimits {
    #[serde(default)]
    pub max_rows: Option<usize>,

    #[serde(default)]
    pub max_template_len: Option<usize>,
}

/// The whole-job input: templates for subject, body, and each address
/// list, plus static per-job settings. Read-only while rows are processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Identifier of the sending identity.
    pub from: String,

    pub subject: String,

    pub body: String,

    #[serde(default)]
    pub to: Vec<String>,

    #[serde(default)]
    pub cc: Vec<String>,

    #[serde(default)]
    pub bcc: Vec<String>,

    #[serde(default)]
    pub reply_to: Vec<String>,

    #[serde(default)]
    pub followup_to: Vec<String>,

    #[serde(default)]
    pub mode: SendMode,

    /// Request a read receipt (adds Disposition-Notification-To).
    #[serde(default)]
    pub notify: bool,

    #[serde(default)]
    pub priority: Priority,

    /// Target folder for saved messages. When absent, the caller's
    /// configured default applies.
    #[serde(default)]
    pub folder: Option<String>,

    #[serde(default)]
    pub attachments: Vec<PathBuf>,
}

impl MergeRequest {
    /// Check every template against the configured length limit. Runs
    /// before any row is processed; a violation is job-fatal.
    pub fn validate(&self, limits: &MergeLimits) -> Result<()> {
        let Some(limit) = limits.max_template_len else {
            return Ok(());
        };

        for (field, template) in self.templates() {
            if template.len() > limit {
                return Err(MergeError::TemplateTooLong {
                    field: field.to_string(),
                    length: template.len(),
                    limit,
                });
            }
        }

        Ok(())
    }

    fn templates(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let addresses = [
            ("to", &self.to),
            ("cc", &self.cc),
            ("bcc", &self.bcc),
            ("reply_to", &self.reply_to),
            ("followup_to", &self.followup_to),
        ];

        std::iter::once(("subject", self.subject.as_str()))
            .chain(std::iter::once(("body", self.body.as_str())))
            .chain(
                addresses
                    .into_iter()
                    .flat_map(|(field, list)| list.iter().map(move |t| (field, t.as_str()))),
            )
    }
}
