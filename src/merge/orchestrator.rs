// ABOUTME: Per-row merge control loop producing one resolved message per data row
// ABOUTME: Resolves templates, assembles headers and attachments, and hands messages to the sink

use chrono::Utc;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::error::{MergeError, Result};
use super::message::{MessagePart, PartDisposition, ResolvedMessage};
use super::request::{MergeLimits, MergeRequest, SendMode};
use super::result::{MergeReport, RowOutcome};
use crate::mail::{
    AccessPolicy, Attachment, AttachmentStore, HtmlToText, IdentityLookup, MessageSink,
    PolicyDecision, SenderIdentity,
};
use crate::rows::{Row, RowSet};
use crate::template::resolve;

const FALLBACK_FOLDER: &str = "Drafts";

/// Drives one merge job: iterates rows in order, resolves every templated
/// field against each row, and hands the assembled message to the sink.
/// A failure producing one row's message never blocks later rows.
pub struct MergeOrchestrator {
    identity: Arc<dyn IdentityLookup>,
    policy: Arc<dyn AccessPolicy>,
    attachments: Arc<dyn AttachmentStore>,
    html: Arc<dyn HtmlToText>,
    sink: Arc<dyn MessageSink>,
    limits: MergeLimits,
    user_agent: String,
}

impl MergeOrchestrator {
    pub fn new(
        identity: Arc<dyn IdentityLookup>,
        policy: Arc<dyn AccessPolicy>,
        attachments: Arc<dyn AttachmentStore>,
        html: Arc<dyn HtmlToText>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            identity,
            policy,
            attachments,
            html,
            sink,
            limits: MergeLimits::default(),
            user_agent: format!("mailmill/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_limits(mut self, limits: MergeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Run a merge job over the given rows.
    ///
    /// Fails fast before any row on access denial, an unknown sender
    /// identity, or a template over the configured length limit. Per-row
    /// failures are recorded in the report and processing continues.
    #[instrument(skip(self, request, rows), fields(sender = %request.from))]
    pub async fn run(&self, request: &MergeRequest, rows: &RowSet) -> Result<MergeReport> {
        let run_id = Uuid::new_v4().to_string();
        info!(
            "Starting merge run {} over {} rows for sender '{}'",
            run_id,
            rows.len(),
            request.from
        );

        request.validate(&self.limits)?;

        let identity = self
            .identity
            .lookup(&request.from)
            .ok_or_else(|| MergeError::UnknownIdentity(request.from.clone()))?;

        if let PolicyDecision::Deny { reason } = self.policy.check(&identity) {
            return Err(MergeError::AccessDenied {
                sender: request.from.clone(),
                reason,
            });
        }

        let mut report = MergeReport::new(run_id);

        for warning in &rows.warnings {
            warn!("Row source: {}", warning);
            report.add_warning(warning.to_string());
        }

        let requested = request.folder.as_deref().unwrap_or(FALLBACK_FOLDER);
        let folder = match self.resolve_folder(requested).await {
            Ok(folder) => folder,
            Err(fallback) => {
                report.add_warning(fallback);
                FALLBACK_FOLDER.to_string()
            }
        };

        for row in &rows.rows {
            let mut outcome = RowOutcome::new(row.index);

            if let Some(max) = self.limits.max_rows {
                if row.index > max {
                    outcome.mark_skipped(format!("row limit of {} reached", max));
                    report.add_outcome(outcome);
                    continue;
                }
            }

            match self.build_message(request, &identity, row).await {
                Ok(message) => {
                    outcome.mark_resolved(message.to.clone());
                    match self.sink.save(&folder, &message).await {
                        Ok(()) => {
                            debug!("Row {} saved to '{}'", row.index, folder);
                            outcome.mark_saved();
                        }
                        Err(e) => {
                            error!("Row {}: save failed: {}", row.index, e);
                            outcome.mark_failed(e.to_string());
                        }
                    }
                }
                Err(e) => {
                    error!("Row {}: could not produce message: {}", row.index, e);
                    outcome.mark_failed(e.to_string());
                }
            }

            report.add_outcome(outcome);
        }

        report.mark_completed();
        info!(
            "Merge run {} finished: {} attempted, {} succeeded, {} failed, {} skipped",
            report.run_id,
            report.summary.rows_attempted,
            report.summary.rows_succeeded,
            report.summary.rows_failed,
            report.summary.rows_skipped
        );

        Ok(report)
    }

    /// Validate the requested folder against the sink's folder list. On a
    /// miss, or when the sink cannot list folders, fall back to Drafts.
    async fn resolve_folder(&self, requested: &str) -> std::result::Result<String, String> {
        match self.sink.folders().await {
            Ok(folders) if folders.iter().any(|f| f == requested) => Ok(requested.to_string()),
            Ok(_) => {
                warn!(
                    "Folder '{}' does not exist, saving to {}",
                    requested, FALLBACK_FOLDER
                );
                Err(format!(
                    "folder '{}' does not exist, saved to {}",
                    requested, FALLBACK_FOLDER
                ))
            }
            Err(e) => {
                warn!("Could not list folders ({}), saving to {}", e, FALLBACK_FOLDER);
                Err(format!(
                    "could not list folders ({}), saved to {}",
                    e, FALLBACK_FOLDER
                ))
            }
        }
    }

    async fn build_message(
        &self,
        request: &MergeRequest,
        identity: &SenderIdentity,
        row: &Row,
    ) -> Result<ResolvedMessage> {
        let dict = &row.dictionary;
        let from = identity.display();
        let domain = identity.domain();

        let subject = resolve(&request.subject, dict);
        let mut message = ResolvedMessage::new(from.clone(), subject);

        message.to = resolve_addresses(&request.to, dict);
        message.cc = resolve_addresses(&request.cc, dict);
        message.bcc = resolve_addresses(&request.bcc, dict);
        message.reply_to = resolve_addresses(&request.reply_to, dict);
        message.followup_to = resolve_addresses(&request.followup_to, dict);

        // Reply addresses go out under both the standard and the
        // draft-standard header names; followups only under the latter.
        if !message.reply_to.is_empty() {
            let value = message.reply_to.join(", ");
            message.push_header("Reply-To", value.clone());
            message.push_header("Mail-Reply-To", value);
        }
        if !message.followup_to.is_empty() {
            message.push_header("Mail-Followup-To", message.followup_to.join(", "));
        }

        message.push_header("Date", Utc::now().to_rfc2822());
        message.push_header("User-Agent", self.user_agent.clone());
        message.push_header(
            "Message-ID",
            format!(
                "<{}.{}@{}>",
                Utc::now().timestamp(),
                Uuid::new_v4().simple(),
                domain
            ),
        );

        if let Some(organization) = identity.organization.as_deref() {
            if !organization.is_empty() {
                message.push_header("Organization", organization);
            }
        }

        let body = resolve(&request.body, dict);
        match request.mode {
            SendMode::Html => {
                message.text_body = Some(self.html.convert(&body));
                message.html_body = Some(body);
            }
            SendMode::Plain => {
                message.text_body = Some(body);
            }
        }

        if request.notify {
            message.push_header("Disposition-Notification-To", from);
        }

        if let Some(value) = request.priority.header_value() {
            message.push_header("X-Priority", value);
        }

        for reference in &request.attachments {
            let attachment = self.attachments.fetch(reference).await?;
            attach(&mut message, attachment, row.index, domain);
        }

        Ok(message)
    }
}

fn resolve_addresses(templates: &[String], dict: &crate::rows::RowDictionary) -> Vec<String> {
    templates
        .iter()
        .map(|template| resolve(template, dict))
        .map(|address| address.trim().to_string())
        .filter(|address| !address.is_empty())
        .collect()
}

/// Add one attachment to the message. When the HTML body references the
/// attachment through a display-attachment URL, the reference is rewritten
/// to a generated content id and the part is attached inline instead.
fn attach(message: &mut ResolvedMessage, attachment: Attachment, row_index: usize, domain: &str) {
    let mime_type = normalize_mime(&attachment.mime_type);

    let mut inline_cid = None;
    if let Some(body) = message.html_body.take() {
        match rewrite_inline_reference(&body, &attachment.id, row_index, domain) {
            Some((rewritten, cid)) => {
                message.html_body = Some(rewritten);
                inline_cid = Some(cid);
            }
            None => message.html_body = Some(body),
        }
    }

    let disposition = match inline_cid {
        Some(content_id) => PartDisposition::Inline { content_id },
        None => PartDisposition::Attachment,
    };

    message.push_part(MessagePart {
        name: attachment.name,
        mime_type,
        charset: attachment.charset,
        disposition,
        data: attachment.data,
    });
}

/// Find a quoted display-attachment URL keyed by the attachment id and
/// replace it with a generated `cid:` reference. Returns the rewritten
/// body and the content id, or None when the body has no such reference.
fn rewrite_inline_reference(
    body: &str,
    attachment_id: &str,
    row_index: usize,
    domain: &str,
) -> Option<(String, String)> {
    let pattern = format!(
        r#"['"]\S+display-attachment\S+file=rcmfile{}['"]"#,
        regex::escape(attachment_id)
    );
    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(e) => {
            warn!("Invalid inline reference pattern for '{}': {}", attachment_id, e);
            return None;
        }
    };

    if !regex.is_match(body) {
        return None;
    }

    let content_id = generate_content_id(row_index, domain);
    let rewritten = regex
        .replace_all(body, format!("\"cid:{}\"", content_id))
        .into_owned();

    Some((rewritten, content_id))
}

/// Content ids must be unique per attachment per row; timestamp, row index
/// and a random token provide that, with the sender domain as suffix.
fn generate_content_id(row_index: usize, domain: &str) -> String {
    format!(
        "{}r{}x{}@{}",
        Utc::now().timestamp_micros(),
        row_index,
        Uuid::new_v4().simple(),
        domain
    )
}

fn normalize_mime(mime_type: &str) -> String {
    // Old Internet Explorer uploads label JPEGs as image/pjpeg.
    if mime_type == "image/pjpeg" {
        "image/jpeg".to_string()
    } else if mime_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        mime_type.to_string()
    }
}
