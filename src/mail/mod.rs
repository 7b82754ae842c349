// ABOUTME: Collaborator interfaces around the merge core
// ABOUTME: Message sink, identity lookup, attachment store, HTML conversion, and access policy

pub mod attachments;
pub mod error;
pub mod html;
pub mod identity;
pub mod policy;
pub mod sink;

pub use attachments::{Attachment, AttachmentStore, FsAttachmentStore};
pub use error::{MailError, Result};
pub use html::{HtmlToText, TagStrippingConverter};
pub use identity::{ConfigIdentityLookup, IdentityLookup, SenderIdentity};
pub use policy::{AccessPolicy, DenyListPolicy, PolicyDecision};
pub use sink::{DryRunSink, FsMessageSink, MessageSink};
