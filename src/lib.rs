// ABOUTME: Main library module for the mailmill mail merge engine
// ABOUTME: Exports all core modules and provides the public API

pub mod cli;
pub mod mail;
pub mod merge;
pub mod rows;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use mail::{AccessPolicy, AttachmentStore, HtmlToText, IdentityLookup, MessageSink};
pub use merge::{MergeOrchestrator, MergeReport, MergeRequest, ResolvedMessage, RowOutcome};
pub use rows::{RowDictionary, RowSet};
pub use template::resolve;

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
