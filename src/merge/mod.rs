// ABOUTME: Merge orchestration module driving one message per data row
// ABOUTME: Defines the merge request, resolved message, row outcomes, and the orchestrator

pub mod error;
pub mod message;
pub mod orchestrator;
pub mod request;
pub mod result;

pub use error::{MergeError, Result};
pub use message::{Header, MessagePart, PartData, PartDisposition, ResolvedMessage};
pub use orchestrator::MergeOrchestrator;
pub use request::{MergeLimits, MergeRequest, Priority, SendMode};
pub use result::{MergeReport, MergeStatus, MergeSummary, RowOutcome, RowStatus};
