// ABOUTME: Command implementations for the mailmill CLI
// ABOUTME: Handles execution of the run and validate commands

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::mail::{
    ConfigIdentityLookup, DenyListPolicy, DryRunSink, FsAttachmentStore, FsMessageSink,
    MessageSink, TagStrippingConverter,
};
use crate::merge::{MergeError, MergeOrchestrator, MergeRequest, MergeStatus};
use crate::rows::{FieldDelimiter, FieldQuote, RowSet};

/// Execute a merge job over a data file
#[allow(clippy::too_many_arguments)]
pub async fn run_merge(
    job_path: PathBuf,
    data_path: PathBuf,
    delimiter: Option<String>,
    quote: Option<String>,
    folder: Option<String>,
    dry_run: bool,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    info!("Starting merge job: {}", job_path.display());

    let mut request = load_request(&job_path)?;

    // Precedence: --folder flag, then the job file, then config defaults.
    let target_folder = folder
        .or_else(|| request.folder.take())
        .unwrap_or_else(|| config.defaults.folder.clone());
    request.folder = Some(target_folder.clone());

    let rows = load_rows(&data_path, delimiter, quote, config)?;
    info!("Loaded {} data rows from {}", rows.len(), data_path.display());

    let sink: Arc<dyn MessageSink> = if dry_run {
        Arc::new(DryRunSink::accepting(vec![target_folder]))
    } else {
        let mail_root = config
            .mail_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("mail"));
        Arc::new(FsMessageSink::new(mail_root))
    };

    let orchestrator = MergeOrchestrator::new(
        Arc::new(ConfigIdentityLookup::new(config.identities.clone())),
        Arc::new(DenyListPolicy::new(config.denied_senders.clone())),
        Arc::new(FsAttachmentStore::new()),
        Arc::new(TagStrippingConverter::new()),
        sink,
    )
    .with_limits(config.limits.clone())
    .with_user_agent(config.user_agent.clone());

    let report = orchestrator
        .run(&request, &rows)
        .await
        .map_err(|e| anyhow::anyhow!("Merge job failed: {}", e))?;

    if let Some(output_path) = output {
        let json_content = serde_json::to_string_pretty(&report)
            .map_err(|e| anyhow::anyhow!("Failed to serialize report to JSON: {}", e))?;

        std::fs::write(&output_path, json_content).map_err(|e| {
            anyhow::anyhow!("Failed to write report '{}': {}", output_path.display(), e)
        })?;

        info!("Report written to: {}", output_path.display());
    } else {
        println!(
            "Merge run {} completed with status: {} ({} attempted, {} succeeded, {} failed)",
            report.run_id,
            report.status,
            report.summary.rows_attempted,
            report.summary.rows_succeeded,
            report.summary.rows_failed
        );

        for warning in &report.warnings {
            println!("  Warning: {}", warning);
        }

        for outcome in report.failures() {
            println!(
                "  Row {} failed (to: {}): {}",
                outcome.row_index,
                outcome.recipients.join(", "),
                outcome.error.as_deref().unwrap_or("unknown")
            );
        }
    }

    // Return error if the whole job failed to ensure proper exit code
    match report.status {
        MergeStatus::Failed => Err(anyhow::anyhow!(
            "Merge job failed: all {} attempted rows failed",
            report.summary.rows_attempted
        )),
        _ => Ok(()),
    }
}

/// Validate a merge job file and, when given, its data file
pub async fn validate_job(
    job_path: PathBuf,
    data_path: Option<PathBuf>,
    delimiter: Option<String>,
    quote: Option<String>,
    config: &Config,
) -> Result<()> {
    info!("Validating merge job: {}", job_path.display());

    let request = load_request(&job_path)?;

    request
        .validate(&config.limits)
        .map_err(|e| anyhow::anyhow!("Job validation failed: {}", e))?;

    if !config.identities.contains_key(&request.from) {
        return Err(anyhow::anyhow!(
            "Job references unknown sender identity '{}'",
            request.from
        ));
    }

    println!("✓ Job '{}' is valid", job_path.display());
    println!("  Sender: {}", request.from);
    println!("  Recipient templates: {}", request.to.len());

    if let Some(data_path) = data_path {
        let rows = load_rows(&data_path, delimiter, quote, config)?;
        println!("  Data rows: {}", rows.len());
        println!("  Fields: {}", rows.header.join(", "));
        for warning in &rows.warnings {
            println!("  Warning: {}", warning);
        }
    }

    info!("Job validation completed successfully");

    Ok(())
}

fn load_request(path: &PathBuf) -> Result<MergeRequest> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read job file '{}': {}", path.display(), e))?;
    serde_yaml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse job file '{}': {}", path.display(), e))
}

fn load_rows(
    path: &PathBuf,
    delimiter: Option<String>,
    quote: Option<String>,
    config: &Config,
) -> Result<RowSet> {
    let delimiter =
        FieldDelimiter::from_config(delimiter.as_deref().unwrap_or(&config.defaults.delimiter));
    let quote = FieldQuote::from_config(quote.as_deref().unwrap_or(&config.defaults.quote));

    RowSet::from_path(path, delimiter, quote)
        .map_err(MergeError::from)
        .map_err(|e| anyhow::anyhow!("Failed to read data file '{}': {}", path.display(), e))
}
