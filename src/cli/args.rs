// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for mailmill

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mailmill")]
#[command(about = "A mail merge engine producing one message per row of a delimited data file")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a merge job: one message per data row
    Run {
        #[arg(help = "Path to merge job YAML file")]
        job: PathBuf,

        #[arg(help = "Path to delimited data file")]
        data: PathBuf,

        #[arg(long, help = "Field delimiter (comma, semicolon, pipe, tab)")]
        delimiter: Option<String>,

        #[arg(long, help = "Field enclosure (double, single)")]
        quote: Option<String>,

        #[arg(long, help = "Override the job's target folder")]
        folder: Option<String>,

        #[arg(long, help = "Resolve rows and log messages without saving them")]
        dry_run: bool,

        #[arg(short, long, help = "Write the merge report as JSON to this file")]
        output: Option<PathBuf>,
    },

    /// Validate a merge job file (and optionally its data file) without producing messages
    Validate {
        #[arg(help = "Path to merge job YAML file")]
        job: PathBuf,

        #[arg(help = "Path to delimited data file")]
        data: Option<PathBuf>,

        #[arg(long, help = "Field delimiter (comma, semicolon, pipe, tab)")]
        delimiter: Option<String>,

        #[arg(long, help = "Field enclosure (double, single)")]
        quote: Option<String>,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
