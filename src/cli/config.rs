// ABOUTME: Configuration management for the mailmill application
// ABOUTME: Handles loading and merging configuration from files and environment variables

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::mail::SenderIdentity;
use crate::merge::MergeLimits;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the message store; folders are subdirectories.
    #[serde(default)]
    pub mail_root: Option<PathBuf>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub defaults: MergeDefaults,

    /// Sending identities keyed by id, referenced from job files.
    #[serde(default)]
    pub identities: HashMap<String, SenderIdentity>,

    /// Sender addresses that may not run merge jobs.
    #[serde(default)]
    pub denied_senders: Vec<String>,

    #[serde(default)]
    pub limits: MergeLimits,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeDefaults {
    pub delimiter: String,
    pub quote: String,
    pub folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_user_agent() -> String {
    format!("mailmill/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mail_root: None,
            user_agent: default_user_agent(),
            defaults: MergeDefaults::default(),
            identities: HashMap::new(),
            denied_senders: Vec::new(),
            limits: MergeLimits::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for MergeDefaults {
    fn default() -> Self {
        Self {
            delimiter: "comma".to_string(),
            quote: "double".to_string(),
            folder: "Drafts".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = serde_yaml::from_str(&contents)?;

            config.merge_env()?;

            Ok(config)
        } else {
            let mut config = Config::default();
            config.merge_env()?;
            Ok(config)
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Result<PathBuf> {
        let possible_paths = vec![
            PathBuf::from("mailmill.yaml"),
            PathBuf::from("mailmill.yml"),
            PathBuf::from(".mailmill.yaml"),
            PathBuf::from(".mailmill.yml"),
        ];

        // Check home directory
        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".mailmill").join("config.yaml");
            if home_config.exists() {
                return Ok(home_config);
            }
        }

        // Check current directory
        for path in possible_paths {
            if path.exists() {
                return Ok(path);
            }
        }

        // Return default path (may not exist)
        Ok(PathBuf::from("mailmill.yaml"))
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(mail_root) = std::env::var("MAILMILL_MAIL_ROOT") {
            self.mail_root = Some(PathBuf::from(mail_root));
        }
        if let Ok(user_agent) = std::env::var("MAILMILL_USER_AGENT") {
            self.user_agent = user_agent;
        }
        if let Ok(max_rows) = std::env::var("MAILMILL_MAX_ROWS") {
            self.limits.max_rows = Some(max_rows.parse()?);
        }

        // Logging configuration
        if let Ok(level) = std::env::var("MAILMILL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MAILMILL_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }
}
