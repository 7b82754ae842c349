// ABOUTME: Command line interface module for mailmill
// ABOUTME: Provides argument parsing, configuration, and command execution

pub mod app;
pub mod args;
pub mod commands;
pub mod config;

pub use app::App;
pub use args::{Args, Commands};
pub use config::Config;
