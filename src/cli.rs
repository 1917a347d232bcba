use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::platform::Platform;

/// gum - bootstrap a developer workstation from gum.yml
#[derive(Debug, Parser)]
#[command(name = "gum")]
#[command(about = "Installs the toolchains and packages a project declares in gum.yml")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: show what would be executed without making changes.
    ///
    /// Read-only checks (is it installed? does the file exist?) still run so
    /// the skip decisions are realistic. Installing commands are logged only.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log verbosity; RUST_LOG overrides it when set
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate gum.yml and bring the workstation up to date
    Up {
        /// Project directory containing gum.yml
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Validate gum.yml and every planned action without running anything
    Validate {
        /// Project directory containing gum.yml
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Print the execution plan
    Plan {
        /// Project directory containing gum.yml
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// Plan for this platform instead of the host (darwin, macos, linux)
        #[arg(short, long)]
        platform: Option<Platform>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the named actions gum.yml may reference
    Actions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Directive for `tracing_subscriber::EnvFilter`
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}
