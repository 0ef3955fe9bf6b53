//! Core configuration types.
//! - RunConfig is resolved once at start and never mutated during a run.
//! - LogLevel represents console/file verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default; progress lines are printed separately)
    #[default]
    Normal,
    /// Per-operation detail
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common names (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Immutable settings for one migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Root that every plan path is resolved against (absolute after validation)
    pub base_dir: PathBuf,
    /// Evaluate and report only; never touch the filesystem
    pub dry_run: bool,
    /// Live mode without a snapshot (explicit operator opt-out)
    pub skip_backup: bool,
    /// Where snapshots go; `None` = parent of `base_dir`
    pub backup_dir: Option<PathBuf>,
    /// Where audit logs go; `None` = parent of `base_dir`
    pub audit_dir: Option<PathBuf>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional tracing log file (separate from the audit log)
    pub log_file: Option<PathBuf>,
    /// Emit tracing output as JSON
    pub json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            dry_run: true,
            skip_backup: false,
            backup_dir: None,
            audit_dir: None,
            log_level: LogLevel::Normal,
            log_file: None,
            json: false,
        }
    }
}

impl RunConfig {
    /// Config rooted at `base_dir`; every other field takes its safe default.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    /// Whether a snapshot must be taken before the first entry is evaluated.
    pub fn wants_backup(&self) -> bool {
        !self.dry_run && !self.skip_backup
    }
}
