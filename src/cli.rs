//! CLI definition and parsing.
//!
//! Notes:
//! - Without `--execute` every run is a dry run.
//! - CLI flags override values from the XML settings file.
//! - Any parse failure exits with status 1 before the filesystem is touched;
//!   `--help` / `--version` exit 0.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{LogLevel, RunConfig};

/// Plan and safely execute batch file relocations inside a repository.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "Reorganize repository files safely: dry-run by default, backup before moving, JSON audit log")]
pub struct Args {
    /// Actually move files (default is a dry run that changes nothing).
    #[arg(long)]
    pub execute: bool,

    /// Directory all plan paths are relative to (default: current directory).
    #[arg(long, value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub base_dir: Option<PathBuf>,

    /// Do not snapshot the base directory before a live run.
    #[arg(long)]
    pub skip_backup: bool,

    /// Read the plan from an XML file instead of the built-in plan.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub plan: Option<PathBuf>,

    /// Where to put the snapshot (default: parent of the base directory).
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub backup_dir: Option<PathBuf>,

    /// Where to write the JSON audit log (default: parent of the base directory).
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub audit_dir: Option<PathBuf>,

    /// Reverse the moves recorded in an audit log from a previous live run.
    #[arg(long, value_name = "AUDIT_LOG", value_hint = ValueHint::FilePath, conflicts_with = "plan")]
    pub rollback: Option<PathBuf>,

    /// Settings file (overrides REPO_MIGRATE_CONFIG and the default location).
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (shorthand for --log-level debug).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Log level: quiet, normal, info, debug.
    #[arg(long, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Also write diagnostic logs to this file.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit diagnostic logs as JSON.
    #[arg(long)]
    pub json: bool,

    /// Print the settings file location and exit.
    #[arg(long)]
    pub print_config: bool,
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    s.parse()
}

impl Args {
    /// Precedence: --debug > --log-level > None (keep config value).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level
    }

    /// Apply CLI overrides to a config (in place). Unset flags change nothing.
    pub fn apply_overrides(&self, cfg: &mut RunConfig) {
        if self.execute {
            cfg.dry_run = false;
        }
        if let Some(b) = &self.base_dir {
            cfg.base_dir = b.clone();
        }
        if self.skip_backup {
            cfg.skip_backup = true;
        }
        if let Some(b) = &self.backup_dir {
            cfg.backup_dir = Some(b.clone());
        }
        if let Some(a) = &self.audit_dir {
            cfg.audit_dir = Some(a.clone());
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(f) = &self.log_file {
            cfg.log_file = Some(f.clone());
        }
        if self.json {
            cfg.json = true;
        }
    }
}

/// Parse process arguments; exit 1 on any usage error.
pub fn parse() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_dry_run() {
        let args = Args::try_parse_from(["repo_migrate"]).unwrap();
        let mut cfg = RunConfig::new("/repo");
        args.apply_overrides(&mut cfg);
        assert!(cfg.dry_run);
        assert!(!cfg.skip_backup);
    }

    #[test]
    fn unknown_flag_is_an_error() {
        let err = Args::try_parse_from(["repo_migrate", "--force"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn missing_value_is_an_error() {
        assert!(Args::try_parse_from(["repo_migrate", "--base-dir"]).is_err());
    }

    #[test]
    fn bad_log_level_is_an_error() {
        assert!(Args::try_parse_from(["repo_migrate", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn rollback_conflicts_with_plan() {
        assert!(
            Args::try_parse_from(["repo_migrate", "--rollback", "a.json", "--plan", "p.xml"]).is_err()
        );
    }
}
