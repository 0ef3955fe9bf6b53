//! Typed error definitions for repo_migrate.
//! Run-fatal failure modes live here; per-entry move failures are recorded as
//! `MigrationStatus::Error` instead and never reach this type.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Base directory invalid or not a directory: {0}")]
    BaseInvalid(PathBuf),

    #[error("Invalid plan entry '{entry}': {reason}")]
    InvalidPlan { entry: String, reason: String },

    #[error("Backup of {base} failed: {reason}")]
    BackupFailed { base: PathBuf, reason: String },

    #[error("Insufficient disk space for backup in {dest}: need {required} bytes, have {available} bytes")]
    InsufficientSpace {
        required: u64,
        available: u64,
        dest: PathBuf,
    },

    #[error("Audit log {path}: {reason}")]
    AuditLog { path: PathBuf, reason: String },
}

impl MigrateError {
    /// Stable short code for structured log fields.
    pub fn code(&self) -> &'static str {
        match self {
            MigrateError::Configuration(_) => "E_CONFIG",
            MigrateError::BaseInvalid(_) => "E_BASE",
            MigrateError::InvalidPlan { .. } => "E_PLAN",
            MigrateError::BackupFailed { .. } => "E_BACKUP",
            MigrateError::InsufficientSpace { .. } => "E_SPACE",
            MigrateError::AuditLog { .. } => "E_AUDIT",
        }
    }

    /// True for the failures that abort a run before any entry is evaluated.
    pub fn is_pre_run(&self) -> bool {
        !matches!(self, MigrateError::AuditLog { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let errs = [
            MigrateError::Configuration("x".into()),
            MigrateError::BaseInvalid(PathBuf::from("/x")),
            MigrateError::InvalidPlan { entry: "a".into(), reason: "b".into() },
            MigrateError::BackupFailed { base: PathBuf::from("/x"), reason: "r".into() },
            MigrateError::InsufficientSpace { required: 1, available: 0, dest: PathBuf::from("/y") },
            MigrateError::AuditLog { path: PathBuf::from("/z"), reason: "r".into() },
        ];
        let mut codes: Vec<_> = errs.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }

    #[test]
    fn backup_failure_message_names_base() {
        let e = MigrateError::BackupFailed {
            base: PathBuf::from("/srv/repo"),
            reason: "copy failed".into(),
        };
        assert!(e.to_string().contains("/srv/repo"));
        assert!(e.is_pre_run());
    }
}
