//! Config validation.
//! Canonicalizes the base directory and checks that the snapshot and audit
//! locations sit outside it (a snapshot of the base must not contain itself).

use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use super::types::RunConfig;
use crate::errors::MigrateError;

/// Absolute form of `p`: canonical when it exists, otherwise joined onto the cwd.
fn absolutize(p: &Path) -> PathBuf {
    if let Ok(c) = dunce::canonicalize(p) {
        return c;
    }
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(p))
            .unwrap_or_else(|_| p.to_path_buf())
    }
}

impl RunConfig {
    /// Directory that receives snapshots.
    pub fn backup_root(&self) -> Result<PathBuf, MigrateError> {
        self.side_dir(self.backup_dir.as_deref(), "backup_dir")
    }

    /// Directory that receives audit logs.
    pub fn audit_root(&self) -> Result<PathBuf, MigrateError> {
        self.side_dir(self.audit_dir.as_deref(), "audit_dir")
    }

    fn side_dir(&self, explicit: Option<&Path>, name: &str) -> Result<PathBuf, MigrateError> {
        match explicit {
            Some(p) => Ok(absolutize(p)),
            None => self.base_dir.parent().map(Path::to_path_buf).ok_or_else(|| {
                MigrateError::Configuration(format!(
                    "base directory '{}' has no parent; set {name} explicitly",
                    self.base_dir.display()
                ))
            }),
        }
    }
}

/// Resolve `cfg.base_dir` to a canonical directory and check side locations.
pub fn validate_and_normalize(cfg: &mut RunConfig) -> Result<(), MigrateError> {
    let base = cfg.base_dir.clone();
    if !base.is_dir() {
        error!(base = %base.display(), "Base directory missing or not a directory");
        return Err(MigrateError::BaseInvalid(base));
    }
    cfg.base_dir = dunce::canonicalize(&base).map_err(|_| MigrateError::BaseInvalid(base.clone()))?;
    debug!(base = %cfg.base_dir.display(), "Base directory canonicalized");

    for (name, dir) in [("audit_dir", cfg.audit_root()?), ("backup_dir", cfg.backup_root()?)] {
        if dir.starts_with(&cfg.base_dir) {
            error!(%name, dir = %dir.display(), "Side directory inside base");
            return Err(MigrateError::Configuration(format!(
                "{name} '{}' must not be inside the base directory '{}'",
                dir.display(),
                cfg.base_dir.display()
            )));
        }
    }

    info!(
        base = %cfg.base_dir.display(),
        dry_run = cfg.dry_run,
        skip_backup = cfg.skip_backup,
        "Config validated"
    );
    Ok(())
}
