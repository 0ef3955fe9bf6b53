//! Backup manager: one full snapshot of the base directory before any move.
//!
//! The snapshot lands in `<backup_root>/repo-backup-<YYYYmmdd-HHMMSS>` and is never
//! removed by this tool. Any failure is returned as `MigrateError::BackupFailed`
//! (or `InsufficientSpace`), which the caller treats as fatal.

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::errors::MigrateError;
use crate::fs_ops::{CopyStats, copy_tree, ensure_space_for_copy, format_bytes, tree_size, unique_sibling};

pub const BACKUP_PREFIX: &str = "repo-backup-";

/// A completed snapshot.
#[derive(Debug, Clone)]
pub struct BackupSnapshot {
    pub path: PathBuf,
    pub created_at: DateTime<Local>,
    pub stats: CopyStats,
}

/// Directory name for a snapshot taken at `at`.
pub fn backup_dir_name(at: &DateTime<Local>) -> String {
    format!("{BACKUP_PREFIX}{}", at.format("%Y%m%d-%H%M%S"))
}

/// Copy `base_dir` recursively into a fresh timestamped directory under `backup_root`.
pub fn create_backup(base_dir: &Path, backup_root: &Path) -> Result<BackupSnapshot, MigrateError> {
    let failed = |reason: String| {
        error!(base = %base_dir.display(), %reason, "Backup failed");
        MigrateError::BackupFailed {
            base: base_dir.to_path_buf(),
            reason,
        }
    };

    fs::create_dir_all(backup_root).map_err(|e| {
        failed(crate::fs_ops::describe_io_error(
            "create backup root",
            backup_root,
            &e,
        ))
    })?;

    let required = tree_size(base_dir).map_err(|e| failed(format!("measure base directory: {e}")))?;
    ensure_space_for_copy(backup_root, required)?;

    let created_at = Local::now();
    let dest = unique_sibling(&backup_root.join(backup_dir_name(&created_at)));
    info!(
        base = %base_dir.display(),
        dest = %dest.display(),
        size = %format_bytes(required),
        "Creating backup"
    );

    let stats = copy_tree(base_dir, &dest).map_err(|e| failed(format!("{e:#}")))?;
    info!(
        dest = %dest.display(),
        files = stats.files,
        dirs = stats.dirs,
        bytes = stats.bytes,
        "Backup complete"
    );
    Ok(BackupSnapshot {
        path: dest,
        created_at,
        stats,
    })
}
