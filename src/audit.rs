//! Persisted audit record of a run (JSON).
//!
//! Written for dry runs and live runs alike so the two can be diffed. The field
//! names and status strings are a stable interface for external tooling and for
//! `--rollback`.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::RunConfig;
use crate::engine::{MigrationResult, MigrationStatus};
use crate::errors::MigrateError;
use crate::fs_ops::unique_sibling;
use crate::report::RunSummary;

pub const TOOL_NAME: &str = "repo_migrate";
pub const LOG_PREFIX: &str = "migration-log-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub purpose: String,
    pub status: MigrationStatus,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub tool: String,
    pub dry_run: bool,
    pub base_dir: PathBuf,
    /// RFC 3339
    pub started_at: String,
    /// RFC 3339
    pub completed_at: String,
    pub backup_path: Option<PathBuf>,
    pub moved: usize,
    pub skipped: usize,
    pub errored: usize,
    pub previewed: usize,
    pub total: usize,
    pub entries: Vec<AuditEntry>,
}

/// File name for a log completed at `at`.
pub fn audit_file_name(at: &DateTime<Local>) -> String {
    format!("{LOG_PREFIX}{}.json", at.format("%Y%m%d-%H%M%S"))
}

impl AuditRecord {
    pub fn new(
        config: &RunConfig,
        summary: &RunSummary,
        results: &[MigrationResult],
        started_at: &DateTime<Local>,
        completed_at: &DateTime<Local>,
    ) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            dry_run: config.dry_run,
            base_dir: config.base_dir.clone(),
            started_at: started_at.to_rfc3339(),
            completed_at: completed_at.to_rfc3339(),
            backup_path: summary.backup_path.clone(),
            moved: summary.moved,
            skipped: summary.skipped,
            errored: summary.errored,
            previewed: summary.previewed,
            total: summary.total,
            entries: results
                .iter()
                .map(|r| AuditEntry {
                    source: r.entry.source.clone(),
                    destination: r.entry.destination.clone(),
                    purpose: r.entry.purpose.clone(),
                    status: r.status,
                    detail: r.detail.clone(),
                })
                .collect(),
        }
    }

    /// Write into `dir` under a fresh timestamped name; returns the path written.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, MigrateError> {
        let completed = DateTime::parse_from_rfc3339(&self.completed_at)
            .map(|t| t.with_timezone(&Local))
            .unwrap_or_else(|_| Local::now());
        let path = unique_sibling(&dir.join(audit_file_name(&completed)));
        let fail = |reason: String| MigrateError::AuditLog {
            path: path.clone(),
            reason,
        };

        fs::create_dir_all(dir).map_err(|e| fail(format!("create directory: {e}")))?;
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| fail(format!("create: {e}")))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut w, self).map_err(|e| fail(format!("serialize: {e}")))?;
        w.write_all(b"\n").map_err(|e| fail(format!("write: {e}")))?;
        let file = w.into_inner().map_err(|e| fail(format!("flush: {e}")))?;
        file.sync_all().map_err(|e| fail(format!("fsync: {e}")))?;

        info!(path = %path.display(), entries = self.entries.len(), "Audit log written");
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, MigrateError> {
        let fail = |reason: String| MigrateError::AuditLog {
            path: path.to_path_buf(),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|e| fail(format!("read: {e}")))?;
        let record: AuditRecord = serde_json::from_str(&text).map_err(|e| fail(format!("parse: {e}")))?;
        if record.tool != TOOL_NAME {
            return Err(fail(format!("written by '{}', not {TOOL_NAME}", record.tool)));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::MigrationEntry;
    use tempfile::tempdir;

    fn sample() -> (RunConfig, Vec<MigrationResult>) {
        let cfg = RunConfig::new("/srv/repo");
        let results = vec![
            MigrationResult {
                entry: MigrationEntry::new("README.md", "docs/00-CURRENT/README.md", "docs").unwrap(),
                status: MigrationStatus::Preview,
                detail: None,
            },
            MigrationResult {
                entry: MigrationEntry::new("missing.md", "x/missing.md", "").unwrap(),
                status: MigrationStatus::SkippedNotFound,
                detail: None,
            },
        ];
        (cfg, results)
    }

    #[test]
    fn json_shape_is_stable() {
        let (cfg, results) = sample();
        let summary = RunSummary::from_results(&results, None);
        let now = Local::now();
        let rec = AuditRecord::new(&cfg, &summary, &results, &now, &now);
        let v: serde_json::Value = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["tool"], "repo_migrate");
        assert_eq!(v["dry_run"], true);
        assert_eq!(v["skipped"], 1);
        assert_eq!(v["moved"], 0);
        assert_eq!(v["entries"][0]["source"], "README.md");
        assert_eq!(v["entries"][0]["destination"], "docs/00-CURRENT/README.md");
        assert_eq!(v["entries"][0]["purpose"], "docs");
        assert_eq!(v["entries"][0]["status"], "preview");
        assert_eq!(v["entries"][1]["status"], "skipped_not_found");
        assert!(v["backup_path"].is_null());
        assert!(v["completed_at"].is_string());
    }

    #[test]
    fn write_then_load() {
        let td = tempdir().unwrap();
        let (cfg, results) = sample();
        let summary = RunSummary::from_results(&results, None);
        let now = Local::now();
        let rec = AuditRecord::new(&cfg, &summary, &results, &now, &now);
        let p1 = rec.write(td.path()).unwrap();
        let p2 = rec.write(td.path()).unwrap();
        assert_ne!(p1, p2, "second log in the same second gets a fresh name");
        assert!(p1.file_name().unwrap().to_string_lossy().starts_with(LOG_PREFIX));
        assert_eq!(AuditRecord::load(&p1).unwrap(), rec);
    }

    #[test]
    fn load_rejects_foreign_json() {
        let td = tempdir().unwrap();
        let p = td.path().join("other.json");
        fs::write(&p, "{\"hello\": 1}").unwrap();
        assert!(matches!(AuditRecord::load(&p), Err(MigrateError::AuditLog { .. })));
    }
}
