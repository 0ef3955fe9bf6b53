//! Per-entry outcome types produced by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::plan::MigrationEntry;

/// Terminal classification of one plan entry.
///
/// An entry is only turned into a `MigrationResult` once its evaluation has
/// finished, so there is no `Pending` variant to leak into reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    /// Live mode: the source now lives at the destination.
    Success,
    /// Nothing at the source path; nothing to do.
    SkippedNotFound,
    /// Something already occupies the destination; left for the operator.
    SkippedDestinationExists,
    /// The relocation was attempted and the OS refused it.
    Error,
    /// Dry run: the entry would have been moved.
    Preview,
}

impl MigrationStatus {
    /// Short tag printed on progress lines.
    pub fn label(&self) -> &'static str {
        match self {
            MigrationStatus::Success => "MOVED",
            MigrationStatus::SkippedNotFound => "SKIP (not found)",
            MigrationStatus::SkippedDestinationExists => "SKIP (destination exists)",
            MigrationStatus::Error => "ERROR",
            MigrationStatus::Preview => "WOULD MOVE",
        }
    }
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MigrationStatus::Success => "success",
            MigrationStatus::SkippedNotFound => "skipped_not_found",
            MigrationStatus::SkippedDestinationExists => "skipped_destination_exists",
            MigrationStatus::Error => "error",
            MigrationStatus::Preview => "preview",
        };
        f.write_str(s)
    }
}

/// Outcome of evaluating one entry. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    pub entry: MigrationEntry,
    pub status: MigrationStatus,
    /// OS error text for `Error`, otherwise usually `None`.
    pub detail: Option<String>,
}

impl MigrationResult {
    pub(crate) fn new(entry: &MigrationEntry, status: MigrationStatus) -> Self {
        Self {
            entry: entry.clone(),
            status,
            detail: None,
        }
    }

    pub(crate) fn failed(entry: &MigrationEntry, detail: String) -> Self {
        Self {
            entry: entry.clone(),
            status: MigrationStatus::Error,
            detail: Some(detail),
        }
    }
}
