//! Migration engine.
//!
//! Evaluates each plan entry against the live filesystem, in plan order:
//! 1) destination must be free (an occupied destination wins even when the
//!    source is gone, so an already-migrated entry reads as `SkippedDestinationExists`),
//! 2) source must exist (file, directory or symlink; one path entity),
//! 3) dry run => `Preview`; live => create the destination parent and relocate.
//!
//! Dry and live runs share steps 1-2, so a preview classifies every entry the way
//! the live run will, barring failures only a real move can reveal. A failed
//! entry is recorded and the loop moves on; nothing here aborts the run.

mod result;

pub use result::{MigrationResult, MigrationStatus};

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, info_span, warn};

use crate::config::RunConfig;
use crate::fs_ops::{Relocator, describe_io_error};
use crate::plan::{MigrationEntry, Plan};

/// Run the plan. `on_result` sees each result as soon as it exists (progress
/// reporting); the full ordered sequence is returned as well.
pub fn execute<R, F>(plan: &Plan, config: &RunConfig, relocator: &R, mut on_result: F) -> Vec<MigrationResult>
where
    R: Relocator + ?Sized,
    F: FnMut(&MigrationResult),
{
    let mut results = Vec::with_capacity(plan.len());
    for (idx, entry) in plan.entries().iter().enumerate() {
        let span = info_span!("entry", idx, source = %entry.source.display());
        let _enter = span.enter();
        let result = evaluate_entry(entry, &config.base_dir, config.dry_run, relocator);
        on_result(&result);
        results.push(result);
    }
    results
}

/// Classify (and in live mode, perform) a single entry.
pub fn evaluate_entry<R>(entry: &MigrationEntry, base: &Path, dry_run: bool, relocator: &R) -> MigrationResult
where
    R: Relocator + ?Sized,
{
    let src = entry.source_in(base);
    let dst = entry.destination_in(base);

    match fs::symlink_metadata(&dst) {
        Ok(_) => {
            info!(dest = %dst.display(), "Destination exists; skipping");
            return MigrationResult::new(entry, MigrationStatus::SkippedDestinationExists);
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            warn!(dest = %dst.display(), error = %e, "Cannot stat destination");
            return MigrationResult::failed(entry, describe_io_error("stat destination", &dst, &e));
        }
    }

    match fs::symlink_metadata(&src) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(src = %src.display(), "Source not found");
            return MigrationResult::new(entry, MigrationStatus::SkippedNotFound);
        }
        Err(e) => {
            warn!(src = %src.display(), error = %e, "Cannot stat source");
            return MigrationResult::failed(entry, describe_io_error("stat source", &src, &e));
        }
    }

    if dry_run {
        debug!(src = %src.display(), dest = %dst.display(), "dry-run: would move");
        return MigrationResult::new(entry, MigrationStatus::Preview);
    }

    if let Some(parent) = dst.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!(dir = %parent.display(), error = %e, "Cannot create destination directory");
        return MigrationResult::failed(entry, describe_io_error("create destination directory", parent, &e));
    }

    match relocator.relocate(&src, &dst) {
        Ok(()) => {
            info!(src = %src.display(), dest = %dst.display(), "Moved");
            MigrationResult::new(entry, MigrationStatus::Success)
        }
        Err(e) => {
            warn!(src = %src.display(), dest = %dst.display(), error = %e, "Move failed");
            MigrationResult::failed(entry, format!("{e:#}"))
        }
    }
}
