//! Reverse a live run from its audit log.
//!
//! Every `success` entry becomes a plan entry going the other way, in reverse
//! order. The resulting plan runs through the normal engine, so the usual
//! not-found / destination-exists / error classification applies.

use tracing::info;

use crate::audit::AuditRecord;
use crate::engine::MigrationStatus;
use crate::errors::MigrateError;
use crate::plan::{MigrationEntry, Plan};

pub fn rollback_plan(record: &AuditRecord) -> Result<Plan, MigrateError> {
    if record.dry_run {
        return Err(MigrateError::Configuration(
            "audit log records a dry run; nothing was moved, nothing to roll back".into(),
        ));
    }
    let entries = record
        .entries
        .iter()
        .rev()
        .filter(|e| e.status == MigrationStatus::Success)
        .map(|e| {
            let purpose = if e.purpose.is_empty() {
                "rollback".to_string()
            } else {
                format!("rollback: {}", e.purpose)
            };
            MigrationEntry::new(&e.destination, &e.source, purpose)
        })
        .collect::<Result<Vec<_>, _>>()?;
    info!(
        base = %record.base_dir.display(),
        entries = entries.len(),
        "Built rollback plan"
    );
    Plan::new(entries)
}
