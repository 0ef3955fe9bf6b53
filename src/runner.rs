//! One complete run: backup (when required), engine, audit log, report.
//!
//! The snapshot is taken before the first entry is evaluated, and a failed
//! snapshot returns before the engine is ever called.

use chrono::Local;
use std::io::Write;
use tracing::{error, info};

use crate::audit::AuditRecord;
use crate::backup::create_backup;
use crate::config::RunConfig;
use crate::engine::{self, MigrationResult};
use crate::errors::MigrateError;
use crate::fs_ops::Relocator;
use crate::plan::Plan;
use crate::report::{Reporter, RunSummary};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub results: Vec<MigrationResult>,
    pub summary: RunSummary,
}

pub fn run_plan<R, W>(
    plan: &Plan,
    config: &RunConfig,
    relocator: &R,
    reporter: &mut Reporter<W>,
) -> Result<RunOutcome, MigrateError>
where
    R: Relocator + ?Sized,
    W: Write,
{
    let started_at = Local::now();

    let backup = if config.wants_backup() {
        Some(create_backup(&config.base_dir, &config.backup_root()?)?)
    } else {
        info!(dry_run = config.dry_run, skip_backup = config.skip_backup, "No backup for this run");
        None
    };

    reporter.header(&config.base_dir, plan.len(), backup.as_ref().map(|b| b.path.as_path()));
    let results = engine::execute(plan, config, relocator, |r| reporter.entry(r));

    let mut summary = RunSummary::from_results(&results, backup.map(|b| b.path));
    info!(
        total = summary.total,
        moved = summary.moved,
        skipped = summary.skipped,
        errored = summary.errored,
        previewed = summary.previewed,
        "Plan processed"
    );

    let record = AuditRecord::new(config, &summary, &results, &started_at, &Local::now());
    let written = config.audit_root().and_then(|dir| record.write(&dir));
    match written {
        Ok(path) => summary.log_path = Some(path),
        Err(e) => {
            // The moves already happened; show what they were before failing.
            error!(code = e.code(), error = %e, "Audit log not written");
            reporter.summary(&summary);
            reporter.rollback_guidance(&summary);
            return Err(e);
        }
    }

    reporter.summary(&summary);
    reporter.rollback_guidance(&summary);
    Ok(RunOutcome { results, summary })
}
