//! Application orchestrator.
//! Merges settings file and CLI flags, initializes logging, picks the plan
//! (built-in, plan file or rollback of an audit log), validates paths and runs it.

use anyhow::Result;
use repo_migrate::audit::AuditRecord;
use repo_migrate::cli::Args;
use repo_migrate::config::{RunConfig, default_config_path, load_settings, validate_and_normalize};
use repo_migrate::fs_ops::HostRelocator;
use repo_migrate::output as out;
use repo_migrate::plan::Plan;
use repo_migrate::report::Reporter;
use repo_migrate::rollback::rollback_plan;
use repo_migrate::runner::run_plan;
use repo_migrate::MigrateError;
use tracing::{debug, error, warn};

use crate::logging::init_tracing;

fn print_config_location(args: &Args) {
    let path = args.config.clone().or_else(default_config_path);
    match path {
        Some(p) => {
            out::print_info(&format!("Settings file: {}", p.display()));
            if p.exists() {
                out::print_info("The file exists and will be read.");
            } else {
                out::print_info("No file exists there; built-in defaults apply.");
            }
        }
        None => out::print_warn("Could not determine a settings file location."),
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location(&args);
        return Ok(());
    }

    let mut cfg = RunConfig::default();
    if let Some(settings) = load_settings(args.config.as_deref())? {
        settings.apply_to(&mut cfg);
    }
    args.apply_overrides(&mut cfg);

    let _guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), cfg.json)?;
    debug!(?args, "Starting repo_migrate");

    let plan = match (&args.rollback, &args.plan) {
        (Some(log), _) => {
            let record = AuditRecord::load(log)?;
            match &args.base_dir {
                Some(b) if dunce::canonicalize(b).ok().as_ref() != Some(&record.base_dir) => {
                    warn!(
                        log_base = %record.base_dir.display(),
                        flag_base = %b.display(),
                        "--base-dir differs from the audit log; using --base-dir"
                    );
                }
                Some(_) => {}
                None => cfg.base_dir = record.base_dir.clone(),
            }
            rollback_plan(&record)?
        }
        (None, Some(plan_file)) => Plan::from_xml_path(plan_file)?,
        (None, None) => Plan::builtin(),
    };

    let cfg = {
        let mut cfg = cfg;
        validate_and_normalize(&mut cfg)?;
        cfg
    };

    let mut reporter = Reporter::stdout(cfg.dry_run);
    match run_plan(&plan, &cfg, &HostRelocator, &mut reporter) {
        Ok(outcome) => {
            if outcome.summary.has_errors() {
                out::print_warn(&format!(
                    "{} of {} entries failed; see the lines marked ERROR above.",
                    outcome.summary.errored, outcome.summary.total
                ));
            } else if !cfg.dry_run {
                out::print_success(&format!("{} entries moved.", outcome.summary.moved));
            }
            Ok(())
        }
        Err(e) => {
            log_fatal(&e);
            Err(e.into())
        }
    }
}

fn log_fatal(e: &MigrateError) {
    let code = e.code();
    match e {
        MigrateError::BackupFailed { base, reason } => {
            error!(code, kind = "backup_failed", base = %base.display(), %reason, "Run aborted before any move")
        }
        MigrateError::InsufficientSpace { required, available, dest } => {
            error!(code, kind = "insufficient_space", required = *required, available = *available, dest = %dest.display(), "Run aborted before any move")
        }
        MigrateError::AuditLog { path, reason } => {
            error!(code, kind = "audit_log", path = %path.display(), %reason, "Audit log failed")
        }
        _ => error!(code, pre_run = e.is_pre_run(), error = %e, "Run aborted"),
    }
}
