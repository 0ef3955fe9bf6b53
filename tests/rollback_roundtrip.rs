use repo_migrate::audit::AuditRecord;
use repo_migrate::fs_ops::HostRelocator;
use repo_migrate::report::Reporter;
use repo_migrate::rollback::rollback_plan;
use repo_migrate::{MigrationStatus, Plan, RunConfig, run_plan};
use std::fs;
use tempfile::tempdir;

#[test]
fn rollback_restores_original_layout() {
    let td = tempdir().unwrap();
    let repo = td.path().join("repo");
    fs::create_dir_all(repo.join("docs-old/img")).unwrap();
    fs::write(repo.join("README.md"), "readme").unwrap();
    fs::write(repo.join("API.md"), "api").unwrap();
    fs::write(repo.join("docs-old/img/logo.svg"), "<svg/>").unwrap();

    let cfg = RunConfig {
        dry_run: false,
        skip_backup: true,
        ..RunConfig::new(&repo)
    };
    let forward = run_plan(&Plan::builtin(), &cfg, &HostRelocator, &mut Reporter::silent(false)).unwrap();
    assert_eq!(forward.summary.moved, 3);
    assert!(!repo.join("README.md").exists());

    let log = forward.summary.log_path.clone().unwrap();
    let record = AuditRecord::load(&log).unwrap();
    assert!(!record.dry_run);
    assert_eq!(record.moved, 3);

    let plan = rollback_plan(&record).unwrap();
    assert_eq!(plan.len(), 3);
    let back = run_plan(&plan, &cfg, &HostRelocator, &mut Reporter::silent(false)).unwrap();
    assert!(back.results.iter().all(|r| r.status == MigrationStatus::Success));

    assert_eq!(fs::read_to_string(repo.join("README.md")).unwrap(), "readme");
    assert_eq!(fs::read_to_string(repo.join("API.md")).unwrap(), "api");
    assert_eq!(fs::read_to_string(repo.join("docs-old/img/logo.svg")).unwrap(), "<svg/>");
    assert!(!repo.join("docs/00-CURRENT/README.md").exists());
    assert!(!repo.join("docs/99-ARCHIVE/docs-old").exists());
}

#[test]
fn rolling_back_twice_skips_everything() {
    let td = tempdir().unwrap();
    let repo = td.path().join("repo");
    fs::create_dir_all(&repo).unwrap();
    fs::write(repo.join("NOTES.md"), "notes").unwrap();

    let cfg = RunConfig {
        dry_run: false,
        skip_backup: true,
        ..RunConfig::new(&repo)
    };
    let forward = run_plan(&Plan::builtin(), &cfg, &HostRelocator, &mut Reporter::silent(false)).unwrap();
    let record = AuditRecord::load(forward.summary.log_path.as_ref().unwrap()).unwrap();
    let plan = rollback_plan(&record).unwrap();

    run_plan(&plan, &cfg, &HostRelocator, &mut Reporter::silent(false)).unwrap();
    let again = run_plan(&plan, &cfg, &HostRelocator, &mut Reporter::silent(false)).unwrap();
    assert_eq!(again.summary.moved, 0);
    assert_eq!(again.results[0].status, MigrationStatus::SkippedDestinationExists);
    assert_eq!(fs::read_to_string(repo.join("NOTES.md")).unwrap(), "notes");
}
