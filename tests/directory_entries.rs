use repo_migrate::fs_ops::HostRelocator;
use repo_migrate::report::Reporter;
use repo_migrate::{MigrationEntry, MigrationStatus, Plan, RunConfig, run_plan};
use std::fs;
use tempfile::tempdir;

#[test]
fn directory_moves_as_a_single_entry() {
    let td = tempdir().unwrap();
    let repo = td.path().join("repo");
    fs::create_dir_all(repo.join("legacy/deep/er")).unwrap();
    fs::write(repo.join("legacy/top.md"), "top").unwrap();
    fs::write(repo.join("legacy/deep/er/leaf.md"), "leaf").unwrap();

    let plan = Plan::new(vec![
        MigrationEntry::new("legacy/", "docs/99-ARCHIVE/legacy/", "archive").unwrap(),
    ])
    .unwrap();
    let cfg = RunConfig {
        dry_run: false,
        skip_backup: true,
        ..RunConfig::new(&repo)
    };
    let outcome = run_plan(&plan, &cfg, &HostRelocator, &mut Reporter::silent(false)).unwrap();

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].status, MigrationStatus::Success);
    assert!(!repo.join("legacy").exists());
    assert_eq!(
        fs::read_to_string(repo.join("docs/99-ARCHIVE/legacy/deep/er/leaf.md")).unwrap(),
        "leaf"
    );
    assert_eq!(fs::read_to_string(repo.join("docs/99-ARCHIVE/legacy/top.md")).unwrap(), "top");
}

#[test]
fn existing_destination_directory_is_not_merged() {
    let td = tempdir().unwrap();
    let repo = td.path().join("repo");
    fs::create_dir_all(repo.join("legacy")).unwrap();
    fs::write(repo.join("legacy/a.md"), "a").unwrap();
    fs::create_dir_all(repo.join("archive/legacy")).unwrap();
    fs::write(repo.join("archive/legacy/b.md"), "b").unwrap();

    let plan = Plan::new(vec![MigrationEntry::new("legacy", "archive/legacy", "").unwrap()]).unwrap();
    let cfg = RunConfig {
        dry_run: false,
        skip_backup: true,
        ..RunConfig::new(&repo)
    };
    let outcome = run_plan(&plan, &cfg, &HostRelocator, &mut Reporter::silent(false)).unwrap();

    assert_eq!(outcome.results[0].status, MigrationStatus::SkippedDestinationExists);
    assert!(repo.join("legacy/a.md").exists());
    assert!(!repo.join("archive/legacy/a.md").exists());
}
