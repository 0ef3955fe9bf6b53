use repo_migrate::fs_ops::HostRelocator;
use repo_migrate::report::Reporter;
use repo_migrate::{MigrationStatus, Plan, RunConfig, run_plan};
use std::fs;
use tempfile::tempdir;

#[test]
fn second_live_run_moves_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    let repo = td.path().join("repo");
    fs::create_dir_all(repo.join("docs-old/api"))?;
    for f in ["README.md", "CHANGELOG.md", "TODO.md"] {
        fs::write(repo.join(f), f)?;
    }
    fs::write(repo.join("docs-old/api/v1.md"), "v1")?;

    let plan = Plan::builtin();
    let cfg = RunConfig {
        dry_run: false,
        skip_backup: true,
        ..RunConfig::new(&repo)
    };

    let first = run_plan(&plan, &cfg, &HostRelocator, &mut Reporter::silent(false))?;
    assert_eq!(first.summary.moved, 4);
    assert_eq!(first.summary.errored, 0);

    let second = run_plan(&plan, &cfg, &HostRelocator, &mut Reporter::silent(false))?;
    assert_eq!(second.summary.moved, 0);
    for (a, b) in first.results.iter().zip(&second.results) {
        if a.status == MigrationStatus::Success {
            assert_eq!(b.status, MigrationStatus::SkippedDestinationExists);
        } else {
            assert_eq!(b.status, a.status);
        }
    }
    assert_eq!(fs::read_to_string(repo.join("docs/99-ARCHIVE/docs-old/api/v1.md"))?, "v1");
    Ok(())
}
