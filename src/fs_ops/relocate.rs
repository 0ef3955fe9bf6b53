//! The mutation seam of the engine: move one path to a free destination.

use anyhow::{Result, anyhow};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::atomic::try_atomic_move;
use super::copy::copy_into_place;
use super::helpers::describe_io_error;
use super::util::is_cross_device;

/// Performs the actual relocation of a source path to a destination that is
/// known not to exist and whose parent directory already exists.
///
/// The engine only talks to this trait, so tests can substitute a relocator
/// that fails on demand.
pub trait Relocator {
    fn relocate(&self, src: &Path, dst: &Path) -> Result<()>;
}

/// Host filesystem relocator: atomic rename, with copy+remove only when the
/// rename crosses a device boundary.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostRelocator;

impl Relocator for HostRelocator {
    fn relocate(&self, src: &Path, dst: &Path) -> Result<()> {
        match try_atomic_move(src, dst) {
            Ok(()) => {
                info!(src = %src.display(), dest = %dst.display(), "Renamed atomically");
                Ok(())
            }
            Err(e) if is_cross_device(&e) => {
                warn!(
                    src = %src.display(),
                    dest = %dst.display(),
                    "Rename crosses devices; copying then removing source"
                );
                let stats = copy_into_place(src, dst)?;
                remove_source_after_copy(src, dst)?;
                info!(
                    src = %src.display(),
                    dest = %dst.display(),
                    files = stats.files,
                    bytes = stats.bytes,
                    "Copied across devices and removed source"
                );
                Ok(())
            }
            Err(e) => Err(anyhow!(describe_io_error("rename", src, &e))),
        }
    }
}

/// Second half of a cross-device move. The destination is complete at this
/// point and is kept even if removal fails: a partly removed source directory
/// may leave the destination as the only full copy.
fn remove_source_after_copy(src: &Path, dst: &Path) -> Result<()> {
    let removed = fs::symlink_metadata(src).and_then(|meta| {
        if meta.is_dir() {
            fs::remove_dir_all(src)
        } else {
            fs::remove_file(src)
        }
    });
    removed.map_err(|e| {
        warn!(src = %src.display(), dest = %dst.display(), error = %e, "Source left behind after copy");
        anyhow!(
            "copied to '{}' but the source could not be removed, so both copies exist; {}",
            dst.display(),
            describe_io_error("remove source", src, &e)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn host_relocator_moves_file() {
        let td = tempdir().unwrap();
        let src = td.path().join("a.txt");
        let dst = td.path().join("b.txt");
        fs::write(&src, "hello").unwrap();
        HostRelocator.relocate(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "hello");
    }

    #[test]
    fn host_relocator_moves_directory_as_one_entity() {
        let td = tempdir().unwrap();
        let src = td.path().join("docs-old");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub/x.md"), "x").unwrap();
        let dst = td.path().join("archive");
        HostRelocator.relocate(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(dst.join("sub/x.md")).unwrap(), "x");
    }

    #[test]
    fn failed_source_removal_says_both_copies_exist() {
        let td = tempdir().unwrap();
        let dst = td.path().join("copied.md");
        fs::write(&dst, "complete copy").unwrap();
        let err = remove_source_after_copy(&td.path().join("vanished.md"), &dst)
            .unwrap_err()
            .to_string();
        assert!(err.contains("both copies exist"), "{err}");
        assert!(err.contains("copied.md"));
        assert!(err.contains("remove source"));
        assert_eq!(fs::read_to_string(&dst).unwrap(), "complete copy");
    }

    #[test]
    fn source_removal_handles_files_and_trees() {
        let td = tempdir().unwrap();
        let file = td.path().join("f.md");
        fs::write(&file, "f").unwrap();
        remove_source_after_copy(&file, &td.path().join("elsewhere")).unwrap();
        assert!(!file.exists());

        let tree = td.path().join("tree");
        fs::create_dir_all(tree.join("deep")).unwrap();
        fs::write(tree.join("deep/x"), "x").unwrap();
        remove_source_after_copy(&tree, &td.path().join("elsewhere")).unwrap();
        assert!(!tree.exists());
    }

    #[test]
    fn missing_source_reports_rename_with_path() {
        let td = tempdir().unwrap();
        let src = td.path().join("nope");
        let err = HostRelocator
            .relocate(&src, &td.path().join("dst"))
            .unwrap_err()
            .to_string();
        assert!(err.starts_with("rename '"));
        assert!(err.contains("nope"));
    }
}
