//! Recursive copy used by snapshots and by the cross-device move fallback.
//!
//! - Directories are recreated, regular files copied byte-for-byte with their
//!   modification time carried over (filetime).
//! - Symlinks are recreated as symlinks on Unix, never followed.
//! - `copy_into_place` stages the copy under a hidden temp name next to the
//!   destination and renames it in, so a failed copy never leaves a half-written
//!   destination behind.

use anyhow::{Context, Result, anyhow};
use filetime::{FileTime, set_file_mtime};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::atomic::try_atomic_move;
use super::helpers::io_error_with_help;
use super::util;

/// Counters returned by `copy_tree`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub dirs: u64,
    pub files: u64,
    pub symlinks: u64,
    pub bytes: u64,
}

fn copy_mtime(src_meta: &fs::Metadata, dst: &Path) {
    let mtime = FileTime::from_last_modification_time(src_meta);
    if let Err(e) = set_file_mtime(dst, mtime) {
        debug!(path = %dst.display(), error = %e, "Could not preserve mtime");
    }
}

fn copy_file(src: &Path, dst: &Path, stats: &mut CopyStats) -> Result<()> {
    let meta = fs::metadata(src).map_err(io_error_with_help("stat", src))?;
    let n = fs::copy(src, dst).map_err(io_error_with_help("copy file", dst))?;
    copy_mtime(&meta, dst);
    stats.files += 1;
    stats.bytes += n;
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path, stats: &mut CopyStats) -> Result<()> {
    let target = fs::read_link(src).map_err(io_error_with_help("read symlink", src))?;
    std::os::unix::fs::symlink(&target, dst).map_err(io_error_with_help("create symlink", dst))?;
    stats.symlinks += 1;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, _dst: &Path, _stats: &mut CopyStats) -> Result<()> {
    warn!(path = %src.display(), "Symlink not copied on this platform");
    Ok(())
}

/// Copy the tree rooted at `src` to `dst`. `dst` must not exist yet.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<CopyStats> {
    let mut stats = CopyStats::default();
    let root_meta = fs::symlink_metadata(src).map_err(io_error_with_help("stat", src))?;
    if !root_meta.is_dir() {
        return Err(anyhow!("copy_tree source is not a directory: {}", src.display()));
    }
    fs::create_dir(dst).map_err(io_error_with_help("create directory", dst))?;
    stats.dirs += 1;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.with_context(|| format!("walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dst.join(rel);
        let ft = entry.file_type();
        if ft.is_dir() {
            fs::create_dir(&target).map_err(io_error_with_help("create directory", &target))?;
            stats.dirs += 1;
        } else if ft.is_symlink() {
            copy_symlink(entry.path(), &target, &mut stats)?;
        } else if ft.is_file() {
            copy_file(entry.path(), &target, &mut stats)?;
        } else {
            warn!(path = %entry.path().display(), "Skipping special file");
        }
    }

    // Directory mtimes last, after their contents stopped changing.
    for entry in WalkDir::new(src).follow_links(false).contents_first(true) {
        let entry = entry.with_context(|| format!("walk {}", src.display()))?;
        if entry.file_type().is_dir() {
            let rel = entry.path().strip_prefix(src)?;
            if let Ok(meta) = entry.metadata() {
                copy_mtime(&meta, &dst.join(rel));
            }
        }
    }
    Ok(stats)
}

/// Copy `src` (file, directory or symlink) to `dst` via a staged temp name.
pub fn copy_into_place(src: &Path, dst: &Path) -> Result<CopyStats> {
    let dst_dir = dst
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dst.display()))?;
    let tmp = util::unique_temp_path(dst_dir);
    let meta = fs::symlink_metadata(src).map_err(io_error_with_help("stat", src))?;

    let staged = (|| -> Result<CopyStats> {
        let mut stats = CopyStats::default();
        if meta.is_dir() {
            stats = copy_tree(src, &tmp)?;
        } else if meta.file_type().is_symlink() {
            copy_symlink(src, &tmp, &mut stats)?;
        } else {
            copy_file(src, &tmp, &mut stats)?;
        }
        Ok(stats)
    })();

    let cleanup = |tmp: &Path| {
        let _ = if meta.is_dir() {
            fs::remove_dir_all(tmp)
        } else {
            fs::remove_file(tmp)
        };
    };

    let stats = match staged {
        Ok(s) => s,
        Err(e) => {
            cleanup(&tmp);
            return Err(e);
        }
    };
    if let Err(e) = try_atomic_move(&tmp, dst) {
        cleanup(&tmp);
        return Err(io_error_with_help("rename staged copy into", dst)(e));
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copy_tree_mirrors_structure_and_mtime() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir_all(src.join("a/b")).unwrap();
        fs::write(src.join("top.txt"), "top").unwrap();
        fs::write(src.join("a/b/deep.txt"), "deep").unwrap();
        let old = FileTime::from_unix_time(1_600_000_000, 0);
        set_file_mtime(src.join("top.txt"), old).unwrap();

        let dst = td.path().join("dst");
        let stats = copy_tree(&src, &dst).unwrap();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.dirs, 3);
        assert_eq!(fs::read_to_string(dst.join("a/b/deep.txt")).unwrap(), "deep");
        let meta = fs::metadata(dst.join("top.txt")).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), old);
        // source untouched
        assert!(src.join("top.txt").exists());
    }

    #[test]
    fn copy_tree_refuses_existing_destination() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&dst).unwrap();
        assert!(copy_tree(&src, &dst).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_recreates_symlinks() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("real"), "r").unwrap();
        std::os::unix::fs::symlink("real", src.join("link")).unwrap();
        let dst = td.path().join("dst");
        let stats = copy_tree(&src, &dst).unwrap();
        assert_eq!(stats.symlinks, 1);
        let meta = fs::symlink_metadata(dst.join("link")).unwrap();
        assert!(meta.file_type().is_symlink());
        assert_eq!(fs::read_link(dst.join("link")).unwrap(), Path::new("real"));
    }

    #[test]
    fn copy_into_place_leaves_no_temp_files() {
        let td = tempdir().unwrap();
        let src = td.path().join("f.txt");
        fs::write(&src, "data").unwrap();
        let out = td.path().join("out");
        fs::create_dir(&out).unwrap();
        copy_into_place(&src, &out.join("f.txt")).unwrap();
        let names: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["f.txt".to_string()]);
    }
}
