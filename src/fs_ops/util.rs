use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Hidden, process-unique scratch name inside `dst_dir`.
pub(super) fn unique_temp_path(dst_dir: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    dst_dir.join(format!(".repo_migrate.{pid}.{nanos}.tmp"))
}

/// `candidate` if free, otherwise `candidate-2`, `candidate-3`, ... (extension kept).
pub fn unique_sibling(candidate: &Path) -> PathBuf {
    if std::fs::symlink_metadata(candidate).is_err() {
        return candidate.to_path_buf();
    }
    let stem = candidate
        .file_stem()
        .map(|s| s.to_owned())
        .unwrap_or_else(|| std::ffi::OsStr::new("item").to_owned());
    let ext = candidate.extension().map(|e| e.to_owned());
    let with_suffix = |suffix: String| {
        let mut name = stem.clone();
        name.push(suffix);
        if let Some(ref e) = ext {
            name.push(".");
            name.push(e);
        }
        candidate.with_file_name(name)
    };
    for n in 2u32..100 {
        let alt = with_suffix(format!("-{n}"));
        if std::fs::symlink_metadata(&alt).is_err() {
            return alt;
        }
    }
    with_suffix(format!("-{}", std::process::id()))
}

/// EXDEV / ERROR_NOT_SAME_DEVICE; std has no stable ErrorKind for it.
pub(super) fn is_cross_device(e: &io::Error) -> bool {
    match e.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == libc::EXDEV,
        #[cfg(windows)]
        Some(code) => code == 17,
        #[cfg(not(any(unix, windows)))]
        Some(_) => false,
        None => false,
    }
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
