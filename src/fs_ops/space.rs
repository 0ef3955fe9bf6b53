//! Free-space preflight for snapshot copies.

use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::MigrateError;

#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;
#[cfg(windows)]
use std::os::windows::ffi::OsStrExt;

/// Headroom kept free on top of the bytes being copied.
const CUSHION: u64 = 4 * 1024 * 1024;

pub fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}

/// Total bytes of regular files under `root` (symlinks not followed).
pub fn tree_size(root: &Path) -> io::Result<u64> {
    let mut total = 0u64;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() {
            total = total.saturating_add(entry.metadata().map_err(io::Error::other)?.len());
        }
    }
    Ok(total)
}

/// Fail with `InsufficientSpace` unless `dst_dir` can take `required` bytes.
pub fn ensure_space_for_copy(dst_dir: &Path, required: u64) -> Result<(), MigrateError> {
    let free = match free_space_bytes(dst_dir) {
        Ok(n) => n,
        Err(e) => {
            // Unknown free space is not a reason to refuse; the copy will fail loudly if full.
            debug!(dir = %dst_dir.display(), error = %e, "Free-space query failed; skipping preflight");
            return Ok(());
        }
    };
    debug!(
        dir = %dst_dir.display(),
        required = %format_bytes(required),
        free = %format_bytes(free),
        "Space preflight"
    );
    if free < required.saturating_add(CUSHION) {
        return Err(MigrateError::InsufficientSpace {
            required,
            available: free,
            dest: dst_dir.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(unix)]
#[allow(clippy::unnecessary_cast)]
pub fn free_space_bytes(path: &Path) -> io::Result<u64> {
    let cpath = std::ffi::CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))?;
    let mut s: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(cpath.as_ptr(), &mut s) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok((s.f_bavail as u64).saturating_mul(s.f_frsize as u64))
}

#[cfg(windows)]
pub fn free_space_bytes(path: &Path) -> io::Result<u64> {
    use std::iter::once;
    use windows_sys::Win32::Storage::FileSystem::GetDiskFreeSpaceExW;
    let wide: Vec<u16> = path.as_os_str().encode_wide().chain(once(0)).collect();
    let mut free_avail: u64 = 0;
    let mut total: u64 = 0;
    let mut total_free: u64 = 0;
    let ok = unsafe {
        GetDiskFreeSpaceExW(
            wide.as_ptr(),
            &mut free_avail as *mut u64,
            &mut total as *mut u64,
            &mut total_free as *mut u64,
        )
    };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(free_avail)
}

#[cfg(not(any(unix, windows)))]
pub fn free_space_bytes(_path: &Path) -> io::Result<u64> {
    Ok(u64::MAX)
}
