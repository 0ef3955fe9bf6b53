//! Atomic rename helper.
//! Never overwrites: callers have already established that `dst` is free.
//! On Unix the destination directory is fsynced after the rename (best-effort).

use std::fs;
use std::io;
use std::path::Path;

pub(super) fn try_atomic_move(src: &Path, dst: &Path) -> io::Result<()> {
    fs::rename(src, dst)?;

    if let Some(parent) = dst.parent() {
        // A failed fsync does not undo a completed rename.
        let _ = super::util::fsync_dir(parent);
    }
    Ok(())
}
