//! Windows implementations of platform helpers (no ACL management).

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Open a log file for appending; std offers no symlink defense here.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}
