//! I/O error enrichment.
//!
//! Per-entry failures end up in the audit log and on the operator's screen, so the
//! bare `io::Error` text is extended with the operation, the path and a hint
//! derived from the raw OS code.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    match code {
        libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
        libc::EXDEV => Some("cross-filesystem; atomic rename not possible"),
        libc::EBUSY => Some("resource busy; another process holds it"),
        libc::ENOENT => Some("path not found"),
        libc::EEXIST => Some("already exists"),
        libc::ENOTEMPTY => Some("directory not empty"),
        libc::ENOSPC => Some("no space left on device"),
        libc::EROFS => Some("read-only filesystem"),
        libc::ENAMETOOLONG => Some("file name or path too long"),
        libc::ENOTDIR => Some("a path component is not a directory"),
        libc::EISDIR => Some("target is a directory"),
        _ => None,
    }
}

// Common Win32 error codes.
#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    match code {
        5 => Some("access denied; check permissions"),
        17 => Some("not same device; cross-filesystem move"),
        32 => Some("sharing violation; file is in use"),
        2 | 3 => Some("path not found"),
        80 | 183 => Some("already exists"),
        112 => Some("insufficient disk space"),
        206 => Some("file name or path too long"),
        _ => None,
    }
}

#[cfg(not(any(unix, windows)))]
fn os_hint(_code: i32) -> Option<&'static str> {
    None
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

/// `"<op> '<path>': <error>; <hint> [os code: N]"`
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    match e.raw_os_error() {
        Some(code) => {
            if let Some(hint) = os_hint(code) {
                msg.push_str("; ");
                msg.push_str(hint);
            }
            msg.push_str(&format!(" [os code: {code}]"));
        }
        None => {
            if let Some(hint) = kind_hint(e.kind()) {
                msg.push_str("; ");
                msg.push_str(hint);
            }
        }
    }
    msg
}

/// Closure for `.map_err(...)` in `anyhow::Result` code.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(describe_io_error(op, path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_has_op_path_and_kind_hint() {
        let e = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let msg = describe_io_error("rename", Path::new("/a/b"), &e);
        assert!(msg.starts_with("rename '/a/b': nope"));
        assert!(msg.contains("permission denied"));
        assert!(!msg.contains("os code"));
    }

    #[cfg(unix)]
    #[test]
    fn raw_os_error_gets_code_and_hint() {
        let e = io::Error::from_raw_os_error(libc::EXDEV);
        let msg = describe_io_error("rename", Path::new("x"), &e);
        assert!(msg.contains("cross-filesystem"));
        assert!(msg.contains(&format!("[os code: {}]", libc::EXDEV)));
    }
}
