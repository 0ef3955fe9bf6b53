//! Filesystem operations used by the backup manager and the migration engine.

mod atomic;
mod copy;
mod helpers;
mod relocate;
mod space;
mod util;

pub use copy::{CopyStats, copy_into_place, copy_tree};
pub use helpers::{describe_io_error, io_error_with_help};
pub use relocate::{HostRelocator, Relocator};
pub use space::{ensure_space_for_copy, format_bytes, free_space_bytes, tree_size};
pub use util::unique_sibling;
