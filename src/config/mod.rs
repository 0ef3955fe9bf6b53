//! Configuration resolver.
//! Run settings types, default paths, the optional XML settings file and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, path_has_symlink_ancestor};
pub use types::{LogLevel, RunConfig};
pub use validate::validate_and_normalize;
pub use xml::{Settings, load_settings};
