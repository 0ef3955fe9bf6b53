//! XML settings file support (quick_xml + serde).
//!
//! Every field is optional; CLI flags override whatever is found here. Unknown
//! fields are rejected so a typo cannot silently fall back to a default. Live mode
//! cannot be enabled from this file.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::{CONFIG_ENV, default_config_path};
use super::types::{LogLevel, RunConfig};
use crate::errors::MigrateError;

#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    base_dir: Option<String>,
    backup_dir: Option<String>,
    audit_dir: Option<String>,
    skip_backup: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
}

/// Values read from a settings file; `None` means "not set there".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub base_dir: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub audit_dir: Option<PathBuf>,
    pub skip_backup: Option<bool>,
    pub log_level: Option<LogLevel>,
    pub log_file: Option<PathBuf>,
}

fn non_empty_path(s: Option<String>) -> Option<PathBuf> {
    s.and_then(|v| {
        let t = v.trim();
        if t.is_empty() { None } else { Some(PathBuf::from(t)) }
    })
}

impl Settings {
    pub fn from_xml_str(xml: &str) -> Result<Self, MigrateError> {
        let parsed: XmlConfig = from_xml_str(xml)
            .map_err(|e| MigrateError::Configuration(format!("parse settings: {e}")))?;
        let log_level = match parsed.log_level.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(s.parse::<LogLevel>().map_err(MigrateError::Configuration)?),
        };
        Ok(Self {
            base_dir: non_empty_path(parsed.base_dir),
            backup_dir: non_empty_path(parsed.backup_dir),
            audit_dir: non_empty_path(parsed.audit_dir),
            skip_backup: parsed.skip_backup,
            log_level,
            log_file: non_empty_path(parsed.log_file),
        })
    }

    pub fn from_xml_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read settings file '{}'", path.display()))?;
        let s = Self::from_xml_str(&contents)
            .with_context(|| format!("in settings file '{}'", path.display()))?;
        debug!(path = %path.display(), "Loaded settings");
        Ok(s)
    }

    /// Copy every value that is set onto `cfg`.
    pub fn apply_to(&self, cfg: &mut RunConfig) {
        if let Some(b) = &self.base_dir {
            cfg.base_dir = b.clone();
        }
        if let Some(b) = &self.backup_dir {
            cfg.backup_dir = Some(b.clone());
        }
        if let Some(a) = &self.audit_dir {
            cfg.audit_dir = Some(a.clone());
        }
        if let Some(skip) = self.skip_backup {
            cfg.skip_backup = skip;
        }
        if let Some(lvl) = self.log_level {
            cfg.log_level = lvl;
        }
        if let Some(f) = &self.log_file {
            cfg.log_file = Some(f.clone());
        }
    }
}

/// Load settings from `explicit`, else from the default location.
///
/// A missing file at the implicit default location is not an error. A file named
/// explicitly (flag or `REPO_MIGRATE_CONFIG`) must exist.
pub fn load_settings(explicit: Option<&Path>) -> Result<Option<Settings>> {
    let env_set = std::env::var_os(CONFIG_ENV).is_some();
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, env_set),
            None => return Ok(None),
        },
    };
    if !path.exists() {
        if required {
            return Err(MigrateError::Configuration(format!(
                "settings file not found: {}",
                path.display()
            ))
            .into());
        }
        debug!(path = %path.display(), "No settings file; using defaults");
        return Ok(None);
    }
    Settings::from_xml_path(&path).map(Some)
}
