//! Migration plan: the ordered list of declared relocations.
//!
//! The binary ships a built-in plan (the standard docs reorganization); operators
//! can point `--plan` at an XML file with the same shape:
//!
//! ```xml
//! <plan>
//!   <entry source="README.md" destination="docs/00-CURRENT/README.md" purpose="docs"/>
//! </plan>
//! ```

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::errors::MigrateError;

/// One declared relocation. Paths are relative to the run's base directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MigrationEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(default)]
    pub purpose: String,
}

impl MigrationEntry {
    /// Build an entry, normalizing away trailing separators and `.` components.
    /// Rejects absolute paths and any `..` component.
    pub fn new(
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        purpose: impl Into<String>,
    ) -> Result<Self, MigrateError> {
        let source = normalize_relative(source.as_ref())?;
        let destination = normalize_relative(destination.as_ref())?;
        if source == destination {
            return Err(MigrateError::InvalidPlan {
                entry: source.display().to_string(),
                reason: "source and destination are the same path".into(),
            });
        }
        if destination.starts_with(&source) {
            return Err(MigrateError::InvalidPlan {
                entry: source.display().to_string(),
                reason: format!("destination '{}' is inside the source", destination.display()),
            });
        }
        Ok(Self {
            source,
            destination,
            purpose: purpose.into(),
        })
    }

    /// Absolute source path under `base`.
    pub fn source_in(&self, base: &Path) -> PathBuf {
        base.join(&self.source)
    }

    /// Absolute destination path under `base`.
    pub fn destination_in(&self, base: &Path) -> PathBuf {
        base.join(&self.destination)
    }
}

fn normalize_relative(p: &Path) -> Result<PathBuf, MigrateError> {
    let invalid = |reason: &str| MigrateError::InvalidPlan {
        entry: p.display().to_string(),
        reason: reason.to_string(),
    };
    let mut out = PathBuf::new();
    for comp in p.components() {
        match comp {
            Component::Normal(seg) => out.push(seg),
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("'..' is not allowed in plan paths")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("plan paths must be relative to the base directory"));
            }
        }
    }
    if out.as_os_str().is_empty() {
        return Err(invalid("empty path"));
    }
    Ok(out)
}

/// Fixed, ordered list of entries for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    entries: Vec<MigrationEntry>,
}

impl Plan {
    /// Build a plan, refusing duplicate sources so no path is evaluated twice.
    pub fn new(entries: Vec<MigrationEntry>) -> Result<Self, MigrateError> {
        let mut seen = HashSet::new();
        for e in &entries {
            if !seen.insert(e.source.clone()) {
                return Err(MigrateError::InvalidPlan {
                    entry: e.source.display().to_string(),
                    reason: "source listed more than once".into(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[MigrationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The plan compiled into the binary.
    pub fn builtin() -> Self {
        let entries = BUILTIN_PLAN
            .iter()
            .map(|(src, dst, purpose)| MigrationEntry {
                source: PathBuf::from(src),
                destination: PathBuf::from(dst),
                purpose: (*purpose).to_string(),
            })
            .collect();
        Self { entries }
    }

    /// Parse an XML plan document.
    pub fn from_xml_str(xml: &str) -> Result<Self, MigrateError> {
        let parsed: XmlPlan =
            from_xml_str(xml).map_err(|e| MigrateError::Configuration(format!("parse plan: {e}")))?;
        let entries = parsed
            .entries
            .into_iter()
            .map(|e| MigrationEntry::new(e.source.trim(), e.destination.trim(), e.purpose.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    /// Load a plan file from disk.
    pub fn from_xml_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read plan file '{}'", path.display()))?;
        let plan = Self::from_xml_str(&contents)?;
        debug!(path = %path.display(), entries = plan.len(), "Loaded plan file");
        Ok(plan)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename = "plan")]
#[serde(deny_unknown_fields)]
struct XmlPlan {
    #[serde(rename = "entry", default)]
    entries: Vec<XmlEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlEntry {
    #[serde(rename = "@source")]
    source: String,
    #[serde(rename = "@destination")]
    destination: String,
    #[serde(rename = "@purpose", default)]
    purpose: String,
}

/// (source, destination, purpose)
const BUILTIN_PLAN: &[(&str, &str, &str)] = &[
    ("README.md", "docs/00-CURRENT/README.md", "Current project overview"),
    ("CHANGELOG.md", "docs/00-CURRENT/CHANGELOG.md", "Release history"),
    ("ARCHITECTURE.md", "docs/01-ARCHITECTURE/ARCHITECTURE.md", "System architecture"),
    ("API.md", "docs/01-ARCHITECTURE/API.md", "API reference"),
    ("SETUP.md", "docs/02-GUIDES/SETUP.md", "Local setup guide"),
    ("DEPLOYMENT.md", "docs/02-GUIDES/DEPLOYMENT.md", "Deployment guide"),
    ("CONTRIBUTING.md", "docs/02-GUIDES/CONTRIBUTING.md", "Contribution guide"),
    ("ROADMAP.md", "docs/03-PLANNING/ROADMAP.md", "Roadmap"),
    ("TODO.md", "docs/03-PLANNING/TODO.md", "Open tasks"),
    ("NOTES.md", "docs/99-ARCHIVE/NOTES.md", "Historical notes"),
    ("docs-old", "docs/99-ARCHIVE/docs-old", "Superseded documentation tree"),
];
