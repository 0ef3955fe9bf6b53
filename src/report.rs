//! Reporter: per-entry progress lines, the run summary and rollback guidance.
//!
//! Counts are derived from the result sequence after the fact; nothing keeps
//! running counters while the engine works.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::engine::{MigrationResult, MigrationStatus};
use crate::output::{self, Tone, paint};

/// Aggregate view of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub moved: usize,
    pub skipped: usize,
    pub errored: usize,
    pub previewed: usize,
    /// Set only when a snapshot was taken for this run.
    pub backup_path: Option<PathBuf>,
    /// Set once the audit log has been written.
    pub log_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn from_results(results: &[MigrationResult], backup_path: Option<PathBuf>) -> Self {
        results.iter().fold(
            RunSummary {
                total: results.len(),
                backup_path,
                ..Default::default()
            },
            |mut acc, r| {
                match r.status {
                    MigrationStatus::Success => acc.moved += 1,
                    MigrationStatus::SkippedNotFound | MigrationStatus::SkippedDestinationExists => {
                        acc.skipped += 1
                    }
                    MigrationStatus::Error => acc.errored += 1,
                    MigrationStatus::Preview => acc.previewed += 1,
                }
                acc
            },
        )
    }

    pub fn has_errors(&self) -> bool {
        self.errored > 0
    }
}

fn tone_of(status: MigrationStatus) -> Tone {
    match status {
        MigrationStatus::Success => Tone::Ok,
        MigrationStatus::Preview => Tone::Info,
        MigrationStatus::SkippedNotFound | MigrationStatus::SkippedDestinationExists => Tone::Warn,
        MigrationStatus::Error => Tone::Error,
    }
}

/// One progress line, e.g. `[MOVED] README.md -> docs/00-CURRENT/README.md (docs)`.
pub fn format_entry_line(r: &MigrationResult, color: bool) -> String {
    let tag = paint(tone_of(r.status), &format!("[{}]", r.status.label()), color);
    let mut line = format!(
        "{} {} -> {}",
        tag,
        r.entry.source.display(),
        r.entry.destination.display()
    );
    if !r.entry.purpose.is_empty() {
        line.push_str(&format!(" ({})", r.entry.purpose));
    }
    if let Some(detail) = &r.detail {
        line.push_str(&format!(": {detail}"));
    }
    line
}

/// Width of the label column in the summary block.
const LABEL_WIDTH: usize = 12;

fn summary_row(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {label:<width$}{value}", width = LABEL_WIDTH)
}

/// Writes human-readable progress to a sink (stdout in the binary).
pub struct Reporter<W: Write> {
    out: W,
    color: bool,
    dry_run: bool,
}

impl Reporter<io::Stdout> {
    /// Reporter on stdout, colored when stdout is a terminal.
    pub fn stdout(dry_run: bool) -> Self {
        Self {
            out: io::stdout(),
            color: output::stdout_is_tty(),
            dry_run,
        }
    }
}

impl Reporter<io::Sink> {
    /// Reporter that discards everything.
    pub fn silent(dry_run: bool) -> Self {
        Self::new(io::sink(), dry_run)
    }
}

impl<W: Write> Reporter<W> {
    /// Uncolored reporter on an arbitrary sink.
    pub fn new(out: W, dry_run: bool) -> Self {
        Self {
            out,
            color: false,
            dry_run,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Progress output is best-effort: a closed stdout must not stop a migration.
    fn line(&mut self, s: &str) {
        let _ = writeln!(self.out, "{s}");
        let _ = self.out.flush();
    }

    pub fn header(&mut self, base_dir: &Path, entries: usize, backup_path: Option<&Path>) {
        let mode = if self.dry_run {
            paint(Tone::Info, "DRY RUN (no files will be changed)", self.color)
        } else {
            paint(Tone::Warn, "LIVE RUN", self.color)
        };
        self.line(&format!("{mode}: {} entries under {}", entries, base_dir.display()));
        if let Some(b) = backup_path {
            self.line(&format!("Backup created at {}", b.display()));
        }
    }

    /// Stream one entry's outcome.
    pub fn entry(&mut self, r: &MigrationResult) {
        let line = format_entry_line(r, self.color);
        self.line(&line);
    }

    pub fn summary(&mut self, s: &RunSummary) {
        self.line("");
        self.line("SUMMARY");
        self.line(&summary_row("Total:", s.total));
        if self.dry_run {
            self.line(&summary_row("Would move:", s.previewed));
        }
        self.line(&summary_row("Moved:", s.moved));
        self.line(&summary_row("Skipped:", s.skipped));
        let errored = summary_row("Errors:", s.errored);
        if s.has_errors() {
            let painted = paint(Tone::Error, &errored, self.color);
            self.line(&painted);
        } else {
            self.line(&errored);
        }
        if let Some(p) = &s.log_path {
            self.line(&summary_row("Log:", p.display()));
        }
        if self.dry_run {
            self.line("");
            self.line("Dry run complete. No files were modified. Re-run with --execute to apply.");
        }
    }

    /// How to undo a live run.
    pub fn rollback_guidance(&mut self, s: &RunSummary) {
        if self.dry_run {
            return;
        }
        self.line("");
        self.line("ROLLBACK");
        if let Some(log) = &s.log_path {
            self.line(&format!(
                "  Reverse the recorded moves:  repo_migrate --rollback {} --execute",
                log.display()
            ));
        }
        match &s.backup_path {
            Some(b) => self.line(&format!("  Full snapshot of the tree:   {}", b.display())),
            None => self.line("  No snapshot was taken for this run (--skip-backup)."),
        }
        self.line("  Under version control:       git checkout -- . && git clean -fd");
    }
}
