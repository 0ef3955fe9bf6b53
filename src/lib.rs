//! Core library for `repo_migrate`.
//!
//! Plans and executes batch relocations of files inside a repository:
//! dry run by default, existence and conflict checks per entry, a full snapshot
//! before any live move, per-entry outcomes, and a JSON audit log that can drive
//! a rollback.
//!
//! Pipeline: [`config`] -> [`backup`] -> [`engine`] -> [`report`] / [`audit`],
//! tied together by [`runner::run_plan`].

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod plan;
pub mod platform;
pub mod report;
pub mod rollback;
pub mod runner;

pub use config::{LogLevel, RunConfig};
pub use engine::{MigrationResult, MigrationStatus};
pub use errors::MigrateError;
pub use plan::{MigrationEntry, Plan};
pub use report::RunSummary;
pub use runner::{RunOutcome, run_plan};
