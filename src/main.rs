use std::process::ExitCode;

mod app;
mod logging;

use repo_migrate::{cli, output as out};

fn main() -> ExitCode {
    let args = cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::from(1)
        }
    }
}
