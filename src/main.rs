mod models;
mod report;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Terminal dashboard for budget files with Year, Category and Amount
/// columns (CSV or XLSX).
#[derive(Parser, Debug)]
#[command(name = "budgetdash", version, about)]
struct Args {
    /// Budget file to load on startup; can also be loaded from inside
    /// the dashboard with `o`.
    file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match ui::dashboard::run_dashboard(args.file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
