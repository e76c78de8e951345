use std::io;
use std::process::ExitCode;

use clap::Parser;

use gorelease::cli::{self, Args};
use gorelease::config::{self, FATAL_EXIT, NORMAL_EXIT};
use gorelease::git::Git2Repository;
use gorelease::release::{ReleaseDriver, ReleaseOutcome};
use gorelease::ui;

fn main() -> ExitCode {
    let args = Args::parse_from(cli::normalize_args(std::env::args_os()));

    if args.version {
        println!("gorelease {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::from(NORMAL_EXIT);
    }

    ExitCode::from(run(args))
}

fn run(args: Args) -> u8 {
    let settings = match config::load_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {:#}", e));
            return FATAL_EXIT;
        }
    };
    let config = args.into_config(&settings);

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            return e.exit_code();
        }
    };

    let stdout = io::stdout();
    let mut driver = ReleaseDriver::new(&config, repo, stdout.lock());
    match driver.run() {
        Ok(ReleaseOutcome::DryRun { tag, .. }) => {
            ui::display_success(&format!("Dry run complete for {}", tag));
            NORMAL_EXIT
        }
        Ok(ReleaseOutcome::Released(report)) => {
            if report.tags_pushed && report.branch_pushed {
                ui::display_success(&format!("Released {}", report.tag));
            } else {
                ui::display_success(&format!("Released {} locally", report.tag));
            }
            NORMAL_EXIT
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            e.exit_code()
        }
    }
}
