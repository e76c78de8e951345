//! Console output for the release run.
//!
//! Everything here writes to stderr so that a dry run leaves stdout holding
//! only the rendered source.

use console::style;

use crate::warnings::ReleaseWarning;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Show a warning, followed by its recovery command when it has one.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
    if let Some(hint) = warning.recovery_hint() {
        display_manual_push_instruction(&hint);
    }
}

/// Extra detail, shown only in verbose mode.
pub fn display_detail(verbose: bool, message: &str) {
    if verbose {
        eprintln!("  {}", style(message).dim());
    }
}

/// Show the command that completes an interrupted publish.
pub fn display_manual_push_instruction(command: &str) {
    eprintln!(
        "{} To finish publishing, run:\n  {}",
        style("→").yellow(),
        style(command).cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_helpers_do_not_panic() {
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_detail(true, "verbose detail");
        display_detail(false, "hidden detail");
        display_manual_push_instruction("git push origin v1.2.3; git push");
        display_warning(&ReleaseWarning::NoSshKey);
        display_warning(&ReleaseWarning::BranchPushFailed {
            remote: "origin".to_string(),
            error: "rejected".to_string(),
        });
    }
}
