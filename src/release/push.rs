//! Push policy: try the remote's default credentials first, then retry once
//! with the discovered SSH key.

use crate::error::ReleaseError;
use crate::git::Repository;
use crate::ui;

/// Outcome of a push with SSH fallback
#[derive(Debug)]
pub enum PushResult {
    Pushed,
    /// Succeeded on the retry with `~/.ssh/id_rsa`
    PushedWithKey,
    Failed {
        error: ReleaseError,
        /// Whether an SSH key was found and a retry attempted
        retried: bool,
    },
}

/// Push `refspecs` to `remote`, retrying once with a discovered SSH key.
///
/// Never fails: the final error is handed back for the caller to report.
pub fn push_with_fallback<R: Repository>(
    repo: &mut R,
    remote: &str,
    refspecs: &[&str],
    verbose: bool,
) -> PushResult {
    let first = match repo.push(remote, refspecs, None) {
        Ok(()) => return PushResult::Pushed,
        Err(e) => e,
    };
    ui::display_detail(verbose, &format!("push without key failed: {}", first));

    let Some(auth) = repo.discover_auth() else {
        return PushResult::Failed {
            error: first,
            retried: false,
        };
    };

    match repo.push(remote, refspecs, Some(&auth)) {
        Ok(()) => PushResult::PushedWithKey,
        Err(error) => PushResult::Failed {
            error,
            retried: true,
        },
    }
}
