use std::fmt;

/// Non-fatal conditions met during a release.
/// They are reported to the user but never change the exit code.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// The worktree was not exactly `{.version}` and `--dirty` was given
    PreconditionOverridden { reason: String },
    /// Tags could not be pushed, even after the SSH retry
    TagPushFailed {
        tag: String,
        remote: String,
        error: String,
    },
    /// The branch push failed; the release stays local until pushed by hand
    BranchPushFailed { remote: String, error: String },
    /// No usable `~/.ssh/id_rsa`, the push was not retried
    NoSshKey,
}

impl ReleaseWarning {
    /// Command that completes the publish by hand, when one applies.
    pub fn recovery_hint(&self) -> Option<String> {
        match self {
            ReleaseWarning::TagPushFailed { tag, remote, .. } => {
                Some(format!("git push {} {}; git push", remote, tag))
            }
            ReleaseWarning::BranchPushFailed { remote, .. } => Some(format!("git push {}", remote)),
            _ => None,
        }
    }
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::PreconditionOverridden { reason } => {
                write!(f, "{} (continuing, --dirty given)", reason)
            }
            ReleaseWarning::TagPushFailed { tag, remote, .. } => {
                write!(f, "Push of tag {} to '{}' failed", tag, remote)
            }
            ReleaseWarning::BranchPushFailed { remote, .. } => {
                write!(f, "Branch push to '{}' failed", remote)
            }
            ReleaseWarning::NoSshKey => write!(f, "No SSH key found at ~/.ssh/id_rsa, not retrying"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_push_failed_display() {
        let warning = ReleaseWarning::TagPushFailed {
            tag: "v1.2.3".to_string(),
            remote: "origin".to_string(),
            error: "authentication required".to_string(),
        };
        let msg = warning.to_string();
        assert_eq!(msg, "Push of tag v1.2.3 to 'origin' failed");
        assert!(!msg.contains("git push"));
        assert_eq!(
            warning.recovery_hint().as_deref(),
            Some("git push origin v1.2.3; git push")
        );
    }

    #[test]
    fn test_precondition_overridden_display() {
        let warning = ReleaseWarning::PreconditionOverridden {
            reason: "2 files changed".to_string(),
        };
        assert!(warning.to_string().starts_with("2 files changed"));
        assert_eq!(warning.recovery_hint(), None);
    }

    #[test]
    fn test_branch_push_hint() {
        let warning = ReleaseWarning::BranchPushFailed {
            remote: "origin".to_string(),
            error: "rejected".to_string(),
        };
        assert_eq!(warning.to_string(), "Branch push to 'origin' failed");
        assert_eq!(warning.recovery_hint().as_deref(), Some("git push origin"));
    }
}
