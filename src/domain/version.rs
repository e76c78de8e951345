use crate::domain::tag::ReleaseTag;
use crate::error::{ReleaseError, Result};

/// Version string as staged in `.version`, newlines removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedVersion {
    raw: String,
}

impl ProposedVersion {
    /// Create from the raw `.version` contents
    pub fn from_file_contents(contents: &str) -> Self {
        ProposedVersion {
            raw: contents.replace('\n', ""),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check the version is a valid semantic version
    pub fn validate(&self) -> Result<()> {
        parse(&self.raw).map(|_| ())
    }

    /// Canonical release tag, `vMAJOR.MINOR.PATCH[-pre][+build]`
    pub fn canonicalize(&self) -> Result<ReleaseTag> {
        parse(&self.raw).map(ReleaseTag::new)
    }
}

/// Parse a semantic version with an optional leading `v`.
///
/// `1` and `1.2` are accepted as shorthand for `1.0.0` and `1.2.0`, but only
/// without pre-release or build metadata.
fn parse(input: &str) -> Result<semver::Version> {
    if input.is_empty() {
        return Err(ReleaseError::invalid_version(input, "empty version"));
    }

    let body = input.strip_prefix('v').unwrap_or(input);
    let has_metadata = body.contains('-') || body.contains('+');
    let core_len = body.find(['-', '+']).unwrap_or(body.len());
    let segments = body[..core_len].split('.').count();

    let full = match segments {
        1 if !has_metadata => format!("{}.0.0", body),
        2 if !has_metadata => format!("{}.0", body),
        _ => body.to_string(),
    };

    semver::Version::parse(&full)
        .map_err(|e| ReleaseError::invalid_version(input, e.to_string()))
}
