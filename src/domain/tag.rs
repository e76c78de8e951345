use std::fmt;

/// Canonical release tag (e.g. "v1.2.3", "v2.0.0-rc.1+build.7")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReleaseTag {
    version: semver::Version,
}

impl ReleaseTag {
    pub fn new(version: semver::Version) -> Self {
        ReleaseTag { version }
    }

    /// Major version suffix Go expects at the end of the module path, e.g. "v2"
    pub fn major_suffix(&self) -> String {
        format!("v{}", self.version.major)
    }

    /// Whether the Go module path must carry a major version suffix.
    ///
    /// Uses semver precedence, so pre-releases of 2.0.0 are still exempt.
    pub fn requires_module_suffix(&self) -> bool {
        self.version >= semver::Version::new(2, 0, 0)
    }

    /// Full reference name, e.g. "refs/tags/v1.2.3"
    pub fn ref_name(&self) -> String {
        format!("refs/tags/{}", self)
    }

    pub fn commit_message(&self) -> String {
        format!("Updated for release {}", self)
    }

    pub fn tag_message(&self) -> String {
        format!("Release {}", self)
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version)
    }
}
