//! Go module declaration handling for the major version rule.
//!
//! Go requires the import path of a module at major version 2 or later to
//! end in `/vN`. A release tag that crosses that line must therefore match
//! the `module` directive in `go.mod`.

use regex::Regex;

use crate::domain::tag::ReleaseTag;
use crate::error::{ReleaseError, Result};

/// The `module` directive of a go.mod file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub path: String,
}

impl GoModule {
    /// Parse the first `module` directive from go.mod contents.
    pub fn parse(contents: &str) -> Result<Self> {
        if let Ok(re) = Regex::new(r#"^module\s+(?:"([^"]+)"|`([^`]+)`|(\S+))$"#) {
            for line in contents.lines() {
                let line = match line.find("//") {
                    Some(idx) => &line[..idx],
                    None => line,
                };
                if let Some(caps) = re.captures(line.trim()) {
                    if let Some(path) = caps.get(1).or(caps.get(2)).or(caps.get(3)) {
                        return Ok(GoModule {
                            path: path.as_str().to_string(),
                        });
                    }
                }
            }
        }

        Err(ReleaseError::version_conflict(
            "go.mod has no module directive",
        ))
    }

    /// Final `/` separated element of the module path
    pub fn last_segment(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Enforce the major version rule for `tag` against go.mod contents.
///
/// Tags below v2.0.0 always pass without looking at go.mod.
pub fn enforce_major_module_rule(tag: &ReleaseTag, go_mod: &str) -> Result<()> {
    if !tag.requires_module_suffix() {
        return Ok(());
    }

    let module = GoModule::parse(go_mod)?;
    let suffix = tag.major_suffix();
    if module.last_segment() != suffix {
        return Err(ReleaseError::version_conflict(format!(
            "major version specified ({}) not found at end of go.mod module {}",
            suffix, module.path
        )));
    }
    Ok(())
}
