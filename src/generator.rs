//! Rendering of the generated Go version source.
//!
//! The template has three substitution points: `$LICENSE$`, `$PACKAGE$` and
//! `$TAG$`. Rendering is pure; only [`write_source`] touches the filesystem.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::ReleaseTag;
use crate::error::{ReleaseError, Result};

pub const VERSION_TEMPLATE: &str = r#"$LICENSE$

package $PACKAGE$

// Code generated by gorelease DO NOT EDIT.

// Version number for official releases.
const Version = "$TAG$"
"#;

/// Fully rendered version source and where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSource {
    /// Destination, relative to the repository root
    pub path: PathBuf,
    pub contents: String,
}

impl VersionSource {
    /// Render the version source for `tag` at `output`.
    ///
    /// License candidates are looked up under `root`.
    pub fn generate(root: &Path, output: &Path, license_files: &[String], tag: &ReleaseTag) -> Self {
        let license = license_block(root, license_files);
        let package = package_name(output);
        VersionSource {
            path: output.to_path_buf(),
            contents: render(&license, &package, &tag.to_string()),
        }
    }

    /// Print the source instead of writing it (dry run).
    pub fn emit<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}", self.contents)
            .map_err(|e| ReleaseError::fs_io("printing generated source", e))
    }

    /// Write the source below `root`, creating its directory when needed.
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let target = root.join(&self.path);
        write_source(&target, &self.contents)?;
        Ok(target)
    }
}

/// Substitute the template placeholders.
pub fn render(license: &str, package: &str, tag: &str) -> String {
    VERSION_TEMPLATE
        .replacen("$LICENSE$", license, 1)
        .replace("$PACKAGE$", package)
        .replacen("$TAG$", tag, 1)
}

/// Wrap license text as a C-style block comment.
pub fn frame_license(text: &str) -> String {
    format!("/*\n *{}\n */\n", text.replace('\n', "\n *"))
}

/// Block comment for the first readable license candidate, or "".
pub fn license_block(root: &Path, candidates: &[String]) -> String {
    candidates
        .iter()
        .find_map(|candidate| fs::read_to_string(root.join(candidate)).ok())
        .map(|text| frame_license(&text))
        .unwrap_or_default()
}

/// Go package name: base name of the output's parent directory.
pub fn package_name(output: &Path) -> String {
    let base = output
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str());
    match base {
        Some(name) if name != "." => name.to_string(),
        _ => "main".to_string(),
    }
}

/// Write `contents` to `target`, materializing the parent directory.
pub fn write_source(target: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.is_dir() {
            create_dir(dir)?;
        }
    }

    let mut file = fs::File::create(target)
        .map_err(|e| ReleaseError::fs_io(format!("creating {}", target.display()), e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| ReleaseError::fs_io(format!("writing {}", target.display()), e))?;
    Ok(())
}

fn create_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
        .create(dir)
        .map_err(|e| ReleaseError::fs_io(format!("unable to create {}", dir.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_substitutes_all() {
        let source = render("", "version", "v1.2.3");
        assert!(source.contains("package version\n"));
        assert!(source.contains("const Version = \"v1.2.3\""));
        assert!(source.contains("// Code generated by gorelease DO NOT EDIT."));
        assert!(!source.contains('$'));
    }

    #[test]
    fn test_frame_license() {
        assert_eq!(
            frame_license("Copyright 2024\nAll rights reserved."),
            "/*\n *Copyright 2024\n *All rights reserved.\n */\n"
        );
    }

    #[test]
    fn test_package_name() {
        assert_eq!(package_name(Path::new("gen/version/version.go")), "version");
        assert_eq!(package_name(Path::new("internal/build/v.go")), "build");
        assert_eq!(package_name(Path::new("version.go")), "main");
        assert_eq!(package_name(Path::new("./version.go")), "main");
    }

    #[test]
    fn test_license_block_first_existing_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("LICENSE"), "MIT").unwrap();
        fs::write(dir.path().join("COPYING"), "GPL").unwrap();

        let candidates = vec![
            "LICENSE.md".to_string(),
            "LICENSE".to_string(),
            "COPYING".to_string(),
        ];
        assert_eq!(license_block(dir.path(), &candidates), "/*\n *MIT\n */\n");
    }

    #[test]
    fn test_license_block_missing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(license_block(dir.path(), &["LICENSE.md".to_string()]), "");
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("gen/version/version.go");
        write_source(&target, "package version\n").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "package version\n");
        assert!(dir.path().join("gen/version").is_dir());
    }

    #[test]
    fn test_write_fails_when_parent_is_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("gen"), "not a directory").unwrap();
        let err = write_source(&dir.path().join("gen/version.go"), "x").unwrap_err();
        assert!(matches!(err, ReleaseError::FsIo { .. }));
    }

    #[test]
    fn test_emit_writes_contents() {
        let source = VersionSource {
            path: PathBuf::from("version.go"),
            contents: render("", "main", "v0.1.0"),
        };
        let mut out = Vec::new();
        source.emit(&mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("const Version = \"v0.1.0\""));
    }
}
