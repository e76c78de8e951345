use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File the developer stages with the next release version.
pub const DOT_VERSION_FILE: &str = ".version";
/// Go module declaration consulted for v2+ releases.
pub const MODULE_FILE: &str = "go.mod";
/// Default destination of the generated version source.
pub const DEFAULT_OUTPUT: &str = "gen/version/version.go";
/// Whitespace separated license candidates, first existing file wins.
pub const DEFAULT_LICENSE_FILES: &str = "LICENSE.md";
/// SSH user for key based push authentication.
pub const GIT_USER: &str = "git";
pub const DEFAULT_REMOTE: &str = "origin";
pub const TAGS_REFSPEC: &str = "refs/tags/*:refs/tags/*";
pub const SETTINGS_FILE: &str = "gorelease.toml";

pub const NORMAL_EXIT: u8 = 0;
pub const FATAL_EXIT: u8 = 1;
pub const VERSION_CONFLICT_EXIT: u8 = 3;

/// Immutable run configuration shared by every release step.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Downgrade precondition violations to warnings
    pub dirty: bool,
    /// Render the version source to stdout and skip every mutation
    pub dry_run: bool,
    /// Generated source path, relative to the repository root
    pub output: PathBuf,
    /// Show underlying push errors
    pub verbose: bool,
    /// License candidates in lookup order
    pub license_files: Vec<String>,
    /// Remote that receives the tag and branch
    pub remote: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dirty: false,
            dry_run: false,
            output: PathBuf::from(DEFAULT_OUTPUT),
            verbose: false,
            license_files: split_candidates(DEFAULT_LICENSE_FILES),
            remote: DEFAULT_REMOTE.to_string(),
        }
    }
}

impl Config {
    /// Builds the run configuration from persisted settings.
    ///
    /// Command-line flags are applied on top by the caller.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config = Config::default();
        if let Some(output) = &settings.output {
            config.output = PathBuf::from(output);
        }
        if let Some(license_files) = &settings.license_files {
            config.license_files = split_candidates(license_files);
        }
        config
    }
}

/// Optional settings read from `gorelease.toml`.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Default for `--output`
    #[serde(default)]
    pub output: Option<String>,

    /// Whitespace separated license file candidates
    #[serde(default)]
    pub license_files: Option<String>,
}

/// Splits a whitespace separated candidate list.
pub fn split_candidates(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_string).collect()
}

/// Loads settings from file or returns defaults.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `gorelease.toml` in the current directory
/// 3. `gorelease.toml` in the user config directory
/// 4. Defaults if no file is found
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if Path::new(SETTINGS_FILE).exists() {
        PathBuf::from(SETTINGS_FILE)
    } else if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join(SETTINGS_FILE);
        if !candidate.exists() {
            return Ok(Settings::default());
        }
        candidate
    } else {
        return Ok(Settings::default());
    };

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("reading settings {}", path.display()))?;
    let settings: Settings = toml::from_str(&contents)
        .with_context(|| format!("parsing settings {}", path.display()))?;
    Ok(settings)
}
