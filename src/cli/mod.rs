//! Command-line surface.
//!
//! Separates clap argument parsing from the release driver: [Args] is turned
//! into an immutable [Config] once, and nothing downstream sees clap.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::{Config, Settings};

/// Flags that also accept the single-dash spelling (`-dry-run`).
const LONG_FLAGS: &[&str] = &["dirty", "dry-run", "output", "verbose", "version", "config"];

#[derive(clap::Parser, Debug, Clone, PartialEq)]
#[command(
    name = "gorelease",
    about = "Generate a Go version file from .version, commit it, tag the release and push"
)]
pub struct Args {
    #[arg(long, help = "Allow a dirty repository with other uncommitted files")]
    pub dirty: bool,

    #[arg(long, help = "Print the generated source; no files changed, no tags or pushes")]
    pub dry_run: bool,

    #[arg(long, value_name = "PATH", help = "Where to put the generated version.go file")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Verbose mode, more detail on push errors")]
    pub verbose: bool,

    #[arg(long, help = "Print version information")]
    pub version: bool,

    #[arg(long, value_name = "PATH", help = "Custom settings file path")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Apply the flags on top of persisted settings
    pub fn into_config(self, settings: &Settings) -> Config {
        let mut config = Config::from_settings(settings);
        config.dirty = self.dirty;
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;
        if let Some(output) = self.output {
            config.output = output;
        }
        config
    }
}

/// Rewrite Go-style `-flag` / `-flag=value` into `--flag` for clap.
///
/// Only known long flag names are rewritten, and nothing after `--`.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if LONG_FLAGS.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
