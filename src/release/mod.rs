//! Release driver
//!
//! Moves a repository from "release pending" (only `.version` untracked) to
//! "release published" (generated source committed, tag on `origin`):
//!
//! 1. Check preconditions (`--dirty` downgrades a violation to a warning)
//! 2. Read and canonicalize `.version`
//! 3. Enforce the Go major version module rule for v2+
//! 4. Generate the version source (printed and finished on `--dry-run`)
//! 5. Stage, commit, tag
//! 6. Push tags, then the branch; push failures are reported, not fatal
//!
//! Once the tag is created the local repository is released, whatever happens
//! to the pushes. Reruns stop at the tag check.

pub mod push;

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config::{Config, DOT_VERSION_FILE, MODULE_FILE, TAGS_REFSPEC};
use crate::domain::{enforce_major_module_rule, ProposedVersion, ReleaseTag};
use crate::error::{ReleaseError, Result};
use crate::generator::VersionSource;
use crate::git::{Identity, Repository, WorktreeStatus};
use crate::ui;
use crate::warnings::ReleaseWarning;

pub use push::{push_with_fallback, PushResult};

/// States of a release run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReleaseStep {
    Start,
    CheckPreconditions,
    ReadVersion,
    EnforceModuleRule,
    GenerateSource,
    StageFiles,
    CommitRelease,
    CreateTag,
    PushTags,
    PushBranch,
    Done,
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseStep::Start => "starting",
            ReleaseStep::CheckPreconditions => "checking repository status",
            ReleaseStep::ReadVersion => "reading .version",
            ReleaseStep::EnforceModuleRule => "checking go.mod major version",
            ReleaseStep::GenerateSource => "generating version source",
            ReleaseStep::StageFiles => "staging files",
            ReleaseStep::CommitRelease => "committing files",
            ReleaseStep::CreateTag => "setting tag",
            ReleaseStep::PushTags => "pushing tags",
            ReleaseStep::PushBranch => "pushing branch",
            ReleaseStep::Done => "done",
        };
        f.write_str(name)
    }
}

/// Summary of a completed (non dry-run) release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub tag: ReleaseTag,
    pub tags_pushed: bool,
    pub branch_pushed: bool,
    pub warnings: Vec<ReleaseWarning>,
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// Source rendered to the output stream, nothing changed
    DryRun {
        tag: ReleaseTag,
        source: VersionSource,
    },
    Released(ReleaseReport),
}

impl ReleaseOutcome {
    pub fn tag(&self) -> &ReleaseTag {
        match self {
            ReleaseOutcome::DryRun { tag, .. } => tag,
            ReleaseOutcome::Released(report) => &report.tag,
        }
    }
}

/// Why the worktree is not ready for release, if it isn't.
///
/// Ready means exactly one changed file, `.version`, untracked on both sides.
pub fn precondition_violation(status: &WorktreeStatus) -> Option<String> {
    if status.len() != 1 {
        return Some(format!(
            "incorrect file commit status, {} files, expecting only {}",
            status.len(),
            DOT_VERSION_FILE
        ));
    }
    match status.file(DOT_VERSION_FILE) {
        Some(file) if file.is_untracked() => None,
        Some(file) => Some(format!(
            "{} should be untracked, found staging '{}' worktree '{}'",
            DOT_VERSION_FILE, file.staging, file.worktree
        )),
        None => Some(format!(
            "{} should be the only uncommitted file",
            DOT_VERSION_FILE
        )),
    }
}

/// Runs one release against an exclusively owned repository.
pub struct ReleaseDriver<'a, R: Repository, W: Write> {
    config: &'a Config,
    repo: R,
    out: W,
    step: ReleaseStep,
    warnings: Vec<ReleaseWarning>,
}

impl<'a, R: Repository, W: Write> ReleaseDriver<'a, R, W> {
    /// `out` receives the rendered source on a dry run
    pub fn new(config: &'a Config, repo: R, out: W) -> Self {
        ReleaseDriver {
            config,
            repo,
            out,
            step: ReleaseStep::Start,
            warnings: Vec::new(),
        }
    }

    /// Last state entered; after a failure, the state that failed
    pub fn step(&self) -> ReleaseStep {
        self.step
    }

    pub fn into_parts(self) -> (R, W) {
        (self.repo, self.out)
    }

    pub fn run(&mut self) -> Result<ReleaseOutcome> {
        if self.config.dry_run {
            ui::display_status("Performing dry run.");
        }

        self.check_preconditions()?;
        let tag = self.read_version()?;
        self.enforce_module_rule(&tag)?;
        let source = self.generate_source(&tag)?;

        if self.config.dry_run {
            self.enter(ReleaseStep::Done);
            return Ok(ReleaseOutcome::DryRun { tag, source });
        }

        self.stage_files(&source)?;
        let identity = Identity::current()?;
        self.commit_release(&tag, &identity)?;
        self.create_tag(&tag, &identity)?;
        let tags_pushed = self.push_tags(&tag);
        let branch_pushed = self.push_branch();
        self.enter(ReleaseStep::Done);

        Ok(ReleaseOutcome::Released(ReleaseReport {
            tag,
            tags_pushed,
            branch_pushed,
            warnings: self.warnings.clone(),
        }))
    }

    fn enter(&mut self, step: ReleaseStep) {
        self.step = step;
        ui::display_detail(self.config.verbose, &format!("step: {}", step));
    }

    fn warn(&mut self, warning: ReleaseWarning) {
        ui::display_warning(&warning);
        self.warnings.push(warning);
    }

    fn root(&self) -> &Path {
        self.repo.workdir()
    }

    fn check_preconditions(&mut self) -> Result<()> {
        self.enter(ReleaseStep::CheckPreconditions);
        let status = self.repo.status()?;

        if let Some(reason) = precondition_violation(&status) {
            if !self.config.dirty {
                return Err(ReleaseError::precondition(reason));
            }
            self.warn(ReleaseWarning::PreconditionOverridden { reason });
        }
        Ok(())
    }

    fn read_version(&mut self) -> Result<ReleaseTag> {
        self.enter(ReleaseStep::ReadVersion);
        let path = self.root().join(DOT_VERSION_FILE);
        let contents = fs::read_to_string(&path)
            .map_err(|e| ReleaseError::fs_io(format!("reading {}", DOT_VERSION_FILE), e))?;

        let proposed = ProposedVersion::from_file_contents(&contents);
        proposed.validate()?;
        proposed.canonicalize()
    }

    fn enforce_module_rule(&mut self, tag: &ReleaseTag) -> Result<()> {
        self.enter(ReleaseStep::EnforceModuleRule);
        if !tag.requires_module_suffix() {
            return Ok(());
        }

        ui::display_status(&format!(
            "{} is v2 or later, checking {} module path",
            tag, MODULE_FILE
        ));
        let go_mod = fs::read_to_string(self.root().join(MODULE_FILE))
            .map_err(|e| ReleaseError::fs_io(format!("unable to read {}", MODULE_FILE), e))?;
        enforce_major_module_rule(tag, &go_mod)
    }

    fn generate_source(&mut self, tag: &ReleaseTag) -> Result<VersionSource> {
        self.enter(ReleaseStep::GenerateSource);
        let source = VersionSource::generate(
            self.root(),
            &self.config.output,
            &self.config.license_files,
            tag,
        );

        if self.config.dry_run {
            source.emit(&mut self.out)?;
        } else {
            let written = source.write(self.root())?;
            ui::display_success(&format!("Generated {}", written.display()));
        }
        Ok(source)
    }

    fn stage_files(&mut self, source: &VersionSource) -> Result<()> {
        self.enter(ReleaseStep::StageFiles);
        self.repo.add(&source.path)?;
        self.repo.add(Path::new(DOT_VERSION_FILE))?;
        Ok(())
    }

    fn commit_release(&mut self, tag: &ReleaseTag, identity: &Identity) -> Result<()> {
        self.enter(ReleaseStep::CommitRelease);
        self.repo.commit(&tag.commit_message(), identity)?;
        ui::display_success(&format!("Committed: {}", tag.commit_message()));
        Ok(())
    }

    fn create_tag(&mut self, tag: &ReleaseTag, identity: &Identity) -> Result<()> {
        self.enter(ReleaseStep::CreateTag);
        let name = tag.to_string();
        if self.repo.tag_exists(&name)? {
            return Err(ReleaseError::tag(format!(
                "unable to set tag {}: tag already exists",
                name
            )));
        }

        ui::display_status(&format!("Set tag {}", name));
        self.repo.create_tag(&name, &tag.tag_message(), identity)?;
        ui::display_success(&format!("Created tag: {}", name));
        Ok(())
    }

    fn push_tags(&mut self, tag: &ReleaseTag) -> bool {
        self.enter(ReleaseStep::PushTags);
        let remote = self.config.remote.clone();
        let result = push_with_fallback(&mut self.repo, &remote, &[TAGS_REFSPEC], self.config.verbose);

        match result {
            PushResult::Pushed | PushResult::PushedWithKey => {
                ui::display_success(&format!("Pushed tags to {}", remote));
                true
            }
            PushResult::Failed { error, retried } => {
                if !retried {
                    self.warn(ReleaseWarning::NoSshKey);
                }
                ui::display_detail(self.config.verbose, &error.to_string());
                self.warn(ReleaseWarning::TagPushFailed {
                    tag: tag.to_string(),
                    remote: remote.clone(),
                    error: error.to_string(),
                });
                false
            }
        }
    }

    fn push_branch(&mut self) -> bool {
        self.enter(ReleaseStep::PushBranch);
        let remote = self.config.remote.clone();
        match push_with_fallback(&mut self.repo, &remote, &[], self.config.verbose) {
            PushResult::Pushed | PushResult::PushedWithKey => {
                ui::display_success(&format!("Pushed branch to {}", remote));
                true
            }
            PushResult::Failed { error, .. } => {
                ui::display_detail(self.config.verbose, &error.to_string());
                self.warn(ReleaseWarning::BranchPushFailed {
                    remote,
                    error: error.to_string(),
                });
                false
            }
        }
    }
}
