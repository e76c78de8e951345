use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};
use crate::git::{FileStatus, Identity, RemoteAuth, Repository, WorktreeStatus};

/// A push as seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct PushRecord {
    pub remote: String,
    pub refspecs: Vec<String>,
    pub with_auth: bool,
}

/// In-memory repository that records every mutation
pub struct MockRepository {
    workdir: PathBuf,
    status: WorktreeStatus,
    tags: BTreeSet<String>,
    auth: Option<RemoteAuth>,
    push_failures: VecDeque<bool>,
    pub added: Vec<PathBuf>,
    pub commits: Vec<String>,
    pub created_tags: Vec<(String, String)>,
    pub pushes: Vec<PushRecord>,
}

impl MockRepository {
    /// Create an empty mock rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            status: WorktreeStatus::new(),
            tags: BTreeSet::new(),
            auth: None,
            push_failures: VecDeque::new(),
            added: Vec::new(),
            commits: Vec::new(),
            created_tags: Vec::new(),
            pushes: Vec::new(),
        }
    }

    /// Report `path` as untracked
    pub fn with_untracked(mut self, path: &str) -> Self {
        self.status.insert(path, FileStatus::untracked());
        self
    }

    /// Pretend `tag` already exists
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_string());
        self
    }

    /// Credentials returned by discovery
    pub fn with_auth(mut self, auth: RemoteAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Script push outcomes in call order, `true` meaning the push fails.
    /// Unscripted pushes succeed.
    pub fn with_push_failures(mut self, failures: &[bool]) -> Self {
        self.push_failures = failures.iter().copied().collect();
        self
    }

    /// Whether anything was staged, committed, tagged or pushed
    pub fn is_untouched(&self) -> bool {
        self.added.is_empty()
            && self.commits.is_empty()
            && self.created_tags.is_empty()
            && self.pushes.is_empty()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn status(&self) -> Result<WorktreeStatus> {
        Ok(self.status.clone())
    }

    fn add(&mut self, path: &Path) -> Result<()> {
        self.added.push(path.to_path_buf());
        Ok(())
    }

    fn commit(&mut self, message: &str, _identity: &Identity) -> Result<()> {
        self.commits.push(message.to_string());
        Ok(())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        Ok(self.tags.contains(tag))
    }

    fn create_tag(&mut self, tag: &str, message: &str, _tagger: &Identity) -> Result<()> {
        if !self.tags.insert(tag.to_string()) {
            return Err(ReleaseError::tag(format!("tag '{}' already exists", tag)));
        }
        self.created_tags.push((tag.to_string(), message.to_string()));
        Ok(())
    }

    fn push(&mut self, remote: &str, refspecs: &[&str], auth: Option<&RemoteAuth>) -> Result<()> {
        self.pushes.push(PushRecord {
            remote: remote.to_string(),
            refspecs: refspecs.iter().map(|s| s.to_string()).collect(),
            with_auth: auth.is_some(),
        });
        if self.push_failures.pop_front().unwrap_or(false) {
            return Err(ReleaseError::push(remote, "scripted failure"));
        }
        Ok(())
    }

    fn discover_auth(&self) -> Option<RemoteAuth> {
        self.auth.clone()
    }
}
