//! Git operations abstraction layer
//!
//! The release driver talks to the repository only through the [Repository]
//! trait. Two implementations exist:
//!
//! - [repository::Git2Repository]: a real repository backed by the `git2` crate
//! - [mock::MockRepository]: an in-memory repository that records every mutation
//!
//! # Usage
//!
//! ```rust
//! # use gorelease::git::{Repository, Identity};
//! # use std::path::Path;
//! # fn example<R: Repository>(repo: &mut R) -> gorelease::Result<()> {
//! let identity = Identity::current()?;
//! repo.add(Path::new(".version"))?;
//! repo.commit("Updated for release v1.2.3", &identity)?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod identity;
pub mod mock;
pub mod repository;

pub use auth::RemoteAuth;
pub use identity::Identity;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Status code for an unmodified side of a file
pub const UNMODIFIED: char = ' ';
/// Status code for an untracked file
pub const UNTRACKED: char = '?';
pub const MODIFIED: char = 'M';
pub const ADDED: char = 'A';
pub const DELETED: char = 'D';
pub const RENAMED: char = 'R';
pub const CONFLICTED: char = 'U';

/// Per-file state: index side and worktree side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStatus {
    pub staging: char,
    pub worktree: char,
}

impl FileStatus {
    pub fn untracked() -> Self {
        FileStatus {
            staging: UNTRACKED,
            worktree: UNTRACKED,
        }
    }

    pub fn is_untracked(&self) -> bool {
        self.staging == UNTRACKED && self.worktree == UNTRACKED
    }
}

/// Changed files keyed by path relative to the repository root.
/// Clean files are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    entries: BTreeMap<String, FileStatus>,
}

impl WorktreeStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, status: FileStatus) {
        self.entries.insert(path.into(), status);
    }

    pub fn file(&self, path: &str) -> Option<&FileStatus> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, FileStatus)> for WorktreeStatus {
    fn from_iter<I: IntoIterator<Item = (String, FileStatus)>>(iter: I) -> Self {
        WorktreeStatus {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Repository gateway used by the release driver.
///
/// ## Error Handling
///
/// Methods return [crate::error::Result]; implementations map git failures to
/// `RepoIo` (status, staging, committing), `TagCreate` (tagging) and `Push`.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): real repository via `git2`
/// - [MockRepository](mock::MockRepository): in-memory test double
pub trait Repository {
    /// Root of the working tree; release files resolve against it
    fn workdir(&self) -> &Path;

    /// Changed and untracked files, ignored files excluded
    fn status(&self) -> Result<WorktreeStatus>;

    /// Stage a single path, relative to [Repository::workdir]
    fn add(&mut self, path: &Path) -> Result<()>;

    /// Commit the index on HEAD, author and committer set to `identity`
    fn commit(&mut self, message: &str, identity: &Identity) -> Result<()>;

    /// Whether `refs/tags/<tag>` exists (exact match)
    fn tag_exists(&self, tag: &str) -> Result<bool>;

    /// Create an annotated tag on the commit HEAD points to
    fn create_tag(&mut self, tag: &str, message: &str, tagger: &Identity) -> Result<()>;

    /// Push `refspecs` to `remote`; an empty list pushes the current branch
    fn push(&mut self, remote: &str, refspecs: &[&str], auth: Option<&RemoteAuth>) -> Result<()>;

    /// Look up SSH credentials for a push retry; never fails
    fn discover_auth(&self) -> Option<RemoteAuth>;
}

/// Express `path` relative to `workdir`.
///
/// Relative paths are returned unchanged; absolute paths must live inside
/// the working tree.
pub fn relative_to_workdir(workdir: &Path, path: &Path) -> Option<PathBuf> {
    if path.is_relative() {
        return Some(path.to_path_buf());
    }
    if let Ok(rel) = path.strip_prefix(workdir) {
        return Some(rel.to_path_buf());
    }
    let workdir = workdir.canonicalize().ok()?;
    let path = path.canonicalize().ok()?;
    path.strip_prefix(&workdir).ok().map(Path::to_path_buf)
}
