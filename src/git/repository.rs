use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use git2::{ErrorCode, ObjectType, Repository as Git2Repo, Status, StatusOptions};

use crate::error::{ReleaseError, Result};
use crate::git::{
    auth, relative_to_workdir, FileStatus, Identity, RemoteAuth, WorktreeStatus, ADDED,
    CONFLICTED, DELETED, MODIFIED, RENAMED, UNMODIFIED, UNTRACKED,
};

/// Wrapper around git2::Repository with our gateway interface
pub struct Git2Repository {
    repo: Git2Repo,
    workdir: PathBuf,
}

impl Git2Repository {
    /// Discover the repository containing `path`, walking upwards
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            ReleaseError::RepoNotFound(format!("{} ({})", path.display(), e.message()))
        })?;
        Self::from_git2(repo)
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Result<Self> {
        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::RepoNotFound("bare repository has no worktree".into()))?;
        Ok(Git2Repository { repo, workdir })
    }

    pub fn inner(&self) -> &Git2Repo {
        &self.repo
    }

    fn current_branch_refspec(&self, remote: &str) -> Result<String> {
        let head = self
            .repo
            .head()
            .map_err(|e| ReleaseError::push(remote, format!("cannot resolve HEAD: {}", e)))?;
        if !head.is_branch() {
            return Err(ReleaseError::push(remote, "HEAD is detached, no branch to push"));
        }
        let name = head
            .name()
            .ok_or_else(|| ReleaseError::push(remote, "branch name is not valid UTF-8"))?;
        Ok(format!("{}:{}", name, name))
    }

    /// Expand `refs/tags/*:refs/tags/*` style refspecs against local references.
    fn expand_refspecs(&self, refspecs: &[&str]) -> Result<Vec<String>> {
        let mut expanded = Vec::new();
        for spec in refspecs {
            let (force, body) = match spec.strip_prefix('+') {
                Some(rest) => ("+", rest),
                None => ("", *spec),
            };
            let Some((src, dst)) = body.split_once(':') else {
                expanded.push(spec.to_string());
                continue;
            };
            if !src.contains('*') {
                expanded.push(spec.to_string());
                continue;
            }

            let (src_prefix, src_suffix) = src.split_once('*').unwrap_or((src, ""));
            let mut references = self
                .repo
                .references_glob(src)
                .map_err(|e| ReleaseError::push("local", format!("listing {}: {}", src, e)))?;
            for name in references.names() {
                let name = name
                    .map_err(|e| ReleaseError::push("local", format!("reading {}: {}", src, e)))?;
                let matched = &name[src_prefix.len()..name.len() - src_suffix.len()];
                expanded.push(format!("{}{}:{}", force, name, dst.replacen('*', matched, 1)));
            }
        }
        Ok(expanded)
    }
}

fn status_codes(status: Status) -> FileStatus {
    if status.contains(Status::WT_NEW) && !status.intersects(index_flags()) {
        return FileStatus::untracked();
    }
    if status.contains(Status::CONFLICTED) {
        return FileStatus {
            staging: CONFLICTED,
            worktree: CONFLICTED,
        };
    }

    let staging = if status.contains(Status::INDEX_NEW) {
        ADDED
    } else if status.contains(Status::INDEX_DELETED) {
        DELETED
    } else if status.contains(Status::INDEX_RENAMED) {
        RENAMED
    } else if status.intersects(Status::INDEX_MODIFIED | Status::INDEX_TYPECHANGE) {
        MODIFIED
    } else {
        UNMODIFIED
    };

    let worktree = if status.contains(Status::WT_DELETED) {
        DELETED
    } else if status.contains(Status::WT_RENAMED) {
        RENAMED
    } else if status.intersects(Status::WT_MODIFIED | Status::WT_TYPECHANGE) {
        MODIFIED
    } else if status.contains(Status::WT_NEW) {
        UNTRACKED
    } else {
        UNMODIFIED
    };

    FileStatus { staging, worktree }
}

fn index_flags() -> Status {
    Status::INDEX_NEW
        | Status::INDEX_MODIFIED
        | Status::INDEX_DELETED
        | Status::INDEX_RENAMED
        | Status::INDEX_TYPECHANGE
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn status(&self) -> Result<WorktreeStatus> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .map_err(|e| ReleaseError::repo_io("repository status", e))?;

        Ok(statuses
            .iter()
            .filter(|entry| !entry.status().contains(Status::IGNORED))
            .filter_map(|entry| {
                let path = entry.path()?.to_string();
                Some((path, status_codes(entry.status())))
            })
            .collect())
    }

    fn add(&mut self, path: &Path) -> Result<()> {
        let rel = relative_to_workdir(&self.workdir, path).ok_or_else(|| {
            ReleaseError::repo_io(
                format!("adding {}", path.display()),
                git2::Error::from_str("path is outside the repository"),
            )
        })?;

        let mut index = self
            .repo
            .index()
            .map_err(|e| ReleaseError::repo_io("reading index", e))?;
        index
            .add_path(&rel)
            .map_err(|e| ReleaseError::repo_io(format!("adding {}", rel.display()), e))?;
        index
            .write()
            .map_err(|e| ReleaseError::repo_io("writing index", e))?;
        Ok(())
    }

    fn commit(&mut self, message: &str, identity: &Identity) -> Result<()> {
        let signature = identity.signature()?;

        let mut index = self
            .repo
            .index()
            .map_err(|e| ReleaseError::repo_io("reading index", e))?;
        let tree_id = index
            .write_tree()
            .map_err(|e| ReleaseError::repo_io("writing tree", e))?;
        let tree = self
            .repo
            .find_tree(tree_id)
            .map_err(|e| ReleaseError::repo_io("committing files", e))?;

        let parent = match self.repo.head() {
            Ok(head) => Some(
                head.peel_to_commit()
                    .map_err(|e| ReleaseError::repo_io("committing files", e))?,
            ),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(ReleaseError::repo_io("committing files", e)),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(|e| ReleaseError::repo_io("committing files", e))?;
        Ok(())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", tag)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(ReleaseError::tag(format!(
                "Cannot look up tag '{}': {}",
                tag, e
            ))),
        }
    }

    fn create_tag(&mut self, tag: &str, message: &str, tagger: &Identity) -> Result<()> {
        let signature = tagger.signature()?;

        let target = self
            .repo
            .head()
            .and_then(|head| head.peel(ObjectType::Commit))
            .map_err(|e| ReleaseError::tag(format!("get HEAD error: {}", e)))?;

        self.repo
            .tag(tag, &target, &signature, message, false)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", tag, e)))?;
        Ok(())
    }

    fn push(&mut self, remote_name: &str, refspecs: &[&str], auth: Option<&RemoteAuth>) -> Result<()> {
        let refspecs = if refspecs.is_empty() {
            vec![self.current_branch_refspec(remote_name)?]
        } else {
            self.expand_refspecs(refspecs)?
        };
        if refspecs.is_empty() {
            return Ok(());
        }

        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|e| ReleaseError::push(remote_name, format!("Cannot find remote: {}", e)))?;

        let tried_key = Cell::new(false);
        let tried_agent = Cell::new(false);
        let tried_default = Cell::new(false);
        let rejected = RefCell::new(Vec::new());

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            let username = username_from_url.unwrap_or(crate::config::GIT_USER);

            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Some(auth) = auth {
                    if !tried_key.replace(true) {
                        let user = username_from_url.unwrap_or(&auth.username);
                        return git2::Cred::ssh_key(user, None, &auth.private_key, None);
                    }
                } else if !tried_agent.replace(true) {
                    return git2::Cred::ssh_key_from_agent(username);
                }
            }

            if allowed_types.contains(git2::CredentialType::USERNAME) {
                return git2::Cred::username(username);
            }

            if !tried_default.replace(true) {
                return git2::Cred::default();
            }
            Err(git2::Error::from_str("no more credentials to try"))
        });

        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                rejected
                    .borrow_mut()
                    .push(format!("{} ({})", refname, status));
            }
            Ok(())
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        let result = remote.push(&refspecs, Some(&mut push_options));
        drop(push_options);

        match result {
            Ok(()) => {
                let rejected = rejected.into_inner();
                if rejected.is_empty() {
                    Ok(())
                } else {
                    Err(ReleaseError::push(
                        remote_name,
                        format!("rejected {}", rejected.join(", ")),
                    ))
                }
            }
            Err(e) if e.class() == git2::ErrorClass::Net => Err(ReleaseError::push(
                remote_name,
                format!("Network error during push: {}", e),
            )),
            Err(e) if e.class() == git2::ErrorClass::Reference => Err(ReleaseError::push(
                remote_name,
                format!("Reference error during push: {}", e),
            )),
            Err(e) => Err(ReleaseError::push(remote_name, e.to_string())),
        }
    }

    fn discover_auth(&self) -> Option<RemoteAuth> {
        auth::discover()
    }
}
