use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GIT_USER;

/// SSH key credential for retrying a failed push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAuth {
    pub username: String,
    pub private_key: PathBuf,
}

impl RemoteAuth {
    pub fn new(username: impl Into<String>, private_key: impl Into<PathBuf>) -> Self {
        RemoteAuth {
            username: username.into(),
            private_key: private_key.into(),
        }
    }
}

/// Look for `~/.ssh/id_rsa`; any failure yields `None`.
pub fn discover() -> Option<RemoteAuth> {
    let home = dirs::home_dir()?;
    from_home(&home)
}

/// Key discovery relative to an explicit home directory.
pub fn from_home(home: &Path) -> Option<RemoteAuth> {
    let key = home.join(".ssh").join("id_rsa");
    let contents = fs::read(&key).ok()?;
    if contents.is_empty() {
        return None;
    }
    Some(RemoteAuth::new(GIT_USER, key))
}
