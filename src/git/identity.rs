use std::env;

use crate::error::{ReleaseError, Result};

const FALLBACK_USER: &str = "unknown";

/// Author and tagger identity: the OS user at the current time.
#[derive(Clone)]
pub struct Identity {
    pub name: String,
    pub when: git2::Time,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("name", &self.name)
            .field("when", &self.when.seconds())
            .finish()
    }
}

impl Identity {
    /// Resolve the current OS user with the wall-clock time.
    pub fn current() -> Result<Self> {
        Self::named(os_user_name())
    }

    pub fn named(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let now = git2::Signature::now(&name, "gorelease@localhost")
            .map_err(|e| ReleaseError::repo_io("getting current user", e))?
            .when();
        Ok(Identity { name, when: now })
    }

    /// git2 signature; libgit2 refuses an empty e-mail, so a local placeholder is used.
    pub fn signature(&self) -> Result<git2::Signature<'static>> {
        let email = format!("{}@localhost", self.name.replace(char::is_whitespace, "."));
        git2::Signature::new(&self.name, &email, &self.when)
            .map_err(|e| ReleaseError::repo_io("building signature", e))
    }
}

fn os_user_name() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| FALLBACK_USER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_current_uses_user_env() {
        let previous = env::var_os("USER");
        env::set_var("USER", "releaser");

        let identity = Identity::current().unwrap();

        match previous {
            Some(value) => env::set_var("USER", value),
            None => env::remove_var("USER"),
        }
        assert_eq!(identity.name, "releaser");
    }

    #[test]
    fn test_signature_email_fallback() {
        let identity = Identity::named("Jane Doe").unwrap();
        let sig = identity.signature().unwrap();
        assert_eq!(sig.name(), Some("Jane Doe"));
        assert_eq!(sig.email(), Some("Jane.Doe@localhost"));
    }

    #[test]
    fn test_signature_keeps_time() {
        let identity = Identity::named("releaser").unwrap();
        let sig = identity.signature().unwrap();
        assert_eq!(sig.when().seconds(), identity.when.seconds());
    }
}
