use git2::{Config, Cred, CredentialType, RemoteCallbacks};
use tracing::debug;

use crate::domain::value_objects::git_url::{GitUrl, Transport};

/// Give up after this many credential callbacks for one operation; libgit2 keeps
/// asking as long as the callback keeps answering.
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// How a clone authenticates against its remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Keys served by the running ssh-agent
    SshAgent { username: String },
    /// Whatever the user's git setup provides (credential helpers, default creds)
    Ambient,
}

impl AuthStrategy {
    /// Pick the strategy from the URL's transport: ssh-agent for ssh, ambient otherwise
    pub fn for_url(url: &GitUrl) -> Self {
        match url.transport() {
            Transport::Ssh => Self::SshAgent {
                username: url.user().unwrap_or("git").to_string(),
            },
            _ => Self::Ambient,
        }
    }

    /// Install the matching credentials callback
    pub fn install(&self, callbacks: &mut RemoteCallbacks<'_>) {
        let mut attempts = 0;
        match self {
            Self::SshAgent { username } => {
                let username = username.clone();
                callbacks.credentials(move |_url, username_from_url, allowed| {
                    attempts += 1;
                    if attempts > MAX_CREDENTIAL_ATTEMPTS {
                        return Err(git2::Error::from_str("ssh-agent authentication failed"));
                    }
                    let user = username_from_url.unwrap_or(username.as_str());
                    if allowed.contains(CredentialType::USERNAME) {
                        return Cred::username(user);
                    }
                    debug!("Requesting ssh key for {} from agent", user);
                    Cred::ssh_key_from_agent(user)
                });
            }
            Self::Ambient => {
                let config = Config::open_default().ok();
                callbacks.credentials(move |url, username_from_url, allowed| {
                    attempts += 1;
                    if attempts > MAX_CREDENTIAL_ATTEMPTS {
                        return Err(git2::Error::from_str("no usable credentials for remote"));
                    }
                    if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
                        if let Some(config) = &config {
                            return Cred::credential_helper(config, url, username_from_url);
                        }
                    }
                    if allowed.contains(CredentialType::DEFAULT) {
                        return Cred::default();
                    }
                    Err(git2::Error::from_str("no usable credentials for remote"))
                });
            }
        }
    }
}
