// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, Credentials, LoginOutcome};
use crate::config::Config;
use crate::errors::{TrackerError, TrackerResult};
use crate::models::UserProfile;
use crate::validate::validate_email;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Cached login: display profile plus the credentials to replay.
/// The backend stays the source of truth for both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    #[serde(default)]
    pub credentials: Credentials,
}

impl From<LoginOutcome> for Session {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            user: outcome.user,
            credentials: outcome.credentials,
        }
    }
}

/// Passed to every command that needs the logged-in user.
#[derive(Debug)]
pub struct AppContext {
    config: Config,
    session: Option<Session>,
}

impl AppContext {
    /// Reads `session.json` when present. A corrupt file is treated as
    /// logged out rather than an error.
    pub fn load(config: Config) -> TrackerResult<Self> {
        let path = config.session_path();
        let session = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable session cache");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Self { config, session })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn require_session(&self) -> TrackerResult<&Session> {
        self.session.as_ref().ok_or(TrackerError::NotLoggedIn)
    }

    /// Client carrying the cached credentials, if any.
    pub fn client(&self) -> TrackerResult<ApiClient> {
        let client = ApiClient::new(&self.config)?;
        Ok(match &self.session {
            Some(s) => client.with_credentials(s.credentials.clone()),
            None => client,
        })
    }

    /// Client for endpoints that need a logged-in user.
    pub fn authed_client(&self) -> TrackerResult<ApiClient> {
        self.require_session()?;
        self.client()
    }

    /// Starts a session after a successful login.
    pub fn begin(&mut self, session: Session) -> TrackerResult<()> {
        self.session = Some(session);
        self.persist()
    }

    /// Ends the session: drops the cache file and in-memory state.
    pub fn end(&mut self) -> TrackerResult<()> {
        self.session = None;
        match fs::remove_file(self.config.session_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Local edit of the display profile; nothing is sent to the backend.
    pub fn update_profile(
        &mut self,
        full_name: Option<&str>,
        email: Option<&str>,
        avatar_url: Option<Option<String>>,
    ) -> TrackerResult<&UserProfile> {
        let session = self.session.as_mut().ok_or(TrackerError::NotLoggedIn)?;
        let mut updated = session.user.clone();
        if let Some(name) = full_name {
            updated.full_name = name.trim().to_string();
        }
        if let Some(mail) = email {
            updated.email = mail.trim().to_string();
        }
        if let Some(url) = avatar_url {
            updated.profile_image_url = url;
        }
        if updated.full_name.is_empty() || updated.email.is_empty() {
            return Err(TrackerError::validation("Name and email are required"));
        }
        validate_email(&updated.email)?;
        session.user = updated;
        self.persist()?;
        self.user().ok_or(TrackerError::NotLoggedIn)
    }

    fn persist(&self) -> TrackerResult<()> {
        let path = self.config.session_path();
        match &self.session {
            Some(s) => {
                fs::create_dir_all(&self.config.data_dir)?;
                write_private(&path, serde_json::to_string_pretty(s)?.as_bytes())?;
                tracing::debug!(path = %path.display(), "session cached");
            }
            None => {
                if path.exists() {
                    fs::remove_file(&path)?;
                }
            }
        }
        Ok(())
    }
}

/// Writes `bytes` to `path`, readable by the owner only on unix.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut opts = fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path)?;
    // mode() only applies when the file is created.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(bytes)?;
    file.flush()
}

/// Up to two initials from the display name, `U` when there is none.
pub fn initials(full_name: &str) -> String {
    let letters: String = full_name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if letters.is_empty() {
        "U".to_string()
    } else {
        letters
    }
}

/// Resolves a relative avatar path against the backend host.
pub fn avatar_url(config: &Config, stored: &str) -> String {
    if stored.starts_with("http://") || stored.starts_with("https://") {
        return stored.to_string();
    }
    let host = config
        .backend_url
        .strip_suffix("/api")
        .unwrap_or(&config.backend_url);
    format!("{}/{}", host, stored.replace('\\', "/").trim_start_matches('/'))
}
