use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::ApiError;
use crate::models::{CurrentUser, Session};

/// File-backed session written after a successful login
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session, returning None when missing or unreadable
    pub fn load(&self) -> Option<Session> {
        if !self.path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring malformed session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), ApiError> {
        let content = serde_json::to_string_pretty(session)
            .map_err(|e| ApiError::Session(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, content)?;
        info!("Saved session to {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ApiError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            debug!("Removed session file {}", self.path.display());
        }
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.load().and_then(|s| s.token)
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.load().and_then(|s| s.user)
    }
}
