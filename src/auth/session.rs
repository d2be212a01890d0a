use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::claims::{decode_claims, Claims, ClaimsError};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// The current token pair plus who it was issued to.
///
/// Persisted as a single JSON document so the access and refresh tokens are
/// always written and removed together - there is no half-authenticated
/// on-disk state. Decoded claims are derived from the access token on demand
/// and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

pub struct Session {
    data_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            data: None,
        }
    }

    /// Load a previously saved session from disk. Returns whether one was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionData =
                serde_json::from_str(&contents).context("Failed to parse session file")?;
            self.data = Some(data);
            return Ok(true);
        }
        Ok(false)
    }

    /// Save the current session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Drop the session in memory and on disk. Both tokens go together.
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Replace the in-memory session data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Complete a login callback: validate the token shape, decode the
    /// payload, and persist the new session.
    ///
    /// Returns the subject identifier from the token. Nothing is persisted
    /// until the token has decoded successfully; on failure any existing
    /// session is cleared as well, so storage never holds a token that
    /// failed validation.
    pub fn complete_login(&mut self, token: &str, refresh_token: Option<&str>) -> Result<String> {
        match Self::subject_of(token) {
            Ok(subject) => {
                self.update(SessionData {
                    access_token: token.to_string(),
                    refresh_token: refresh_token.map(str::to_string),
                    user_id: subject.clone(),
                    created_at: Utc::now(),
                });
                self.save()?;
                debug!(user_id = %subject, "login callback completed");
                Ok(subject)
            }
            Err(e) => {
                self.clear()?;
                Err(e.into())
            }
        }
    }

    fn subject_of(token: &str) -> Result<String, ClaimsError> {
        // Login callbacks must carry a full three-segment token; a bare
        // header.payload pair is not accepted here.
        if token.split('.').count() != 3 {
            return Err(ClaimsError::MalformedToken);
        }
        let claims = decode_claims(token)?;
        claims
            .subject()
            .map(str::to_string)
            .ok_or(ClaimsError::MissingClaim("sub"))
    }

    /// Swap in a rotated token pair after a successful refresh
    pub fn rotate_tokens(&mut self, access_token: String, refresh_token: String) -> Result<()> {
        if let Some(ref mut data) = self.data {
            data.access_token = access_token;
            data.refresh_token = Some(refresh_token);
        }
        self.save()
    }

    /// Get the bearer token if a session is held
    pub fn access_token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.access_token.as_str())
    }

    /// Get the refresh token if one was issued
    pub fn refresh_token(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.refresh_token.as_deref())
    }

    /// Get the user ID if a session is held
    pub fn user_id(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.user_id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.is_some()
    }

    /// Decode the identity claims from the current access token.
    /// Derived, never stored; `None` when logged out or undecodable.
    pub fn claims(&self) -> Option<Claims> {
        decode_claims(self.access_token()?).ok()
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}
