//! Session secret storage - versioned JSON file

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::AuthTokens;
use crate::error::{ClientError, ClientResult};

/// Current on-disk schema version
pub const SECRET_VERSION: u32 = 1;

/// Bearer/refresh token pair kept between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Secret {
    pub version: u32,
    /// Full `Authorization` header value ("Bearer ...")
    pub bearer_token: String,
    pub refresh_token: String,
    pub fetched_at: DateTime<Utc>,
}

impl Secret {
    pub fn new(bearer_token: String, refresh_token: String) -> Self {
        Self {
            version: SECRET_VERSION,
            bearer_token,
            refresh_token,
            fetched_at: Utc::now(),
        }
    }
}

impl From<AuthTokens> for Secret {
    fn from(tokens: AuthTokens) -> Self {
        Self::new(tokens.bearer_token, tokens.refresh_token)
    }
}

/// Secret file store
#[derive(Debug, Clone)]
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Save the secret, replacing any previous one
    pub fn save(&self, secret: &Secret) -> ClientResult<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(secret)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Load the stored secret.
    ///
    /// `Ok(None)` when no file exists; a corrupt file or a schema version this
    /// build does not know is an error.
    pub fn load(&self) -> ClientResult<Option<Secret>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        let secret: Secret = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::Secret(format!("{}: {}", self.path.display(), e)))?;
        if secret.version != SECRET_VERSION {
            return Err(ClientError::Secret(format!(
                "unsupported secret version {} (expected {})",
                secret.version, SECRET_VERSION
            )));
        }
        Ok(Some(secret))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn delete(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
