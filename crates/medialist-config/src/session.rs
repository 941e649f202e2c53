use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Supplies the bearer credential and current user identity.
///
/// Login/logout lifecycle is out of scope here; callers treat a `None` token
/// as a precondition failure and do not attempt network requests.
pub trait SessionProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
    fn user_id(&self) -> Option<String>;
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct SessionData {
    token: Option<String>,
    user_id: Option<String>,
    saved_at: Option<DateTime<Utc>>,
}

/// Bearer token + user id persisted as TOML under the config dir.
pub struct SessionStore {
    path: PathBuf,
    data: SessionData,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: SessionData::default(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            self.data = toml::from_str(&content)?;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn set_session(&mut self, token: String, user_id: String) {
        self.data.token = Some(token);
        self.data.user_id = Some(user_id);
        self.data.saved_at = Some(Utc::now());
    }

    pub fn clear(&mut self) -> Result<()> {
        self.data = SessionData::default();
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.data.token.is_some() && self.data.user_id.is_some()
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.data.saved_at
    }
}

impl SessionProvider for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.data.token.clone()
    }

    fn user_id(&self) -> Option<String> {
        self.data.user_id.clone()
    }
}
