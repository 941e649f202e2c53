use anyhow::Result;
use std::path::{Path, PathBuf};

/// Base path override, mainly for containers and tests.
pub fn base_path_override() -> Option<PathBuf> {
    std::env::var("MEDIALIST_BASE_PATH").map(PathBuf::from).ok()
}

pub struct PathManager {
    config_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        if let Some(base) = base_path_override() {
            return Ok(Self::with_base(base));
        }
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("medialist");
        Ok(Self::with_base(base_dir))
    }

    pub fn with_base(base: PathBuf) -> Self {
        Self {
            log_dir: base.join("logs"),
            config_dir: base,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn session_file(&self) -> PathBuf {
        self.config_dir.join("session.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("medialist.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::with_base(PathBuf::from(".medialist")))
    }
}
