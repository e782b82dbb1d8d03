use ini::{Ini, Properties};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Environment variable that overrides the registry file location
pub const CONFIG_ENV: &str = "BMO_CONFIG";

/// Registry file name inside the home directory
pub const DEFAULT_CONFIG_FILE: &str = ".bmoconfig";

/// Configuration store related errors
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("unable to determine home directory for the default config file")]
    HomeDirectoryNotFound,

    #[error("unable to read config file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("unable to write config file {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// INI file holding the workspace registry
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the registry location: explicit path, then `BMO_CONFIG`, then `~/.bmoconfig`
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ConfigStoreError> {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(Self::new(path));
        }
        Self::default_path().map(Self::new)
    }

    /// `~/.bmoconfig`
    pub fn default_path() -> Result<PathBuf, ConfigStoreError> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_CONFIG_FILE))
            .ok_or(ConfigStoreError::HomeDirectoryNotFound)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the store, creating an empty document when the file does not exist.
    ///
    /// Section names and keys are lower-cased.
    pub fn load(&self) -> Result<Ini, ConfigStoreError> {
        if !self.path.exists() {
            debug!("Config file {} not found, starting empty", self.path.display());
            return Ok(Ini::new());
        }

        let raw = Ini::load_from_file(&self.path).map_err(|e| ConfigStoreError::ReadFailed {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Loaded config file {}", self.path.display());

        Ok(lowercase_keys(&raw))
    }

    /// Write the whole document atomically: a temp file in the same directory is
    /// renamed over the target.
    pub fn save(&self, ini: &Ini) -> Result<(), ConfigStoreError> {
        let write_err = |message: String| ConfigStoreError::WriteFailed {
            path: self.path.display().to_string(),
            message,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut buffer = Vec::new();
        ini.write_to(&mut buffer)
            .map_err(|e| write_err(e.to_string()))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| write_err(e.to_string()))?;
        temp.write_all(&buffer)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| write_err(e.to_string()))?;
        temp.persist(&self.path)
            .map_err(|e| write_err(e.error.to_string()))?;

        debug!("Saved config file {}", self.path.display());
        Ok(())
    }
}

fn lowercase_keys(raw: &Ini) -> Ini {
    let mut ini = Ini::new();
    for (section, properties) in raw.iter() {
        let section = section.map(str::to_lowercase);
        let target = ini.entry(section).or_insert(Properties::new());
        for (key, value) in properties.iter() {
            target.insert(key.to_lowercase(), value);
        }
    }
    ini
}
