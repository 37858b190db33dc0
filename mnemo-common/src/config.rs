//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "MNEMO_ROOT";

/// Default HTTP port for the journal server
pub const DEFAULT_PORT: u16 = 3000;

/// Optional TOML configuration file contents
///
/// Every field is optional; a missing or unreadable file is not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub port: Option<u16>,
}

impl TomlConfig {
    /// Parse configuration text
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load the first config file found in the platform search path
    pub fn load() -> Option<Self> {
        let path = config_file_path().ok()?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not read config file {}: {}", path.display(), e);
                return None;
            }
        };
        match Self::parse(&text) {
            Ok(config) => {
                debug!("Loaded config file {}", path.display());
                Some(config)
            }
            Err(e) => {
                warn!("Ignoring malformed config file {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Root folder resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: Option<&TomlConfig>,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(root) = toml_config.and_then(|c| c.root_folder.clone()) {
        return root;
    }

    default_root_folder()
}

/// Get default configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mnemo").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/mnemo/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mnemo"))
        .unwrap_or_else(|| PathBuf::from("./mnemo_data"))
}

/// On-disk layout below the resolved root folder
///
/// ```text
/// <root>/memories.db
/// <root>/public/           static front end
/// <root>/public/music/     track library
/// <root>/public/uploads/   uploaded memory images
/// ```
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root, public, music and upload directories if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(self.music_dir())?;
        std::fs::create_dir_all(self.uploads_dir())?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join("memories.db")
    }

    pub fn public_dir(&self) -> PathBuf {
        self.root.join("public")
    }

    pub fn music_dir(&self) -> PathBuf {
        self.public_dir().join("music")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir().join("uploads")
    }
}
