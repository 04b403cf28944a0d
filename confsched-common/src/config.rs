//! Configuration loading and data root resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no CLI argument is given
pub const DATA_ROOT_ENV_VAR: &str = "CONFSCHED_DATA";

/// Working subdirectories under the data root, populated by the one-shot
/// extraction step from the raw conference inputs.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the hand-authored order files
    pub fn order_dir(&self) -> PathBuf {
        self.root.join("order")
    }

    /// Directory holding the `<event>_id_map.txt` mapping files
    pub fn mapping_dir(&self) -> PathBuf {
        self.root.join("mapping")
    }

    /// Directory holding the bibliographic anthology XML files
    pub fn xml_dir(&self) -> PathBuf {
        self.root.join("xml")
    }

    /// Directory holding the `<event>_extra.tsv` fallback metadata files
    pub fn extra_dir(&self) -> PathBuf {
        self.root.join("extra")
    }
}

/// Data root resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `CONFSCHED_DATA` environment variable
/// 3. TOML config file (`data_root` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_root(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_ROOT_ENV_VAR) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Some(data_root) = data_root_from_config(&config_path) {
            return data_root;
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_root()
}

/// Read the `data_root` key from a TOML config file. An unreadable or
/// malformed file (or a missing key) falls through to the next tier.
fn data_root_from_config(path: &Path) -> Option<PathBuf> {
    let toml_content = std::fs::read_to_string(path).ok()?;
    let config = toml::from_str::<toml::Value>(&toml_content).ok()?;
    let data_root = config.get("data_root")?.as_str()?;
    Some(PathBuf::from(data_root))
}

/// Get default configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        // Try ~/.config/confsched/config.toml first, then /etc/confsched/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("confsched").join("config.toml"));
        let system_config = PathBuf::from("/etc/confsched/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else {
        dirs::config_dir()
            .map(|d| d.join("confsched").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default data root path
fn default_data_root() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("confsched"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\confsched"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("confsched"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/confsched"))
    } else {
        // ~/.local/share/confsched (or /var/lib/confsched for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("confsched"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/confsched"))
    }
}
