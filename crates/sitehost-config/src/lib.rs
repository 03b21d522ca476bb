pub mod error;
pub mod provider;

pub use error::*;
pub use provider::{
    ENV_API_ENDPOINT, ENV_API_KEY, ENV_CLIENT_ID, JobPollSettings, ProviderConfig,
};

use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a config file
pub const ENV_CONFIG_PATH: &str = "SITEHOST_CONFIG_PATH";

const CANDIDATES: [&str; 2] = ["sitehost.local.yaml", "sitehost.yaml"];

/// User-level config directory (`~/.config/sitehost`)
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("sitehost");

    Ok(config_dir)
}

/// Every location searched for a config file when running in `current_dir`,
/// in priority order.
///
/// `./sitehost.local.yaml` and `./sitehost.yaml` come first, then the same
/// two names under `./.sitehost/`, then `~/.config/sitehost/config.yaml`.
pub fn search_paths(current_dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = [current_dir.to_path_buf(), current_dir.join(".sitehost")]
        .iter()
        .flat_map(|dir| CANDIDATES.iter().map(move |name| dir.join(name)))
        .collect();

    if let Ok(config_dir) = get_config_dir() {
        paths.push(config_dir.join("config.yaml"));
    }
    paths
}

/// Find the provider config file, relative to the process working directory.
///
/// `SITEHOST_CONFIG_PATH` wins when it names an existing file.
pub fn find_config_file() -> Result<PathBuf> {
    find_config_file_in(&std::env::current_dir()?)
}

/// Same as [`find_config_file`], searching relative to `current_dir`.
pub fn find_config_file_in(current_dir: &Path) -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(config_path);
        if path.is_file() {
            return Ok(path);
        }
        tracing::warn!(
            "{} points at {}, which does not exist",
            ENV_CONFIG_PATH,
            path.display()
        );
    }

    let searched = search_paths(current_dir);
    match searched.iter().find(|path| path.is_file()) {
        Some(path) => {
            tracing::debug!("Using config file {}", path.display());
            Ok(path.clone())
        }
        None => Err(ConfigError::ConfigFileNotFound(searched)),
    }
}
