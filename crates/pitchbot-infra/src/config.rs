//! Configuration loader for Pitchbot.
//!
//! Looks for the config file in order: an explicit `--config` path,
//! `./pitchbot.toml`, then `{data_dir}/config.toml`. The first file that
//! exists wins. Missing or malformed files fall back to defaults.

use std::path::{Path, PathBuf};

use pitchbot_types::config::AppConfig;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "pitchbot.toml";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PITCHBOT_DATA_DIR` environment variable
/// 2. `~/.pitchbot`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PITCHBOT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".pitchbot");
    }

    PathBuf::from(".pitchbot")
}

/// Candidate config paths, most specific first.
pub fn config_candidates(explicit: Option<&Path>, data_dir: &Path) -> Vec<PathBuf> {
    match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => vec![PathBuf::from(LOCAL_CONFIG_FILE), data_dir.join("config.toml")],
    }
}

/// Load [`AppConfig`] from the first existing candidate.
///
/// - No file found: returns [`AppConfig::default()`].
/// - File found but unreadable or unparseable: logs a warning and returns the default.
pub async fn load_app_config(explicit: Option<&Path>, data_dir: &Path) -> AppConfig {
    for path in config_candidates(explicit, data_dir) {
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if explicit.is_some() {
                    tracing::warn!("Config file {} not found, using defaults", path.display());
                } else {
                    tracing::debug!("No config at {}", path.display());
                }
                continue;
            }
            Err(err) => {
                tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
                return AppConfig::default();
            }
        };

        return match toml::from_str::<AppConfig>(&content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
                AppConfig::default()
            }
        };
    }

    AppConfig::default()
}
