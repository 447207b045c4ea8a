//! Configuration loader for Hookline.
//!
//! Reads `config.toml` from the data directory (`~/.hookline/` in
//! production) and deserializes it into [`HooklineConfig`]. Falls back to
//! the shipped defaults when the file is missing or malformed; a bad
//! config file must never stop executions.

use std::path::Path;

use hookline_types::tier::TierTable;
use serde::{Deserialize, Serialize};

/// Deployment configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HooklineConfig {
    /// Per-tier limits; overrides the shipped table wholesale.
    pub tiers: TierTable,
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file returns [`HooklineConfig::default()`].
/// - Unreadable or unparsable file logs a warning and returns the
///   default.
pub async fn load_config(data_dir: &Path) -> HooklineConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return HooklineConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return HooklineConfig::default();
        }
    };

    match toml::from_str::<HooklineConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            HooklineConfig::default()
        }
    }
}
