mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./asciimation.toml",
        "~/.config/asciimation/config.toml",
        "/etc/asciimation/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.keep_alive_secs == 0 {
        anyhow::bail!("Keep-alive interval cannot be 0");
    }

    // The movie is loaded for real at startup, missing files only warn here.
    if !config.server.index.exists() {
        tracing::warn!("Index page does not exist: {:?}", config.server.index);
    }
    if !config.movie.path.exists() {
        tracing::warn!("Movie file does not exist: {:?}", config.movie.path);
    }

    Ok(())
}
