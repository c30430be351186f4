//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use archviz::{ArchvizError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for ArchvizError {
    fn from(err: ConfigError) -> Self {
        let kind = match err {
            ConfigError::Validation(_) => return ArchvizError::Style(err.to_string()),
            ConfigError::MissingFile(_) => io::ErrorKind::NotFound,
            ConfigError::Parse(_) => io::ErrorKind::InvalidData,
        };
        ArchvizError::Io(io::Error::new(kind, err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (archviz/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or holds invalid colors
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ArchvizError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("archviz/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "archviz", "archviz") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load and validate configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, ArchvizError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate(&config)?;
    Ok(config)
}

/// Checks the values that are only parsed lazily by the library.
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let style = config.style();
    style.background_color().map_err(ConfigError::Validation)?;
    style.edge_color().map_err(ConfigError::Validation)?;
    style
        .cluster_background_color()
        .map_err(ConfigError::Validation)?;

    let layout = config.layout();
    for (name, spacing) in [
        ("node_spacing", layout.node_spacing()),
        ("rank_spacing", layout.rank_spacing()),
    ] {
        if let Some(spacing) = spacing.filter(|value| !value.is_finite() || *value < 0.0) {
            return Err(ConfigError::Validation(format!(
                "{name} must be a non-negative number of inches, got {spacing}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use archviz::semantic::LayoutEngine;

    use super::*;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = config_file(
            r##"
            [layout]
            engine = "basic"
            node_spacing = 1.0

            [style]
            background_color = "#FFFFFF"
            font_family = "Helvetica"
            "##,
        );

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.layout().engine(), LayoutEngine::Basic);
        assert_eq!(config.layout().node_spacing(), Some(1.0));
        assert_eq!(config.layout().rank_spacing(), None);
        assert_eq!(config.style().font_family(), Some("Helvetica"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = config_file("");
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.layout().engine(), LayoutEngine::Sugiyama);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("/nonexistent/archviz.toml")).unwrap_err();
        assert!(matches!(&err, ArchvizError::Io(source) if source.kind() == io::ErrorKind::NotFound));
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_toml() {
        let file = config_file("[layout\nengine = ");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(&err, ArchvizError::Io(source) if source.kind() == io::ErrorKind::InvalidData));
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_unknown_engine() {
        let file = config_file("[layout]\nengine = \"force\"\n");
        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    fn test_invalid_color_fails_validation() {
        let file = config_file("[style]\nedge_color = \"not-a-color\"\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ArchvizError::Style(_)));
        assert!(err.to_string().contains("Validation error"));
    }

    #[test]
    fn test_negative_spacing_fails_validation() {
        let file = config_file("[layout]\nrank_spacing = -0.5\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("rank_spacing"));
    }
}
