//! Loads a monitoring configuration file into a [`ConfigTree`].

use std::{fs, path::Path};

use thiserror::Error;

use super::view::ConfigTree;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// The file could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The file content is not a valid configuration document.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] config::ConfigError),

    /// The file extension is not a supported configuration format.
    #[error("Unsupported configuration format")]
    UnsupportedFormat,
}

/// Reads a YAML configuration file into a tree view.
///
/// Only `.yaml`/`.yml` files are accepted; the builders consume the returned
/// tree through the [`ConfigView`](super::ConfigView) capability.
pub fn load_config_tree(path: &Path) -> Result<ConfigTree, ConfigFileError> {
    if !is_yaml_file(path) {
        return Err(ConfigFileError::UnsupportedFormat);
    }

    let source = fs::read_to_string(path)?;
    Ok(ConfigTree::from_yaml_str(&source)?)
}

/// Checks if the file has a YAML extension.
fn is_yaml_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("yaml") | Some("yml"))
}
