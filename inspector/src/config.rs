//! Inspector configuration, loaded from `inspector.toml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::expr::EvalOptions;

/// Settings shared by every inspector instance of a host.
///
/// ```toml
/// enabled = true
/// always_use_inspector = false
/// max_depth = 8
/// stop_types = ["EditorWindow"]
/// dotted_names = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Master switch. When off, hosts draw the default inspector.
    pub enabled: bool,
    /// Use the annotated layout even for types without annotations.
    pub always_use_inspector: bool,
    /// Maximum nesting depth of expanded composite members.
    pub max_depth: usize,
    /// Base types at which the member scan stops, in addition to types
    /// flagged as framework roots.
    pub stop_types: Vec<String>,
    /// Allow `a.b` member paths in info box expressions.
    pub dotted_names: bool,
    /// Tint the background of members that are not serialized.
    pub tint_non_serialized: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            always_use_inspector: false,
            max_depth: 8,
            stop_types: Vec::new(),
            dotted_names: true,
            tint_non_serialized: true,
        }
    }
}

impl InspectorConfig {
    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            dotted_names: self.dotted_names,
        }
    }

    pub fn stops_at(&self, type_name: &str) -> bool {
        self.stop_types.iter().any(|t| t == type_name)
    }
}

/// Load an inspector config from a TOML file.
pub fn load_config(path: &Path) -> Result<InspectorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config, falling back to defaults if the file is missing or bad.
pub fn load_or_default(path: &Path) -> InspectorConfig {
    match load_config(path) {
        Ok(config) => {
            log::info!("Loaded inspector config from {}", path.display());
            config
        }
        Err(ConfigError::Read { .. }) => {
            log::info!("No inspector config at {}, using defaults", path.display());
            InspectorConfig::default()
        }
        Err(e) => {
            log::warn!("{e}, using defaults");
            InspectorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config: InspectorConfig = toml::from_str("max_depth = 3").unwrap();
        assert_eq!(config.max_depth, 3);
        assert!(config.enabled);
        assert!(config.stop_types.is_empty());
    }

    #[test]
    fn parses_stop_types() {
        let config: InspectorConfig =
            toml::from_str("enabled = false\nstop_types = [\"EditorWindow\"]").unwrap();
        assert!(!config.enabled);
        assert!(config.stops_at("EditorWindow"));
        assert!(!config.stops_at("Player"));
    }

    #[test]
    fn unreadable_file_falls_back() {
        let config = load_or_default(Path::new("/nonexistent/inspector.toml"));
        assert_eq!(config, InspectorConfig::default());
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let dir = std::env::temp_dir().join("redlilium-inspector-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "max_depth = \"deep\"").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }
}
