use std::path::PathBuf;

use crate::reflect::ReflectError;

/// Failure while drawing a single display item.
///
/// Rendering catches these per item and shows them inline, so one broken
/// member never blanks the rest of the inspector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("'{0}' has no readable value")]
    MissingValue(String),
    #[error("'{member}' is declared on a base type the instance does not expose (depth {depth})")]
    MissingOwner { member: String, depth: usize },
    #[error("nested value of '{0}' is not available")]
    MissingNested(String),
    #[error(transparent)]
    Reflect(#[from] ReflectError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to serialize inspector state: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to parse inspector state: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
