//! `.azure/config.json` parsing.

use serde::Deserialize;
use std::path::Path;

use crate::error::{DotazureError, Result};

/// Contents of `.azure/config.json`.
///
/// Only `defaultEnvironment` is recognized; other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDescriptor {
    /// Environment used when no name is given explicitly.
    #[serde(default)]
    pub default_environment: Option<String>,
}

impl EnvironmentDescriptor {
    /// Parse descriptor JSON.
    ///
    /// # Arguments
    ///
    /// * `content` - The JSON content to parse
    /// * `source_path` - Path for error reporting
    pub fn parse(content: &str, source_path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| DotazureError::ConfigParse {
            path: source_path.to_path_buf(),
            source,
        })
    }

    /// The configured default environment, if set and non-empty.
    pub fn default_environment(&self) -> Option<&str> {
        self.default_environment
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}
