//! The resolved project context and the paths derived from it.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::resolver::ContextBuilder;

/// File whose presence marks a project root.
pub const PROJECT_FILE: &str = "azure.yaml";

/// Directory under the project root holding environment configuration.
pub const ENVIRONMENT_DIRECTORY: &str = ".azure";

/// Descriptor naming the default environment, inside [`ENVIRONMENT_DIRECTORY`].
pub const CONFIG_FILE: &str = "config.json";

/// Variables file inside each environment's directory.
pub const ENV_FILE: &str = ".env";

/// A resolved project directory and environment name.
///
/// Every path exposed here is derived from those two values on demand.
///
/// # Example
///
/// ```
/// use dotazure::fs::MemoryFileSystem;
/// use dotazure::ProjectContext;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let fs = MemoryFileSystem::new();
/// fs.write("/p/azure.yaml", "name: app").unwrap();
/// fs.write("/p/.azure/config.json", r#"{"defaultEnvironment":"dev"}"#).unwrap();
/// fs.write("/p/src/main.rs", "").unwrap();
///
/// let context = ProjectContext::builder()
///     .file_system(Arc::new(fs))
///     .current_directory("/p/src")
///     .build()
///     .unwrap();
///
/// assert_eq!(context.project_directory(), Path::new("/p"));
/// assert_eq!(context.environment_name(), "dev");
/// assert_eq!(context.environment_file(), Path::new("/p/.azure/dev/.env"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    project_directory: PathBuf,
    environment_name: String,
}

impl ProjectContext {
    /// Start building a context from the current directory.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Resolve a context with default options.
    ///
    /// Equivalent to `ProjectContext::builder().build()`.
    pub fn discover() -> crate::Result<Self> {
        ContextBuilder::new().build()
    }

    /// Assemble a context from already-validated parts.
    pub(crate) fn new(project_directory: PathBuf, environment_name: String) -> Self {
        Self {
            project_directory,
            environment_name,
        }
    }

    /// Directory containing `azure.yaml`.
    pub fn project_directory(&self) -> &Path {
        &self.project_directory
    }

    /// Path to `azure.yaml`.
    pub fn project_path(&self) -> PathBuf {
        self.project_directory.join(PROJECT_FILE)
    }

    /// Path to the `.azure` directory.
    pub fn environment_directory(&self) -> PathBuf {
        self.project_directory.join(ENVIRONMENT_DIRECTORY)
    }

    /// Path to `.azure/config.json`.
    pub fn config_path(&self) -> PathBuf {
        self.environment_directory().join(CONFIG_FILE)
    }

    /// Name of the active environment.
    pub fn environment_name(&self) -> &str {
        &self.environment_name
    }

    /// Path to the active environment's directory under `.azure`.
    pub fn environment_root(&self) -> PathBuf {
        self.environment_directory().join(&self.environment_name)
    }

    /// Path to the active environment's `.env` file.
    pub fn environment_file(&self) -> PathBuf {
        self.environment_root().join(ENV_FILE)
    }
}
