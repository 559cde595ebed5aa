//! Project discovery.
//!
//! Resolves a [`ProjectContext`] in three steps:
//! 1. Ascend from the starting directory to the nearest `azure.yaml`
//! 2. Take the environment name from the explicit override, if any
//! 3. Otherwise read `defaultEnvironment` from `.azure/config.json`

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use super::context::{ProjectContext, CONFIG_FILE, ENVIRONMENT_DIRECTORY, PROJECT_FILE};
use super::descriptor::EnvironmentDescriptor;
use crate::error::{DotazureError, Result, Stage};
use crate::fs::{default_fs, normalize, FileSystem};

/// Options for resolving a [`ProjectContext`].
///
/// | Option | Default |
/// |---|---|
/// | starting directory | process current directory |
/// | environment name | `defaultEnvironment` from `.azure/config.json` |
/// | filesystem | [`OsFileSystem`](crate::fs::OsFileSystem) |
///
/// # Example
///
/// ```
/// use dotazure::fs::MemoryFileSystem;
/// use dotazure::{DotazureError, ProjectContext};
/// use std::sync::Arc;
///
/// let fs = MemoryFileSystem::new();
/// fs.write("/p/azure.yaml", "").unwrap();
///
/// // No .azure directory is needed when the environment is named explicitly.
/// let context = ProjectContext::builder()
///     .file_system(Arc::new(fs))
///     .current_directory("/p")
///     .environment_name("prod")
///     .build()
///     .unwrap();
/// assert_eq!(context.environment_name(), "prod");
///
/// let err = ProjectContext::builder().environment_name("").build().unwrap_err();
/// assert!(matches!(err, DotazureError::InvalidArgument { .. }));
/// ```
#[derive(Clone)]
pub struct ContextBuilder {
    current_directory: Option<PathBuf>,
    environment_name: Option<String>,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("current_directory", &self.current_directory)
            .field("environment_name", &self.environment_name)
            .finish_non_exhaustive()
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self {
            current_directory: None,
            environment_name: None,
            fs: default_fs(),
        }
    }

    /// Start the search from `path` instead of the current directory.
    ///
    /// Relative paths are resolved against the current directory.
    pub fn current_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.current_directory = Some(path.into());
        self
    }

    /// Use `name` instead of reading `defaultEnvironment`.
    pub fn environment_name(mut self, name: impl Into<String>) -> Self {
        self.environment_name = Some(name.into());
        self
    }

    /// Resolve against `fs` instead of the real filesystem.
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// The filesystem this builder resolves against.
    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Resolve the project context.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the environment name override is empty or the
    ///   starting directory is not a directory.
    /// - `NoProject` if no `azure.yaml` exists up to the filesystem root.
    /// - `ConfigNotFound` if `.azure` or `.azure/config.json` is missing.
    /// - `ConfigParse` if `config.json` is malformed.
    /// - `NoEnvironmentName` if `config.json` has no `defaultEnvironment`.
    /// - `Io` for any other filesystem failure.
    pub fn build(&self) -> Result<ProjectContext> {
        let environment_name = self.validated_environment_name()?;
        let start = self.starting_directory()?;
        let project_directory = find_project_directory(self.fs.as_ref(), &start)?;

        let environment_name = match environment_name {
            Some(name) => {
                debug!("Using environment '{}' from override", name);
                name
            }
            None => read_default_environment(self.fs.as_ref(), &project_directory)?,
        };

        Ok(ProjectContext::new(project_directory, environment_name))
    }

    fn validated_environment_name(&self) -> Result<Option<String>> {
        match &self.environment_name {
            Some(name) if name.trim().is_empty() => Err(DotazureError::InvalidArgument {
                message: "environment name cannot be empty".to_string(),
            }),
            other => Ok(other.clone()),
        }
    }

    fn starting_directory(&self) -> Result<PathBuf> {
        let Some(dir) = &self.current_directory else {
            return Ok(normalize(&current_dir()?));
        };

        let dir = if dir.is_absolute() {
            normalize(dir)
        } else {
            normalize(&current_dir()?.join(dir))
        };

        match self.fs.stat(&dir) {
            Ok(stat) if stat.is_dir() => Ok(dir),
            Ok(_) => Err(DotazureError::InvalidArgument {
                message: format!("{} is not a directory", dir.display()),
            }),
            Err(e) => Err(DotazureError::io(Stage::CheckingDirectory, dir, e)),
        }
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| DotazureError::io(Stage::CurrentDirectory, ".", e))
}

/// Find the nearest directory at or above `start` containing `azure.yaml`.
///
/// Only a regular file counts; a directory named `azure.yaml` is skipped
/// and the search continues with the parent.
///
/// # Errors
///
/// Returns `NoProject` once the filesystem root is passed without a match,
/// or `Io` if a candidate cannot be checked.
pub fn find_project_directory(fs: &dyn FileSystem, start: &Path) -> Result<PathBuf> {
    let mut search_dir = start.to_path_buf();

    loop {
        let project_path = search_dir.join(PROJECT_FILE);
        match fs.stat(&project_path) {
            Ok(stat) if stat.is_file() => {
                debug!("Found project at {}", search_dir.display());
                return Ok(search_dir);
            }
            Ok(_) => trace!("Skipping {}: not a regular file", project_path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("No {} in {}", PROJECT_FILE, search_dir.display())
            }
            Err(e) => return Err(DotazureError::io(Stage::SearchingProject, project_path, e)),
        }

        if !search_dir.pop() {
            return Err(DotazureError::NoProject {
                start: start.to_path_buf(),
            });
        }
    }
}

/// Read `defaultEnvironment` from `<project>/.azure/config.json`.
fn read_default_environment(fs: &dyn FileSystem, project_directory: &Path) -> Result<String> {
    let environment_directory = project_directory.join(ENVIRONMENT_DIRECTORY);
    match fs.stat(&environment_directory) {
        Ok(stat) if stat.is_dir() => {}
        Ok(_) => {
            return Err(DotazureError::ConfigNotFound {
                path: environment_directory,
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(DotazureError::ConfigNotFound {
                path: environment_directory,
            })
        }
        Err(e) => {
            return Err(DotazureError::io(
                Stage::CheckingConfig,
                environment_directory,
                e,
            ))
        }
    }

    let config_path = environment_directory.join(CONFIG_FILE);
    let content = fs.read_to_string(&config_path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            DotazureError::ConfigNotFound {
                path: config_path.clone(),
            }
        } else {
            DotazureError::io(Stage::ReadingConfig, &config_path, e)
        }
    })?;

    let descriptor = EnvironmentDescriptor::parse(&content, &config_path)?;
    match descriptor.default_environment() {
        Some(name) => {
            debug!("Using default environment '{}' from {}", name, config_path.display());
            Ok(name.to_string())
        }
        None => Err(DotazureError::NoEnvironmentName { path: config_path }),
    }
}
