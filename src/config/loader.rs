//! Loading an environment's `.env` file into the process environment.
//!
//! [`Loader`] resolves a [`ProjectContext`] (unless one is supplied), reads
//! `.azure/<environment>/.env` and sets each variable in the process
//! environment. A missing project, `.azure` layout, or `.env` file is the
//! normal state outside a provisioned project and yields
//! [`LoadOutcome::Skipped`] rather than an error.
//!
//! # Concurrency
//!
//! Loading writes process-wide state. Do not race it with other code that
//! reads or writes environment variables; load once at startup.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::env_file::EnvFile;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::project::{ContextBuilder, ProjectContext};

/// What happens to variables that are already set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvPolicy {
    /// Existing variables win; only unset keys are applied.
    #[default]
    Preserve,
    /// Every key from the file is applied, overwriting existing values.
    Replace,
}

/// Details of a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// The `.env` file that was loaded.
    pub path: PathBuf,
    /// Keys set in the process environment.
    pub applied: Vec<String>,
    /// Keys left alone because they were already set.
    pub preserved: Vec<String>,
}

/// Result of [`Loader::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing to load: no project, no `.azure` layout, or no `.env` file.
    Skipped,
    /// The `.env` file was found and applied.
    Loaded(LoadReport),
}

impl LoadOutcome {
    /// Whether a `.env` file was found and applied.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The load details, if a file was loaded.
    pub fn report(&self) -> Option<&LoadReport> {
        match self {
            Self::Loaded(report) => Some(report),
            Self::Skipped => None,
        }
    }
}

/// Loads an environment's variables into the process environment.
///
/// # Example
///
/// ```
/// use dotazure::config::Loader;
/// use dotazure::fs::MemoryFileSystem;
/// use std::sync::Arc;
///
/// let fs = MemoryFileSystem::new();
/// fs.write("/p/azure.yaml", "").unwrap();
/// fs.write("/p/.azure/config.json", r#"{"defaultEnvironment":"dev"}"#).unwrap();
/// fs.write("/p/.azure/dev/.env", "DOTAZURE_DOC_EXAMPLE=1").unwrap();
///
/// let outcome = Loader::new()
///     .file_system(Arc::new(fs))
///     .current_directory("/p")
///     .load()
///     .unwrap();
///
/// assert!(outcome.is_loaded());
/// assert_eq!(std::env::var("DOTAZURE_DOC_EXAMPLE").unwrap(), "1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    context: Option<ProjectContext>,
    options: ContextBuilder,
    policy: EnvPolicy,
}

impl Loader {
    /// Create a loader that resolves from the current directory and
    /// preserves existing variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an already-resolved context instead of resolving one.
    pub fn context(mut self, context: ProjectContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Resolve with these options when no context was supplied.
    ///
    /// The builder's filesystem is also used to read the `.env` file.
    pub fn options(mut self, options: ContextBuilder) -> Self {
        self.options = options;
        self
    }

    /// Start resolution from `path`.
    pub fn current_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.options = self.options.current_directory(path);
        self
    }

    /// Load `name` instead of the project's default environment.
    pub fn environment_name(mut self, name: impl Into<String>) -> Self {
        self.options = self.options.environment_name(name);
        self
    }

    /// Read through `fs` instead of the real filesystem.
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.options = self.options.file_system(fs);
        self
    }

    /// Overwrite variables that are already set.
    pub fn replace(mut self, replace: bool) -> Self {
        self.policy = if replace {
            EnvPolicy::Replace
        } else {
            EnvPolicy::Preserve
        };
        self
    }

    /// Set the policy for variables that are already set.
    pub fn policy(mut self, policy: EnvPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve the context this loader would use.
    ///
    /// Returns `Ok(None)` when resolution fails with a "not found" error.
    ///
    /// # Errors
    ///
    /// Any resolution error other than "not found".
    pub fn resolve(&self) -> Result<Option<ProjectContext>> {
        if let Some(context) = &self.context {
            return Ok(Some(context.clone()));
        }
        match self.options.build() {
            Ok(context) => Ok(Some(context)),
            Err(e) if e.is_not_found() => {
                debug!("No environment to load: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Read and parse the environment file without applying it.
    ///
    /// Returns `Ok(None)` when there is nothing to load.
    ///
    /// # Errors
    ///
    /// Resolution errors other than "not found", read errors other than a
    /// missing file, and `EnvFileParse` for malformed content.
    pub fn read(&self) -> Result<Option<EnvFile>> {
        let Some(context) = self.resolve()? else {
            return Ok(None);
        };

        let path = context.environment_file();
        match EnvFile::read(self.options.fs().as_ref(), &path) {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.is_not_found() => {
                debug!("No environment file at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Load the environment file into the process environment.
    ///
    /// Each call re-reads and re-applies the file; under
    /// [`EnvPolicy::Replace`] the last call wins.
    ///
    /// # Errors
    ///
    /// Same as [`Loader::read`].
    pub fn load(&self) -> Result<LoadOutcome> {
        let Some(file) = self.read()? else {
            return Ok(LoadOutcome::Skipped);
        };

        let report = apply(&file, self.policy);
        info!(
            "Loaded {} variable(s) from {} ({} already set)",
            report.applied.len(),
            report.path.display(),
            report.preserved.len()
        );
        Ok(LoadOutcome::Loaded(report))
    }
}

/// Set the variables from `file` in the process environment.
///
/// The file is walked line by line and each value is set before the next
/// line is parsed, so a `${VAR}` reference to a key defined earlier in the
/// file sees the file's value under both policies. Under
/// [`EnvPolicy::Preserve`] keys that were already set get their original
/// value back once the walk is done.
pub fn apply(file: &EnvFile, policy: EnvPolicy) -> LoadReport {
    let mut applied = Vec::new();
    let mut preserved = Vec::new();
    let mut originals: Vec<(String, OsString)> = Vec::new();
    let mut seen = HashSet::new();

    for item in dotenvy::from_read_iter(file.content().as_bytes()) {
        // `content` already parsed cleanly in `EnvFile::parse`.
        let (key, value) = match item {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Stopped applying {}: {}", file.path().display(), e);
                break;
            }
        };
        if !is_settable(&key, &value) {
            warn!("Skipping {} from {}: not a valid variable", key, file.path().display());
            continue;
        }
        if seen.insert(key.clone()) {
            match std::env::var_os(&key) {
                Some(original) if policy == EnvPolicy::Preserve => {
                    debug!("Keeping existing value of {}", key);
                    originals.push((key.clone(), original));
                    preserved.push(key.clone());
                }
                _ => applied.push(key.clone()),
            }
        }
        std::env::set_var(&key, &value);
    }

    for (key, original) in originals {
        std::env::set_var(key, original);
    }

    LoadReport {
        path: file.path().to_path_buf(),
        applied,
        preserved,
    }
}

/// `set_var` panics on these.
fn is_settable(key: &str, value: &str) -> bool {
    !key.is_empty() && !key.contains(['=', '\0']) && !value.contains('\0')
}

/// Load the current project's environment, preserving existing variables.
///
/// Returns whether a `.env` file was found and loaded.
///
/// # Errors
///
/// See [`Loader::load`].
pub fn load() -> Result<bool> {
    Ok(Loader::new().load()?.is_loaded())
}

/// Load the current project's environment, overwriting existing variables.
///
/// # Errors
///
/// See [`Loader::load`].
pub fn load_override() -> Result<bool> {
    Ok(Loader::new().replace(true).load()?.is_loaded())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DotazureError;
    use crate::fs::MemoryFileSystem;
    use serial_test::serial;
    use std::path::Path;

    fn project(config: &str, env: &str) -> Arc<MemoryFileSystem> {
        let fs = MemoryFileSystem::new();
        fs.write("/p/azure.yaml", "name: app").unwrap();
        fs.write("/p/.azure/config.json", config).unwrap();
        fs.write("/p/.azure/dev/.env", env).unwrap();
        fs.write("/p/src/sub/main.rs", "").unwrap();
        Arc::new(fs)
    }

    fn loader(fs: Arc<MemoryFileSystem>, start: &str) -> Loader {
        Loader::new().file_system(fs).current_directory(start)
    }

    fn unset(keys: &[&str]) {
        for key in keys {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn loads_default_environment() {
        unset(&["DOTAZURE_LOADER_A"]);
        let fs = project(r#"{"defaultEnvironment":"dev"}"#, "DOTAZURE_LOADER_A=1\n");

        let outcome = loader(fs, "/p/src/sub").load().unwrap();

        assert!(outcome.is_loaded());
        let report = outcome.report().unwrap();
        assert_eq!(report.path, PathBuf::from("/p/.azure/dev/.env"));
        assert_eq!(report.applied, vec!["DOTAZURE_LOADER_A".to_string()]);
        assert!(report.preserved.is_empty());
        assert_eq!(std::env::var("DOTAZURE_LOADER_A").unwrap(), "1");
        unset(&["DOTAZURE_LOADER_A"]);
    }

    #[test]
    #[serial]
    fn no_project_is_skipped() {
        let fs = MemoryFileSystem::new();
        fs.create_dir_all(Path::new("/work")).unwrap();

        let outcome = loader(Arc::new(fs), "/work").load().unwrap();

        assert_eq!(outcome, LoadOutcome::Skipped);
        assert!(!outcome.is_loaded());
        assert!(outcome.report().is_none());
    }

    #[test]
    #[serial]
    fn missing_environment_directory_is_skipped() {
        let fs = MemoryFileSystem::new();
        fs.write("/p/azure.yaml", "").unwrap();

        let outcome = loader(Arc::new(fs), "/p").load().unwrap();

        assert_eq!(outcome, LoadOutcome::Skipped);
    }

    #[test]
    #[serial]
    fn missing_env_file_is_skipped() {
        let fs = project(r#"{"defaultEnvironment":"dev"}"#, "");
        fs.remove("/p/.azure/dev/.env");

        let outcome = loader(fs, "/p").load().unwrap();

        assert_eq!(outcome, LoadOutcome::Skipped);
    }

    #[test]
    #[serial]
    fn override_without_environment_directory_is_skipped() {
        let fs = project(r#"{"defaultEnvironment":"dev"}"#, "DOTAZURE_LOADER_B=1");

        let loader = loader(fs, "/p/src/sub").environment_name("prod");
        let context = loader.resolve().unwrap().unwrap();
        assert_eq!(context.environment_name(), "prod");

        let outcome = loader.load().unwrap();
        assert_eq!(outcome, LoadOutcome::Skipped);
    }

    #[test]
    #[serial]
    fn no_default_environment_is_an_error() {
        let fs = project("{}", "");

        let err = loader(fs, "/p").load().unwrap_err();

        assert!(matches!(err, DotazureError::NoEnvironmentName { .. }));
    }

    #[test]
    #[serial]
    fn empty_override_is_an_error() {
        let fs = project(r#"{"defaultEnvironment":"dev"}"#, "");

        let err = loader(fs, "/p").environment_name(" ").load().unwrap_err();

        assert!(matches!(err, DotazureError::InvalidArgument { .. }));
    }

    #[test]
    #[serial]
    fn malformed_env_file_is_an_error() {
        let fs = project(r#"{"defaultEnvironment":"dev"}"#, "DOTAZURE_LOADER_C=a b");

        let err = loader(fs, "/p").load().unwrap_err();

        assert!(matches!(err, DotazureError::EnvFileParse { .. }));
        assert!(std::env::var_os("DOTAZURE_LOADER_C").is_none());
    }

    #[test]
    #[serial]
    fn env_file_directory_is_an_error() {
        let fs = project(r#"{"defaultEnvironment":"dev"}"#, "");
        fs.remove("/p/.azure/dev/.env");
        fs.create_dir_all(Path::new("/p/.azure/dev/.env")).unwrap();

        let err = loader(fs, "/p").load().unwrap_err();

        assert!(!err.is_not_found());
    }

    #[test]
    #[serial]
    fn preserve_keeps_existing_value() {
        std::env::set_var("DOTAZURE_LOADER_D", "original");
        unset(&["DOTAZURE_LOADER_E"]);
        let fs = project(
            r#"{"defaultEnvironment":"dev"}"#,
            "DOTAZURE_LOADER_D=from_file\nDOTAZURE_LOADER_E=new",
        );

        let outcome = loader(fs, "/p").load().unwrap();

        assert_eq!(std::env::var("DOTAZURE_LOADER_D").unwrap(), "original");
        assert_eq!(std::env::var("DOTAZURE_LOADER_E").unwrap(), "new");
        let report = outcome.report().unwrap();
        assert_eq!(report.preserved, vec!["DOTAZURE_LOADER_D".to_string()]);
        assert_eq!(report.applied, vec!["DOTAZURE_LOADER_E".to_string()]);
        unset(&["DOTAZURE_LOADER_D", "DOTAZURE_LOADER_E"]);
    }

    #[test]
    #[serial]
    fn replace_overwrites_existing_value() {
        std::env::set_var("DOTAZURE_LOADER_F", "original");
        let fs = project(r#"{"defaultEnvironment":"dev"}"#, "DOTAZURE_LOADER_F=from_file");

        let outcome = loader(fs, "/p").replace(true).load().unwrap();

        assert!(outcome.is_loaded());
        assert_eq!(std::env::var("DOTAZURE_LOADER_F").unwrap(), "from_file");
        unset(&["DOTAZURE_LOADER_F"]);
    }

    #[test]
    #[serial]
    fn repeated_replace_loads_last_wins() {
        unset(&["DOTAZURE_LOADER_G"]);
        let fs = project(r#"{"defaultEnvironment":"dev"}"#, "DOTAZURE_LOADER_G=first");
        fs.write("/p/.azure/prod/.env", "DOTAZURE_LOADER_G=second").unwrap();

        loader(fs.clone(), "/p").replace(true).load().unwrap();
        loader(fs.clone(), "/p")
            .environment_name("prod")
            .replace(true)
            .load()
            .unwrap();
        assert_eq!(std::env::var("DOTAZURE_LOADER_G").unwrap(), "second");

        loader(fs, "/p").replace(true).load().unwrap();
        assert_eq!(std::env::var("DOTAZURE_LOADER_G").unwrap(), "first");
        unset(&["DOTAZURE_LOADER_G"]);
    }

    #[test]
    #[serial]
    fn supplied_context_skips_resolution() {
        unset(&["DOTAZURE_LOADER_H"]);
        let fs = MemoryFileSystem::new();
        // No azure.yaml: resolving would fail with NoProject.
        fs.write("/p/.azure/staging/.env", "DOTAZURE_LOADER_H=yes").unwrap();
        let context = ProjectContext::new(PathBuf::from("/p"), "staging".to_string());

        let outcome = Loader::new()
            .file_system(Arc::new(fs))
            .context(context)
            .load()
            .unwrap();

        assert!(outcome.is_loaded());
        assert_eq!(std::env::var("DOTAZURE_LOADER_H").unwrap(), "yes");
        unset(&["DOTAZURE_LOADER_H"]);
    }

    #[test]
    #[serial]
    fn read_does_not_apply() {
        unset(&["DOTAZURE_LOADER_I"]);
        let fs = project(r#"{"defaultEnvironment":"dev"}"#, "DOTAZURE_LOADER_I=1");

        let file = loader(fs, "/p").read().unwrap().unwrap();

        assert_eq!(file.get("DOTAZURE_LOADER_I"), Some("1"));
        assert!(std::env::var_os("DOTAZURE_LOADER_I").is_none());
    }

    #[test]
    fn policy_from_replace_flag() {
        assert_eq!(Loader::new().policy, EnvPolicy::Preserve);
        assert_eq!(Loader::new().replace(true).policy, EnvPolicy::Replace);
        assert_eq!(
            Loader::new().replace(true).replace(false).policy,
            EnvPolicy::Preserve
        );
    }

    #[test]
    fn settable_names() {
        assert!(is_settable("A", "1"));
        assert!(is_settable("A", ""));
        assert!(!is_settable("", "1"));
        assert!(!is_settable("A=B", "1"));
        assert!(!is_settable("A", "x\0y"));
    }

    #[test]
    #[serial]
    fn apply_reports_keys_in_file_order() {
        unset(&["DOTAZURE_LOADER_J", "DOTAZURE_LOADER_K"]);
        let file = EnvFile::parse(
            "DOTAZURE_LOADER_K=1\nDOTAZURE_LOADER_J=2",
            Path::new("/x/.env"),
        )
        .unwrap();

        let report = apply(&file, EnvPolicy::Preserve);

        assert_eq!(
            report.applied,
            vec!["DOTAZURE_LOADER_K".to_string(), "DOTAZURE_LOADER_J".to_string()]
        );
        unset(&["DOTAZURE_LOADER_J", "DOTAZURE_LOADER_K"]);
    }

    #[test]
    #[serial]
    fn replace_substitutes_earlier_file_values() {
        std::env::set_var("DOTAZURE_LOADER_SUB_HOST", "stale-process-value");
        unset(&["DOTAZURE_LOADER_SUB_URL"]);
        let fs = project(
            r#"{"defaultEnvironment":"dev"}"#,
            "DOTAZURE_LOADER_SUB_HOST=file-host\n\
             DOTAZURE_LOADER_SUB_URL=http://${DOTAZURE_LOADER_SUB_HOST}:80\n",
        );

        loader(fs, "/p").replace(true).load().unwrap();

        assert_eq!(std::env::var("DOTAZURE_LOADER_SUB_HOST").unwrap(), "file-host");
        assert_eq!(
            std::env::var("DOTAZURE_LOADER_SUB_URL").unwrap(),
            "http://file-host:80"
        );
        unset(&["DOTAZURE_LOADER_SUB_HOST", "DOTAZURE_LOADER_SUB_URL"]);
    }

    #[test]
    #[serial]
    fn preserve_substitutes_earlier_file_values_but_keeps_existing() {
        std::env::set_var("DOTAZURE_LOADER_KEEP_HOST", "process-host");
        unset(&["DOTAZURE_LOADER_KEEP_URL"]);
        let fs = project(
            r#"{"defaultEnvironment":"dev"}"#,
            "DOTAZURE_LOADER_KEEP_HOST=file-host\n\
             DOTAZURE_LOADER_KEEP_URL=http://${DOTAZURE_LOADER_KEEP_HOST}:80\n",
        );

        let outcome = loader(fs, "/p").load().unwrap();

        assert_eq!(
            std::env::var("DOTAZURE_LOADER_KEEP_HOST").unwrap(),
            "process-host"
        );
        assert_eq!(
            std::env::var("DOTAZURE_LOADER_KEEP_URL").unwrap(),
            "http://file-host:80"
        );
        let report = outcome.report().unwrap();
        assert_eq!(report.preserved, vec!["DOTAZURE_LOADER_KEEP_HOST".to_string()]);
        assert_eq!(report.applied, vec!["DOTAZURE_LOADER_KEEP_URL".to_string()]);
        unset(&["DOTAZURE_LOADER_KEEP_HOST", "DOTAZURE_LOADER_KEEP_URL"]);
    }

    #[test]
    #[serial]
    fn substitution_falls_back_to_process_environment() {
        std::env::set_var("DOTAZURE_LOADER_OUTER", "outside");
        unset(&["DOTAZURE_LOADER_FROM_OUTER"]);
        let fs = project(
            r#"{"defaultEnvironment":"dev"}"#,
            "DOTAZURE_LOADER_FROM_OUTER=${DOTAZURE_LOADER_OUTER}/x\n",
        );

        loader(fs, "/p").load().unwrap();

        assert_eq!(
            std::env::var("DOTAZURE_LOADER_FROM_OUTER").unwrap(),
            "outside/x"
        );
        unset(&["DOTAZURE_LOADER_OUTER", "DOTAZURE_LOADER_FROM_OUTER"]);
    }

    #[test]
    #[serial]
    fn substitution_sees_value_at_time_of_reference() {
        unset(&["DOTAZURE_LOADER_SEQ_A", "DOTAZURE_LOADER_SEQ_B"]);
        let file = EnvFile::parse(
            "DOTAZURE_LOADER_SEQ_A=1\n\
             DOTAZURE_LOADER_SEQ_B=${DOTAZURE_LOADER_SEQ_A}\n\
             DOTAZURE_LOADER_SEQ_A=3\n",
            Path::new("/x/.env"),
        )
        .unwrap();

        let report = apply(&file, EnvPolicy::Replace);

        assert_eq!(std::env::var("DOTAZURE_LOADER_SEQ_A").unwrap(), "3");
        assert_eq!(std::env::var("DOTAZURE_LOADER_SEQ_B").unwrap(), "1");
        assert_eq!(
            report.applied,
            vec![
                "DOTAZURE_LOADER_SEQ_A".to_string(),
                "DOTAZURE_LOADER_SEQ_B".to_string()
            ]
        );
        unset(&["DOTAZURE_LOADER_SEQ_A", "DOTAZURE_LOADER_SEQ_B"]);
    }
}
