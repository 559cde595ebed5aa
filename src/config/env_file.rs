//! .env file parsing.
//!
//! Parsing is delegated to `dotenvy`, which understands the usual dotenv
//! dialect. Content is read through a [`FileSystem`] so in-memory projects
//! load the same way as real ones.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{DotazureError, Result, Stage};
use crate::fs::FileSystem;

/// Variables parsed from an environment file, in file order.
///
/// # Supported Formats
///
/// - Simple: `KEY=value`
/// - Quoted: `KEY="value with spaces"` or `KEY='single quoted'`
/// - Empty: `KEY=`
/// - Comments: `# This is a comment`, or `KEY=value # trailing`
/// - Exported: `export KEY=value`
/// - Escapes in double quotes: `KEY="line\nbreak"`
/// - Substitution: `URL=http://${HOST}:8080`
///
/// A key assigned twice keeps its first position and its last value.
///
/// `${VAR}` references here are filled from the process environment
/// before earlier lines, so [`vars`](Self::vars) is a preview. When the
/// file is applied, earlier lines win (see [`apply`](super::apply)).
///
/// # Example
///
/// ```
/// use dotazure::config::EnvFile;
/// use std::path::Path;
///
/// let content = r#"
/// # Azure resources
/// AZURE_LOCATION=westus2
/// AZURE_KEYVAULT_URL="https://my-vault.vault.azure.net/"
/// EMPTY=
/// "#;
///
/// let file = EnvFile::parse(content, Path::new(".env")).unwrap();
/// assert_eq!(file.get("AZURE_LOCATION"), Some("westus2"));
/// assert_eq!(file.get("AZURE_KEYVAULT_URL"), Some("https://my-vault.vault.azure.net/"));
/// assert_eq!(file.get("EMPTY"), Some(""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    path: PathBuf,
    content: String,
    vars: Vec<(String, String)>,
}

impl EnvFile {
    /// Parse env file content.
    ///
    /// # Errors
    ///
    /// Returns `EnvFileParse` with the byte position of the first malformed
    /// line. The line itself is never included.
    pub fn parse(content: &str, source_path: &Path) -> Result<Self> {
        let mut vars: Vec<(String, String)> = Vec::new();

        for item in dotenvy::from_read_iter(content.as_bytes()) {
            let (key, value) = item.map_err(|e| Self::map_error(e, source_path))?;
            match vars.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => vars.push((key, value)),
            }
        }

        Ok(Self {
            path: source_path.to_path_buf(),
            content: content.to_string(),
            vars,
        })
    }

    /// Read and parse an env file.
    ///
    /// # Errors
    ///
    /// A missing file yields an `Io` error of kind `NotFound`, which
    /// [`DotazureError::is_not_found`] recognizes.
    pub fn read(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .map_err(|e| DotazureError::io(Stage::ReadingEnvFile, path, e))?;
        Self::parse(&content, path)
    }

    fn map_error(err: dotenvy::Error, path: &Path) -> DotazureError {
        match err {
            dotenvy::Error::LineParse(_, index) => DotazureError::EnvFileParse {
                path: path.to_path_buf(),
                index,
            },
            dotenvy::Error::Io(e) => DotazureError::io(Stage::ReadingEnvFile, path, e),
            _ => DotazureError::io(
                Stage::ReadingEnvFile,
                path,
                io::Error::new(io::ErrorKind::InvalidData, "unsupported dotenv content"),
            ),
        }
    }

    /// Path the variables were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The text the variables were parsed from.
    pub(crate) fn content(&self) -> &str {
        &self.content
    }

    /// All variables in file order.
    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    /// Look up a variable's value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if the file defines no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
