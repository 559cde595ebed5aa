//! Environment file loading.
//!
//! - Parsing `.env` content in [`env_file`]
//! - Resolving, reading and applying it in [`loader`]
//!
//! # Example
//!
//! ```
//! use dotazure::config::Loader;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("azure.yaml"), "name: app").unwrap();
//! fs::create_dir_all(temp.path().join(".azure").join("dev")).unwrap();
//! fs::write(
//!     temp.path().join(".azure").join("config.json"),
//!     r#"{"defaultEnvironment":"dev"}"#,
//! )
//! .unwrap();
//! fs::write(
//!     temp.path().join(".azure").join("dev").join(".env"),
//!     "DOTAZURE_CONFIG_DOC=hello",
//! )
//! .unwrap();
//!
//! let outcome = Loader::new().current_directory(temp.path()).load().unwrap();
//! assert!(outcome.is_loaded());
//! assert_eq!(std::env::var("DOTAZURE_CONFIG_DOC").unwrap(), "hello");
//! ```

pub mod env_file;
pub mod loader;

pub use env_file::EnvFile;
pub use loader::{apply, load, load_override, EnvPolicy, LoadOutcome, LoadReport, Loader};
