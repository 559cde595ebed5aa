//! dotazure - Load Azure Developer CLI environment variables.
//!
//! Projects managed by the Azure Developer CLI (`azd`) keep an `azure.yaml`
//! at their root and store per-environment settings under
//! `.azure/<environment>/.env`. This crate locates the project from any
//! directory inside it, works out which environment is selected, and loads
//! that environment's variables into the process environment.
//!
//! # Modules
//!
//! - [`project`] - Project discovery and environment selection
//! - [`config`] - `.env` parsing and loading into the process environment
//! - [`fs`] - Filesystem abstraction with OS and in-memory implementations
//! - [`error`] - Error types and result aliases
//! - [`cli`] - Command-line interface and argument parsing
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```no_run
//! // Load `.azure/<defaultEnvironment>/.env` if the current directory is
//! // inside an azd project. Variables that are already set are kept.
//! if dotazure::load()? {
//!     println!("AZURE_KEYVAULT_URL={:?}", std::env::var("AZURE_KEYVAULT_URL"));
//! }
//! # Ok::<(), dotazure::DotazureError>(())
//! ```
//!
//! Use [`ProjectContext::builder`] to resolve without loading, or
//! [`Loader`] to control the starting directory, environment name, and
//! whether existing variables are overwritten.

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod project;
pub mod ui;

pub use config::{load, load_override, LoadOutcome, Loader};
pub use error::{DotazureError, Result, Stage};
pub use project::{ContextBuilder, ProjectContext};
