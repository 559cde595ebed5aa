//! Project and environment discovery.
//!
//! A project is a directory containing `azure.yaml`. Its environments live
//! under `.azure/`:
//!
//! ```text
//! <project>/
//! ├── azure.yaml
//! └── .azure/
//!     ├── config.json     {"defaultEnvironment": "dev"}
//!     └── dev/
//!         └── .env
//! ```
//!
//! - [`ContextBuilder`] - resolution options and the search itself
//! - [`ProjectContext`] - the resolved project directory and environment
//! - [`EnvironmentDescriptor`] - parsed `config.json`

pub mod context;
pub mod descriptor;
pub mod resolver;

pub use context::{ProjectContext, CONFIG_FILE, ENVIRONMENT_DIRECTORY, ENV_FILE, PROJECT_FILE};
pub use descriptor::EnvironmentDescriptor;
pub use resolver::{find_project_directory, ContextBuilder};
