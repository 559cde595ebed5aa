//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. The dispatcher carries the
//! resolution options built from the global `--cwd` and `--environment`
//! flags, so every command resolves the project the same way.

pub mod completions;
pub mod context;
pub mod dispatcher;
pub mod env;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

/// Exit code when no project, environment, or `.env` file could be found.
pub const EXIT_NOT_FOUND: i32 = 2;
