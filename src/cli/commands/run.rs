//! Run command implementation.
//!
//! The `dotazure run` command loads the environment into its own process
//! and then runs a program, which inherits the variables.

use std::process;

use anyhow::Context as _;
use tracing::debug;

use crate::cli::args::RunArgs;
use crate::config::{LoadOutcome, Loader};
use crate::error::{DotazureError, Result};
use crate::project::ContextBuilder;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    options: ContextBuilder,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(options: ContextBuilder, args: RunArgs) -> Self {
        Self { options, args }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some((program, program_args)) = self.args.command.split_first() else {
            return Err(DotazureError::InvalidArgument {
                message: "no program given to run".to_string(),
            });
        };

        let outcome = Loader::new()
            .options(self.options.clone())
            .replace(self.args.replace)
            .load()?;
        match &outcome {
            LoadOutcome::Loaded(report) => {
                ui.detail(&format!(
                    "Loaded {} variable(s) from {}",
                    report.applied.len(),
                    report.path.display()
                ));
                for key in &report.preserved {
                    ui.detail(&format!("Kept existing {}", key));
                }
            }
            LoadOutcome::Skipped => ui.detail("No environment file to load"),
        }

        debug!("Running {} {:?}", program, program_args);
        let status = process::Command::new(program)
            .args(program_args)
            .status()
            .with_context(|| format!("failed to run {}", program))?;

        if status.success() {
            Ok(CommandResult::success())
        } else {
            // Killed by a signal when there is no code.
            Ok(CommandResult::failure(status.code().unwrap_or(1)))
        }
    }
}
