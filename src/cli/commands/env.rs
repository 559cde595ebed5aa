//! Env command implementation.
//!
//! The `dotazure env` command prints the variables from the resolved
//! environment's `.env` file without applying them.

use crate::cli::args::EnvArgs;
use crate::config::Loader;
use crate::error::{DotazureError, Result};
use crate::project::ContextBuilder;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::EXIT_NOT_FOUND;

/// The env command implementation.
pub struct EnvCommand {
    options: ContextBuilder,
    args: EnvArgs,
}

impl EnvCommand {
    /// Create a new env command.
    pub fn new(options: ContextBuilder, args: EnvArgs) -> Self {
        Self { options, args }
    }
}

impl Command for EnvCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loader = Loader::new().options(self.options.clone());
        let Some(context) = loader.resolve()? else {
            ui.error("No Azure Developer CLI project found. Run 'azd init' to create one.");
            return Ok(CommandResult::failure(EXIT_NOT_FOUND));
        };

        let path = context.environment_file();
        let Some(file) = loader.context(context).read()? else {
            ui.error(&format!("No environment file at {}", path.display()));
            return Ok(CommandResult::failure(EXIT_NOT_FOUND));
        };

        if self.args.json {
            let map: serde_json::Map<String, serde_json::Value> = file
                .vars()
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            let json = serde_json::to_string_pretty(&map)
                .map_err(|e| DotazureError::Other(e.into()))?;
            ui.message(&json);
        } else {
            for (key, value) in file.vars() {
                ui.message(&format!("{}={}", key, value));
            }
        }
        ui.detail(&format!(
            "{} variable(s) from {}",
            file.len(),
            file.path().display()
        ));

        Ok(CommandResult::success())
    }
}
