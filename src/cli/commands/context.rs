//! Context command implementation.
//!
//! The `dotazure context` command shows the resolved project directory,
//! environment name, and the paths derived from them.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::args::ContextArgs;
use crate::error::{DotazureError, Result};
use crate::project::{ContextBuilder, ProjectContext};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::EXIT_NOT_FOUND;

/// The context command implementation.
pub struct ContextCommand {
    options: ContextBuilder,
    args: ContextArgs,
}

/// Resolved context as printed by `context --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextReport {
    pub project_directory: PathBuf,
    pub environment_name: String,
    pub project_path: PathBuf,
    pub config_path: PathBuf,
    pub environment_root: PathBuf,
    pub environment_file: PathBuf,
    pub environment_file_exists: bool,
}

impl ContextReport {
    fn new(context: &ProjectContext, options: &ContextBuilder) -> Self {
        let environment_file = context.environment_file();
        let environment_file_exists = options
            .fs()
            .stat(&environment_file)
            .map(|stat| stat.is_file())
            .unwrap_or(false);

        Self {
            project_directory: context.project_directory().to_path_buf(),
            environment_name: context.environment_name().to_string(),
            project_path: context.project_path(),
            config_path: context.config_path(),
            environment_root: context.environment_root(),
            environment_file,
            environment_file_exists,
        }
    }
}

impl ContextCommand {
    /// Create a new context command.
    pub fn new(options: ContextBuilder, args: ContextArgs) -> Self {
        Self { options, args }
    }

    fn show_plain(&self, report: &ContextReport, ui: &mut dyn UserInterface) {
        let rows = [
            ("Project", report.project_directory.display().to_string()),
            ("Environment", report.environment_name.clone()),
            ("Config", report.config_path.display().to_string()),
            ("Environment root", report.environment_root.display().to_string()),
            ("Environment file", report.environment_file.display().to_string()),
        ];
        for (key, value) in rows {
            ui.message(&format!("{:<18}{}", format!("{}:", key), value));
        }
        if !report.environment_file_exists {
            ui.warning("Environment file does not exist yet. Run 'azd provision' to create it.");
        }
    }
}

impl Command for ContextCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let context = match self.options.build() {
            Ok(context) => context,
            Err(e) if e.is_not_found() => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_NOT_FOUND));
            }
            Err(e) => return Err(e),
        };

        let report = ContextReport::new(&context, &self.options);
        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| DotazureError::Other(e.into()))?;
            ui.message(&json);
        } else {
            self.show_plain(&report, ui);
        }

        Ok(CommandResult::success())
    }
}
