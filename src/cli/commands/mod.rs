//! Command execution.
//!
//! Commands return an exit code; errors are reported here, with recovery
//! suggestions, and turned into exit code 1.

mod dist;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::{CliError, DistError, Result};

use dist::execute_dist;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    let config = RuntimeConfig::from(&args);

    let result = match args.validate() {
        Err(reason) => Err(DistError::from(CliError::InvalidArguments { reason })),
        Ok(()) => match &args.command {
            Command::Dist {
                platform,
                project_dir,
            } => execute_dist(&args, (*platform).into(), project_dir, &config).await,
        },
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            let output = config.output();
            output.error(&format!("Command '{}' failed: {}", args.command.name(), e));
            for suggestion in e.recovery_suggestions() {
                output.hint(&suggestion);
            }
            Ok(1)
        }
    }
}
