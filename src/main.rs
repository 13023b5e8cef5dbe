//! appdist - platform-native distributions from an app.yml descriptor.

use appdist::cli;
use appdist::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            let output = OutputManager::new(false);
            output.error(&format!("Fatal error: {e}"));
            for suggestion in e.recovery_suggestions() {
                output.hint(&suggestion);
            }
            process::exit(1);
        }
    }
}
