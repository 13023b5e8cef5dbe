//! Command line argument parsing and validation.

use crate::bundler::Platform;
use crate::config::Overrides;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Builds platform-native distributions from an app.yml descriptor
#[derive(Parser, Debug)]
#[command(
    name = "appdist",
    version,
    about = "Builds platform-native distributions from an app.yml descriptor",
    long_about = "Cross-compile an application and package it for a target platform.

Usage:
  appdist dist linux ./myapp      -> myapp/dist/linux/<id>_<version>-<ts>_amd64.deb
  appdist dist macos ./myapp      -> myapp/dist/macos/<Name>.app
  appdist dist windows ./myapp    -> myapp/dist/windows/<id>_<version>_amd64.zip

Each run clears dist/<platform> first."
)]
pub struct Args {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Limit for each external tool run, in seconds
    #[arg(long, global = true, env = "APPDIST_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Compiler executable (defaults to `go`)
    #[arg(long, global = true, env = "APPDIST_TOOLCHAIN", value_name = "PROGRAM")]
    pub toolchain: Option<String>,

    /// Suppress status output (errors are always shown)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a distribution for one platform
    Dist {
        /// Target platform
        #[arg(value_enum)]
        platform: TargetPlatform,

        /// Project directory containing app.yml
        #[arg(value_name = "PROJECT_DIR")]
        project_dir: PathBuf,
    },
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Dist { .. } => "dist",
        }
    }
}

/// Platform names accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetPlatform {
    /// Debian package
    Linux,
    /// Application bundle
    Macos,
    /// Portable zip
    Windows,
}

impl From<TargetPlatform> for Platform {
    fn from(target: TargetPlatform) -> Self {
        match target {
            TargetPlatform::Linux => Platform::Linux,
            TargetPlatform::Macos => Platform::MacOs,
            TargetPlatform::Windows => Platform::Windows,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(toolchain) = &self.toolchain
            && toolchain.trim().is_empty()
        {
            return Err("--toolchain must not be empty".to_string());
        }
        if self.timeout == Some(0) {
            return Err("--timeout must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Command line values that override dist.toml
    pub fn overrides(&self) -> Overrides {
        Overrides {
            toolchain: self.toolchain.clone(),
            timeout_secs: self.timeout,
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(quiet),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_dist_command() {
        let args = Args::try_parse_from(["appdist", "dist", "macos", "./foo"]).unwrap();
        let Command::Dist {
            platform,
            project_dir,
        } = args.command;
        assert_eq!(Platform::from(platform), Platform::MacOs);
        assert_eq!(project_dir, PathBuf::from("./foo"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "appdist",
            "dist",
            "linux",
            "./foo",
            "--timeout",
            "30",
            "--toolchain",
            "go1.22",
        ])
        .unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.timeout_secs, Some(30));
        assert_eq!(overrides.toolchain.as_deref(), Some("go1.22"));
    }

    #[test]
    fn test_unknown_platform_rejected() {
        assert!(Args::try_parse_from(["appdist", "dist", "beos", "./foo"]).is_err());
    }

    #[test]
    fn test_runtime_config_from_args() {
        let args = Args::try_parse_from(["appdist", "dist", "linux", "./foo", "-q"]).unwrap();
        assert!(args.quiet);
        let config = RuntimeConfig::from(&args);
        assert!(config.output().info("suppressed").is_ok());
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let args =
            Args::try_parse_from(["appdist", "dist", "linux", "./foo", "--timeout", "0"]).unwrap();
        assert!(args.validate().is_err());
    }
}
