//! Top-level error types for appdist.
//!
//! Wraps CLI, configuration and packaging failures, and maps each to
//! actionable recovery suggestions.

use crate::bundler::{self, ErrorKind};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for appdist operations
pub type Result<T> = std::result::Result<T, DistError>;

/// Main error type for all appdist operations
#[derive(Error, Debug)]
pub enum DistError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Configuration file errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Packaging errors
    #[error("{0}")]
    Bundler(#[from] bundler::Error),
}

/// Command line errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Project directory does not exist or is not a directory
    #[error("Project directory not found: {path}")]
    ProjectNotFound {
        /// Path given on the command line
        path: PathBuf,
    },

    /// Project directory has no descriptor
    #[error("No app.yml found in {path}")]
    MissingDescriptor {
        /// Project directory that was searched
        path: PathBuf,
    },
}

/// `dist.toml` errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file exists but cannot be read
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has unknown keys
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but is unusable
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue {
        /// Dotted key name
        key: String,
        /// Reason for the error
        reason: String,
    },
}

impl DistError {
    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            DistError::Cli(CliError::InvalidArguments { .. }) => vec![
                "Run `appdist dist --help` for the accepted options".to_string(),
            ],
            DistError::Cli(CliError::ProjectNotFound { .. }) => vec![
                "Pass the directory containing app.yml: appdist dist linux ./myapp".to_string(),
            ],
            DistError::Cli(CliError::MissingDescriptor { path }) => vec![
                format!("Create {}", path.join("app.yml").display()),
                "Required keys: id, name, version, main, icon".to_string(),
            ],
            DistError::Config(_) => vec![
                "Check dist.toml; recognised sections are [toolchain] and [linux]".to_string(),
                "Remove dist.toml to fall back to defaults".to_string(),
            ],
            DistError::Bundler(e) => bundler_suggestions(e),
        }
    }
}

fn bundler_suggestions(error: &bundler::Error) -> Vec<String> {
    match (error.kind(), error.root_cause()) {
        (_, bundler::Error::ToolNotFound { tool, .. }) => vec![
            format!("Install `{tool}` and make sure it is on PATH"),
            "Point appdist at another executable with --toolchain or dist.toml".to_string(),
        ],
        (_, bundler::Error::ToolOutputMissing { role, command, path }) => vec![
            format!("`{command}` reported success without writing {}", path.display()),
            format!("Check that the configured {role} is the tool appdist expects"),
        ],
        (_, bundler::Error::Timeout { .. }) => vec![
            "Raise the limit with --timeout <secs> or [toolchain] timeout_secs".to_string(),
        ],
        (ErrorKind::Descriptor, _) => vec![
            "Check app.yml; required keys are id, name, version, main, icon".to_string(),
        ],
        (ErrorKind::Filesystem, _) => vec![
            "Check that the icon and main paths in app.yml exist".to_string(),
            "Check write permissions on the project's dist/ folder".to_string(),
        ],
        (ErrorKind::Build, _) => vec![
            "Run the build manually to see the full compiler output".to_string(),
        ],
        (ErrorKind::Packaging, _) => vec![
            "Check the dpkg-deb output above for the rejected field or file".to_string(),
        ],
        (ErrorKind::ImageFormat, _) => vec![
            "Use a PNG, JPEG, BMP or GIF icon, ideally 1024x1024".to_string(),
        ],
        (ErrorKind::Template | ErrorKind::Other, _) => {
            vec!["Check the error message above for specific details".to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::error::ToolRole;

    #[test]
    fn test_missing_tool_suggests_install() {
        let err = DistError::from(bundler::Error::Context(
            "error creating binary file".into(),
            Box::new(bundler::Error::ToolNotFound {
                role: ToolRole::Compiler,
                tool: "go".into(),
            }),
        ));
        let suggestions = err.recovery_suggestions();
        assert!(suggestions[0].contains("Install `go`"));
    }

    #[test]
    fn test_missing_descriptor_names_file() {
        let err = DistError::from(CliError::MissingDescriptor {
            path: PathBuf::from("/p"),
        });
        assert!(err.recovery_suggestions()[0].contains("app.yml"));
    }

    #[test]
    fn test_missing_tool_output_suggests_build_check() {
        let err = DistError::from(bundler::Error::ToolOutputMissing {
            role: ToolRole::Packager,
            command: "dpkg-deb --build foo".into(),
            path: PathBuf::from("/p/dist/linux/foo.deb"),
        });
        assert!(err.recovery_suggestions()[0].contains("dpkg-deb"));
    }

    #[test]
    fn test_invalid_arguments_point_at_help() {
        let err = DistError::from(CliError::InvalidArguments {
            reason: "--timeout must be greater than zero".into(),
        });
        assert!(err.to_string().contains("--timeout"));
        assert!(err.recovery_suggestions()[0].contains("--help"));
    }
}
