//! Error types for packaging operations.
//!
//! Provides contextual error chaining, filesystem errors that carry the path
//! being touched, and dedicated variants for every external tool the pipelines
//! drive.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **ErrorKind**: Classify a wrapped error chain into a stable taxonomy
//!
//! # Example
//!
//! ```no_run
//! use appdist::bundler::error::{Context, ErrorExt, Result};
//! use std::path::Path;
//!
//! fn read_control(path: &Path) -> Result<String> {
//!     let text = std::fs::read_to_string(path)
//!         .fs_context("reading control file", path)?;
//!     Ok(text)
//! }
//!
//! fn check(path: &Path) -> Result<()> {
//!     read_control(path).context("error verifying package metadata")?;
//!     Ok(())
//! }
//! ```

use std::{
    fmt::{self, Display},
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Role an external tool plays in a pipeline.
///
/// Decides whether a tool failure is reported as a build or a packaging error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRole {
    /// Cross-compiling toolchain (e.g. `go build`).
    Compiler,
    /// Archive builder (e.g. `dpkg-deb`).
    Packager,
}

impl Display for ToolRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolRole::Compiler => f.write_str("compiler"),
            ToolRole::Packager => f.write_str("package builder"),
        }
    }
}

/// Stable classification of packaging failures.
///
/// Every [`Error`] maps to exactly one kind, looking through any
/// [`Error::Context`] wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed `app.yml`.
    Descriptor,
    /// Create, remove, copy or write failures, including missing source paths.
    Filesystem,
    /// Malformed template or a field missing from the render data.
    Template,
    /// The compiler could not be found, failed, or timed out.
    Build,
    /// The archive builder could not be found, failed, or timed out.
    Packaging,
    /// The source icon could not be decoded or encoded.
    ImageFormat,
    /// Anything else.
    Other,
}

/// Errors returned by the packaging pipelines.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "creating DEBIAN folder")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// The descriptor file is missing or unreadable.
    #[error("cannot read descriptor {path}: {error}")]
    DescriptorRead {
        /// Descriptor location
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// The descriptor file could not be parsed.
    #[error("malformed descriptor {path}: {error}")]
    DescriptorParse {
        /// Descriptor location
        path: PathBuf,
        /// The underlying YAML error
        error: serde_yaml::Error,
    },

    /// The descriptor parsed but a field is missing or unusable.
    #[error("invalid descriptor field `{field}`: {reason}")]
    InvalidDescriptor {
        /// YAML key of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The compiler ran and exited unsuccessfully.
    #[error("build command `{command}` failed ({})", exit_description(.code))]
    Build {
        /// Rendered command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// The archive builder ran and exited unsuccessfully.
    #[error("packaging command `{command}` failed ({})", exit_description(.code))]
    Packaging {
        /// Rendered command line
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// An external tool is not on PATH.
    #[error("{role} `{tool}` not found in PATH")]
    ToolNotFound {
        /// What the tool is used for
        role: ToolRole,
        /// Program name that was looked up
        tool: String,
    },

    /// Child process could not be spawned or awaited.
    #[error("failed to run {role} command `{command}`: {error}")]
    CommandFailed {
        /// What the tool is used for
        role: ToolRole,
        /// Rendered command line
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// The tool exited successfully but its output file is missing.
    #[error("`{command}` succeeded but produced nothing at {}", .path.display())]
    ToolOutputMissing {
        /// What the tool is used for
        role: ToolRole,
        /// Rendered command line
        command: String,
        /// File the tool was expected to write
        path: PathBuf,
    },

    /// A name derived from the descriptor does not stay inside the workspace.
    #[error("`{name}` does not name an entry directly inside {}", .workspace.display())]
    OutsideWorkspace {
        /// Workspace root
        workspace: PathBuf,
        /// Offending entry name
        name: String,
    },

    /// Child process exceeded its time limit and was killed.
    #[error("{role} command `{command}` timed out after {secs}s")]
    Timeout {
        /// What the tool is used for
        role: ToolRole,
        /// Rendered command line
        command: String,
        /// Limit that was exceeded
        secs: u64,
    },

    /// The source icon could not be decoded.
    #[error("unsupported icon image {path}: {error}")]
    ImageFormat {
        /// Icon source path
        path: PathBuf,
        /// The underlying decoder error
        error: image::ImageError,
    },

    /// Encoding into an icon container failed.
    #[error("icon encoding failed: {0}")]
    IconEncoding(String),

    /// Handlebars template rendering error.
    #[error("{0}")]
    HandleBarsError(#[from] handlebars::RenderError),

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking a directory tree.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// ZIP archive creation error.
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl Error {
    /// Classifies this error, looking through context wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Context(_, inner) => inner.kind(),
            Error::Fs { .. }
            | Error::IoError(_)
            | Error::WalkdirError(_)
            | Error::StripError(_)
            | Error::ZipError(_)
            | Error::OutsideWorkspace { .. } => ErrorKind::Filesystem,
            Error::DescriptorRead { .. }
            | Error::DescriptorParse { .. }
            | Error::InvalidDescriptor { .. } => ErrorKind::Descriptor,
            Error::HandleBarsError(_) => ErrorKind::Template,
            Error::Build { .. } => ErrorKind::Build,
            Error::Packaging { .. } => ErrorKind::Packaging,
            Error::ToolNotFound { role, .. }
            | Error::CommandFailed { role, .. }
            | Error::ToolOutputMissing { role, .. }
            | Error::Timeout { role, .. } => match role {
                ToolRole::Compiler => ErrorKind::Build,
                ToolRole::Packager => ErrorKind::Packaging,
            },
            Error::ImageFormat { .. } | Error::IconEncoding(_) => ErrorKind::ImageFormat,
            Error::GenericError(_) => ErrorKind::Other,
        }
    }

    /// Returns the innermost error of a context chain.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context(_, inner) => inner.root_cause(),
            other => other,
        }
    }
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with the bundler's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying icon".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}
