//! # appdist
//!
//! Builds platform-native distributions of a cross-compiled application.
//!
//! A project root holds an `app.yml` descriptor naming the application, its
//! entry point and its icon. appdist cross-compiles the entry point and wraps
//! the result for the requested platform:
//!
//! - **Linux**: a Debian archive assembled by `dpkg-deb`
//! - **macOS**: an `.app` bundle with `Info.plist` and an ICNS icon
//! - **Windows**: a portable zip with the executable, a side-by-side manifest and an ICO icon
//!
//! ## Usage
//!
//! ```bash
//! appdist dist linux ./myapp
//! appdist dist macos ./myapp --toolchain /usr/local/go/bin/go
//! RUST_LOG=debug appdist dist windows ./myapp
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bundler;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;

// Re-export main types for public API
pub use bundler::{Artifact, Bundler, Platform};
pub use cli::Args;
pub use config::DistConfig;
pub use descriptor::AppDescriptor;
pub use error::{CliError, ConfigError, DistError, Result};
