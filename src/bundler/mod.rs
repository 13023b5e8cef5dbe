//! Platform-native packaging of cross-compiled applications.
//!
//! This module turns a project described by `app.yml` into a Debian archive,
//! a macOS application bundle, or a portable Windows zip.
//!
//! # Supported Formats
//!
//! | Platform | Artifact | External tools |
//! |----------|----------|----------------|
//! | Linux | `.deb` | toolchain, `dpkg-deb` |
//! | macOS | `.app` | toolchain |
//! | Windows | `.zip` | toolchain |
//!
//! Every run starts by clearing `dist/<platform>` under the project root and
//! stops at the first failing step.
//!
//! # Integration
//!
//! ```no_run
//! use appdist::bundler::{Bundler, Platform, SettingsBuilder};
//! use std::{path::Path, time::Duration};
//!
//! # async fn example() -> appdist::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .timeout(Duration::from_secs(300))
//!     .build();
//!
//! let artifact = Bundler::new(settings)
//!     .bundle(Platform::MacOs, Path::new("./myapp"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod builder;
pub mod error;
pub mod platform;
pub mod process;
pub mod resources;
pub mod settings;
pub mod template;
pub mod toolchain;
pub mod workspace;

// Public re-exports
pub use builder::Bundler;
pub use error::{Error, ErrorKind, Result};
pub use platform::{Artifact, Platform, PlatformPackager};
pub use process::{CommandRunner, Invocation, SystemRunner};
pub use settings::{Arch, Settings, SettingsBuilder};
