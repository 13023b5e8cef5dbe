//! Packaging orchestration.
//!
//! [`Bundler`] loads the descriptor from a project root and hands it to the
//! packager for the requested [`Platform`].
//!
//! # Example
//!
//! ```no_run
//! use appdist::bundler::{Bundler, Platform, SettingsBuilder};
//! use std::path::Path;
//!
//! # async fn example() -> appdist::bundler::Result<()> {
//! let bundler = Bundler::new(SettingsBuilder::new().build());
//! let artifact = bundler.bundle(Platform::Linux, Path::new("./myapp")).await?;
//! println!("Created {}", artifact.path.display());
//! # Ok(())
//! # }
//! ```

use crate::bundler::{
    Artifact, Platform, Result, Settings,
    error::Context,
    platform::{LinuxPackager, MacOsPackager, PlatformPackager, WindowsPackager},
    process::{CommandRunner, SystemRunner},
};
use crate::descriptor::AppDescriptor;
use std::path::Path;

/// Main packaging orchestrator.
///
/// Generic over the [`CommandRunner`] so tests can observe every external
/// tool run without spawning processes.
#[derive(Debug)]
pub struct Bundler<R = SystemRunner> {
    settings: Settings,
    runner: R,
}

impl Bundler<SystemRunner> {
    /// Creates a bundler that runs real child processes, each limited by
    /// the settings' timeout.
    pub fn new(settings: Settings) -> Self {
        let runner = SystemRunner::new(settings.timeout());
        Self { settings, runner }
    }
}

impl<R: CommandRunner> Bundler<R> {
    /// Creates a bundler with a custom runner.
    pub fn with_runner(settings: Settings, runner: R) -> Self {
        Self { settings, runner }
    }

    /// Loads `app.yml` from `project_root` and packages it for `platform`.
    pub async fn bundle(&self, platform: Platform, project_root: &Path) -> Result<Artifact> {
        let descriptor = AppDescriptor::load_from_project(project_root)
            .context("error loading app descriptor")?;
        self.bundle_descriptor(platform, &descriptor, project_root)
            .await
    }

    /// Packages an already loaded descriptor for `platform`.
    pub async fn bundle_descriptor(
        &self,
        platform: Platform,
        descriptor: &AppDescriptor,
        project_root: &Path,
    ) -> Result<Artifact> {
        log::info!(
            "Packaging {} {} for {} ({})",
            descriptor.id,
            descriptor.version,
            platform,
            self.settings.arch()
        );

        let result = match platform {
            Platform::Linux => {
                LinuxPackager::new(self.settings.clone(), &self.runner)
                    .package(descriptor, project_root)
                    .await
            }
            Platform::MacOs => {
                MacOsPackager::new(self.settings.clone(), &self.runner)
                    .package(descriptor, project_root)
                    .await
            }
            Platform::Windows => {
                WindowsPackager::new(self.settings.clone(), &self.runner)
                    .package(descriptor, project_root)
                    .await
            }
        };

        result.with_context(|| format!("error packaging for {platform}"))
    }
}
