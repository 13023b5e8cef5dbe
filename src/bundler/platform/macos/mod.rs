//! macOS packaging: an unsigned `.app` bundle.
//!
//! # Bundle layout
//!
//! ```text
//! dist/macos/{Name}.app/
//! └── Contents/
//!     ├── Info.plist
//!     ├── MacOS/{id}
//!     └── Resources/{id}.icns
//! ```
//!
//! The bundle directory itself is the artifact; no disk image is produced.

pub mod app;

use super::{Artifact, Platform, PlatformPackager, announce, prepare, set_mode};
use crate::bundler::{
    error::{Context, Result},
    process::CommandRunner,
    settings::Settings,
    toolchain, workspace,
};
use crate::descriptor::AppDescriptor;
use std::path::{Path, PathBuf};

/// Steps of the macOS pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacOsStep {
    /// `{Name}.app/`
    CreateAppFolder,
    /// `Contents/`
    CreateContentsFolder,
    /// `Contents/Resources/`
    CreateResourcesFolder,
    /// `Contents/Info.plist`
    WriteInfoFile,
    /// `Contents/Resources/{id}.icns`
    PlaceIcon,
    /// `Contents/MacOS/{id}`
    BuildBinary,
}

impl MacOsStep {
    /// Every step, in the order the pipeline runs them.
    pub const ALL: [MacOsStep; 6] = [
        MacOsStep::CreateAppFolder,
        MacOsStep::CreateContentsFolder,
        MacOsStep::CreateResourcesFolder,
        MacOsStep::WriteInfoFile,
        MacOsStep::PlaceIcon,
        MacOsStep::BuildBinary,
    ];

    /// Operation name used in logs and error context.
    pub fn description(self) -> &'static str {
        match self {
            MacOsStep::CreateAppFolder => "creating app folder",
            MacOsStep::CreateContentsFolder => "creating contents folder",
            MacOsStep::CreateResourcesFolder => "creating resources folder",
            MacOsStep::WriteInfoFile => "creating info file",
            MacOsStep::PlaceIcon => "creating icon file",
            MacOsStep::BuildBinary => "creating binary file",
        }
    }
}

/// Builds `.app` bundles.
#[derive(Debug)]
pub struct MacOsPackager<R> {
    settings: Settings,
    runner: R,
}

impl<R: CommandRunner> MacOsPackager<R> {
    /// Creates a packager driving the toolchain through `runner`.
    pub fn new(settings: Settings, runner: R) -> Self {
        Self { settings, runner }
    }

    async fn run_step(&self, step: MacOsStep, bundle: &AppBundle<'_>) -> Result<()> {
        match step {
            MacOsStep::CreateAppFolder => app::create_folder(&bundle.app_dir).await,
            MacOsStep::CreateContentsFolder => app::create_folder(&bundle.contents_dir()).await,
            MacOsStep::CreateResourcesFolder => app::create_folder(&bundle.resources_dir()).await,
            MacOsStep::WriteInfoFile => {
                app::write_info_plist(&bundle.contents_dir(), bundle.descriptor).await?;
                Ok(())
            }
            MacOsStep::PlaceIcon => {
                app::write_bundle_icon(
                    bundle.project_root,
                    &bundle.resources_dir(),
                    bundle.descriptor,
                )
                .await?;
                Ok(())
            }
            MacOsStep::BuildBinary => {
                let output = bundle.binary_path();
                toolchain::build_binary(
                    &self.runner,
                    &self.settings,
                    bundle.project_root,
                    &bundle.descriptor.main_path(),
                    &output,
                    Platform::MacOs,
                    self.settings.arch(),
                )
                .await?;
                set_mode(&output, 0o755).await
            }
        }
    }
}

impl<R: CommandRunner> PlatformPackager for MacOsPackager<R> {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    async fn package(&self, descriptor: &AppDescriptor, project_root: &Path) -> Result<Artifact> {
        let workspace = prepare(Platform::MacOs, descriptor, project_root)
            .await
            .context("error preparing macos workspace")?;

        let bundle = AppBundle {
            descriptor,
            project_root,
            app_dir: workspace::entry_path(&workspace, &app::bundle_name(descriptor))?,
        };

        for step in MacOsStep::ALL {
            announce(Platform::MacOs, step.description());
            self.run_step(step, &bundle)
                .await
                .with_context(|| format!("error {}", step.description()))?;
        }

        log::info!("Created {}", bundle.app_dir.display());
        Ok(Artifact {
            platform: Platform::MacOs,
            path: bundle.app_dir,
            workspace,
        })
    }
}

struct AppBundle<'a> {
    descriptor: &'a AppDescriptor,
    project_root: &'a Path,
    app_dir: PathBuf,
}

impl AppBundle<'_> {
    fn contents_dir(&self) -> PathBuf {
        self.app_dir.join("Contents")
    }

    fn resources_dir(&self) -> PathBuf {
        self.contents_dir().join("Resources")
    }

    fn binary_path(&self) -> PathBuf {
        self.contents_dir().join("MacOS").join(&self.descriptor.id)
    }
}
