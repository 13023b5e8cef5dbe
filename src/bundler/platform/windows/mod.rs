//! Windows packaging: a portable zip distribution.
//!
//! # Archive layout
//!
//! ```text
//! dist/windows/
//! ├── {id}_{version}_{arch}/
//! │   ├── {id}.exe
//! │   ├── {id}.exe.manifest
//! │   └── {id}.ico
//! └── {id}_{version}_{arch}.zip
//! ```
//!
//! The manifest sits next to the executable, where Windows picks it up as an
//! external side-by-side manifest. No installer is produced.

pub mod util;

use super::{Artifact, Platform, PlatformPackager, announce, prepare};
use crate::bundler::{
    error::{Context, ErrorExt, Result},
    process::CommandRunner,
    resources::icons::{IconFormat, write_icon},
    settings::{Arch, Settings},
    template::{self, Fields, escape_xml},
    toolchain, workspace,
};
use crate::descriptor::AppDescriptor;
use std::path::{Path, PathBuf};

/// Steps of the Windows pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowsStep {
    /// `{id}_{version}_{arch}/`
    CreateAppFolder,
    /// `{id}.exe.manifest`
    WriteManifest,
    /// `{id}.ico`
    PlaceIcon,
    /// `{id}.exe`
    BuildBinary,
    /// `{folder}.zip`
    BuildArchive,
}

impl WindowsStep {
    /// Every step, in the order the pipeline runs them.
    pub const ALL: [WindowsStep; 5] = [
        WindowsStep::CreateAppFolder,
        WindowsStep::WriteManifest,
        WindowsStep::PlaceIcon,
        WindowsStep::BuildBinary,
        WindowsStep::BuildArchive,
    ];

    /// Operation name used in logs and error context.
    pub fn description(self) -> &'static str {
        match self {
            WindowsStep::CreateAppFolder => "creating app folder",
            WindowsStep::WriteManifest => "creating manifest file",
            WindowsStep::PlaceIcon => "creating icon file",
            WindowsStep::BuildBinary => "creating binary file",
            WindowsStep::BuildArchive => "creating zip file",
        }
    }
}

/// Name of the portable folder (and, with `.zip`, of the archive).
pub fn portable_folder_name(descriptor: &AppDescriptor, arch: Arch) -> String {
    format!("{}_{}_{}", descriptor.id, descriptor.version, arch.windows())
}

/// Builds portable zip distributions.
#[derive(Debug)]
pub struct WindowsPackager<R> {
    settings: Settings,
    runner: R,
}

impl<R: CommandRunner> WindowsPackager<R> {
    /// Creates a packager driving the toolchain through `runner`.
    pub fn new(settings: Settings, runner: R) -> Self {
        Self { settings, runner }
    }

    async fn run_step(&self, step: WindowsStep, folder: &PortableFolder<'_>) -> Result<()> {
        let descriptor = folder.descriptor;
        match step {
            WindowsStep::CreateAppFolder => {
                workspace::create_dir_all(&folder.dir)
                    .await
                    .fs_context("error creating folder", &folder.dir)?;
            }
            WindowsStep::WriteManifest => {
                let long_id = escape_xml(&descriptor.long_id);
                let version = util::format_manifest_version(&descriptor.version);
                let name = escape_xml(&descriptor.name);
                let description = escape_xml(&descriptor.description);
                let fields = Fields::from([
                    ("LongID", long_id.as_str()),
                    ("Version", version.as_str()),
                    ("Architecture", folder.arch.windows()),
                    ("Name", name.as_str()),
                    ("Description", description.as_str()),
                ]);
                let manifest = folder.dir.join(format!("{}.exe.manifest", descriptor.id));
                template::write_rendered(template::APP_MANIFEST, &fields, &manifest).await?;
            }
            WindowsStep::PlaceIcon => {
                let source = descriptor.icon_path(folder.project_root);
                let dest = folder
                    .dir
                    .join(IconFormat::Ico.file_name(&descriptor.id, &source));
                write_icon(&source, IconFormat::Ico, &dest).await?;
            }
            WindowsStep::BuildBinary => {
                toolchain::build_binary(
                    &self.runner,
                    &self.settings,
                    folder.project_root,
                    &descriptor.main_path(),
                    &folder.binary_path(),
                    Platform::Windows,
                    folder.arch,
                )
                .await?;
            }
            WindowsStep::BuildArchive => {
                util::zip_folder_async(folder.dir.clone(), folder.archive_path()).await?;
            }
        }
        Ok(())
    }
}

impl<R: CommandRunner> PlatformPackager for WindowsPackager<R> {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    async fn package(&self, descriptor: &AppDescriptor, project_root: &Path) -> Result<Artifact> {
        let workspace = prepare(Platform::Windows, descriptor, project_root)
            .await
            .context("error preparing windows workspace")?;

        let arch = self.settings.arch();
        let folder = PortableFolder {
            descriptor,
            project_root,
            arch,
            dir: workspace::entry_path(&workspace, &portable_folder_name(descriptor, arch))?,
        };

        for step in WindowsStep::ALL {
            announce(Platform::Windows, step.description());
            self.run_step(step, &folder)
                .await
                .with_context(|| format!("error {}", step.description()))?;
        }

        let path = folder.archive_path();
        log::info!("Created {}", path.display());
        Ok(Artifact {
            platform: Platform::Windows,
            path,
            workspace,
        })
    }
}

struct PortableFolder<'a> {
    descriptor: &'a AppDescriptor,
    project_root: &'a Path,
    arch: Arch,
    dir: PathBuf,
}

impl PortableFolder<'_> {
    fn binary_path(&self) -> PathBuf {
        self.dir.join(format!("{}.exe", self.descriptor.id))
    }

    fn archive_path(&self) -> PathBuf {
        let mut name = self.dir.as_os_str().to_os_string();
        name.push(".zip");
        PathBuf::from(name)
    }
}
