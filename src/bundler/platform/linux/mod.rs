//! Linux packaging: a Debian archive built by `dpkg-deb`.
//!
//! # Package layout
//!
//! ```text
//! dist/linux/
//! ├── {id}_{version}-{timestamp}_{arch}/
//! │   ├── DEBIAN/control
//! │   └── usr/
//! │       ├── local/bin/{id}
//! │       └── share/
//! │           ├── applications/{id}.desktop
//! │           └── icons/hicolor/512x512/apps/{id}.{ext}
//! └── {id}_{version}-{timestamp}_{arch}.deb
//! ```
//!
//! # Build Requirements
//!
//! | Step | Required Tool |
//! |------|---------------|
//! | binary | toolchain compiler (`go` by default) |
//! | archive | `dpkg-deb` |

pub mod debian;
pub mod freedesktop;

use super::{Artifact, Platform, PlatformPackager, announce, prepare, set_mode};
use crate::bundler::{
    error::{Context, ErrorExt, Result},
    process::CommandRunner,
    settings::{Arch, Settings},
    toolchain, workspace,
};
use crate::descriptor::AppDescriptor;
use std::path::{Path, PathBuf};

/// Steps of the Linux pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinuxStep {
    /// `{id}_{version}-{timestamp}_{arch}/`
    CreatePackageFolder,
    /// `DEBIAN/control`
    WriteControlFile,
    /// `usr/local/bin/{id}`
    BuildBinary,
    /// `usr/share/applications/{id}.desktop`
    WriteDesktopFile,
    /// `usr/share/icons/hicolor/512x512/apps/{id}.{ext}`
    PlaceIcon,
    /// `{package folder}.deb`
    BuildArchive,
}

impl LinuxStep {
    /// Every step, in the order the pipeline runs them.
    pub const ALL: [LinuxStep; 6] = [
        LinuxStep::CreatePackageFolder,
        LinuxStep::WriteControlFile,
        LinuxStep::BuildBinary,
        LinuxStep::WriteDesktopFile,
        LinuxStep::PlaceIcon,
        LinuxStep::BuildArchive,
    ];

    /// Operation name used in logs and error context.
    pub fn description(self) -> &'static str {
        match self {
            LinuxStep::CreatePackageFolder => "creating package folder",
            LinuxStep::WriteControlFile => "creating control file",
            LinuxStep::BuildBinary => "creating binary file",
            LinuxStep::WriteDesktopFile => "creating desktop file",
            LinuxStep::PlaceIcon => "creating icon file",
            LinuxStep::BuildArchive => "creating deb file",
        }
    }
}

/// Name of the package folder (and, with `.deb`, of the archive).
pub fn package_folder_name(descriptor: &AppDescriptor, timestamp: i64, arch: Arch) -> String {
    format!(
        "{}_{}-{}_{}",
        descriptor.id,
        descriptor.version,
        timestamp,
        arch.debian()
    )
}

/// Install location of the binary inside the package folder.
pub fn binary_path(package_folder: &Path, descriptor: &AppDescriptor) -> PathBuf {
    package_folder
        .join("usr")
        .join("local")
        .join("bin")
        .join(&descriptor.id)
}

/// Builds Debian packages.
#[derive(Debug)]
pub struct LinuxPackager<R> {
    settings: Settings,
    runner: R,
}

impl<R: CommandRunner> LinuxPackager<R> {
    /// Creates a packager driving external tools through `runner`.
    pub fn new(settings: Settings, runner: R) -> Self {
        Self { settings, runner }
    }

    async fn run_step(&self, step: LinuxStep, build: &mut DebBuild<'_>) -> Result<()> {
        match step {
            LinuxStep::CreatePackageFolder => {
                let name = package_folder_name(
                    build.descriptor,
                    chrono::Utc::now().timestamp(),
                    build.arch,
                );
                let folder = workspace::entry_path(&build.workspace, &name)?;
                workspace::create_dir_all(&folder)
                    .await
                    .fs_context("error creating folder", &folder)?;
                log::debug!("Package folder {}", folder.display());
                build.package_folder = Some(folder);
            }
            LinuxStep::WriteControlFile => {
                debian::write_control_file(build.package_folder()?, build.descriptor, build.arch)
                    .await?;
            }
            LinuxStep::BuildBinary => {
                let output = binary_path(build.package_folder()?, build.descriptor);
                toolchain::build_binary(
                    &self.runner,
                    &self.settings,
                    build.project_root,
                    &build.descriptor.main_path(),
                    &output,
                    Platform::Linux,
                    build.arch,
                )
                .await?;
                set_mode(&output, 0o755).await?;
            }
            LinuxStep::WriteDesktopFile => {
                freedesktop::write_desktop_entry(build.package_folder()?, build.descriptor).await?;
            }
            LinuxStep::PlaceIcon => {
                freedesktop::install_icon(
                    build.project_root,
                    build.package_folder()?,
                    build.descriptor,
                )
                .await?;
            }
            LinuxStep::BuildArchive => {
                let folder_name = build
                    .package_folder()?
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .context("package folder has no name")?;
                let archive = debian::build_archive(
                    &self.runner,
                    &self.settings,
                    &build.workspace,
                    &folder_name,
                )
                .await?;
                build.archive = Some(archive);
            }
        }
        Ok(())
    }
}

impl<R: CommandRunner> PlatformPackager for LinuxPackager<R> {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    async fn package(&self, descriptor: &AppDescriptor, project_root: &Path) -> Result<Artifact> {
        let workspace = prepare(Platform::Linux, descriptor, project_root)
            .await
            .context("error preparing linux workspace")?;

        let mut build = DebBuild {
            descriptor,
            project_root,
            workspace,
            arch: self.settings.arch(),
            package_folder: None,
            archive: None,
        };

        for step in LinuxStep::ALL {
            announce(Platform::Linux, step.description());
            self.run_step(step, &mut build)
                .await
                .with_context(|| format!("error {}", step.description()))?;
        }

        let path = build.archive.context("deb archive missing after pipeline")?;
        log::info!("Created {}", path.display());
        Ok(Artifact {
            platform: Platform::Linux,
            path,
            workspace: build.workspace,
        })
    }
}

/// Paths accumulated while the Linux pipeline runs.
struct DebBuild<'a> {
    descriptor: &'a AppDescriptor,
    project_root: &'a Path,
    workspace: PathBuf,
    arch: Arch,
    package_folder: Option<PathBuf>,
    archive: Option<PathBuf>,
}

impl DebBuild<'_> {
    fn package_folder(&self) -> Result<&Path> {
        self.package_folder
            .as_deref()
            .context("package folder has not been created")
    }
}
