//! Platform packagers.
//!
//! Each supported platform has one packager implementing [`PlatformPackager`].
//! The CLI layer picks the variant; every variant resets its own workspace and
//! runs a fixed, ordered list of steps that aborts on the first failure.
//!
//! | Platform | Artifact | Module |
//! |----------|----------|--------|
//! | Linux | `dist/linux/<package>.deb` | [`linux`] |
//! | macOS | `dist/macos/<Name>.app` | [`macos`] |
//! | Windows | `dist/windows/<folder>.zip` | [`windows`] |
//!
//! Packagers never depend on the host OS: a Linux host can assemble a macOS
//! bundle as long as the toolchain can cross-compile.

pub mod linux;
pub mod macos;
pub mod windows;

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    workspace,
};
use crate::descriptor::AppDescriptor;
use std::{fmt, future::Future, path::Path, path::PathBuf};

pub use linux::LinuxPackager;
pub use macos::MacOsPackager;
pub use windows::WindowsPackager;

/// Target platform of a packaging run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Platform {
    /// Debian package.
    Linux,
    /// Application bundle.
    MacOs,
    /// Portable zip distribution.
    Windows,
}

impl Platform {
    /// All platforms, in CLI order.
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::MacOs, Platform::Windows];

    /// Workspace folder name under `dist/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
        }
    }

    /// Operating system name understood by the Go toolchain (`GOOS`).
    pub fn go_os(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "darwin",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The deliverable of a successful packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Platform the artifact was built for.
    pub platform: Platform,
    /// Archive file (Linux, Windows) or bundle directory (macOS).
    pub path: PathBuf,
    /// Workspace root the artifact lives in.
    pub workspace: PathBuf,
}

/// Produces a platform artifact from a descriptor and a project root.
pub trait PlatformPackager {
    /// Platform this packager targets.
    fn platform(&self) -> Platform;

    /// Runs the full pipeline, starting from a cleared workspace.
    fn package(
        &self,
        descriptor: &AppDescriptor,
        project_root: &Path,
    ) -> impl Future<Output = Result<Artifact>> + Send;
}

/// Checks inputs every pipeline needs before anything is built.
///
/// The icon is read late in some pipelines; checking it here keeps a typo in
/// `app.yml` from costing a full compile.
pub async fn preflight(descriptor: &AppDescriptor, project_root: &Path) -> Result<()> {
    let icon = descriptor.icon_path(project_root);
    let metadata = tokio::fs::metadata(&icon)
        .await
        .fs_context("error locating icon file", &icon)?;
    if !metadata.is_file() {
        return Err(Error::Fs {
            context: "error locating icon file",
            path: icon,
            error: std::io::Error::other("not a regular file"),
        });
    }

    let main = project_root.join(descriptor.main_path());
    tokio::fs::metadata(&main)
        .await
        .fs_context("error locating entry point", &main)?;

    Ok(())
}

/// Resets the workspace and runs [`preflight`], returning the workspace root.
pub(crate) async fn prepare(
    platform: Platform,
    descriptor: &AppDescriptor,
    project_root: &Path,
) -> Result<PathBuf> {
    let root = workspace::reset_workspace(project_root, platform).await?;
    preflight(descriptor, project_root).await?;
    Ok(root)
}

/// Step name logging shared by the pipelines.
pub(crate) fn announce(platform: Platform, description: &str) {
    log::info!("[{}] {}", platform, description);
}

/// Writes the Unix permission bits of a file the package installs.
#[cfg(unix)]
pub(crate) async fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .fs_context("error setting permissions", path)
}

#[cfg(not(unix))]
pub(crate) async fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::MacOs.dir_name(), "macos");
        assert_eq!(Platform::MacOs.go_os(), "darwin");
        assert_eq!(Platform::Windows.to_string(), "windows");
    }
}
