//! Per-platform distribution workspace under `<project>/dist/<platform>`.
//!
//! Every packaging run starts from an empty workspace; nothing survives from
//! a previous run.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    platform::Platform,
};
use std::path::{Component, Path, PathBuf};

/// Name of the folder holding all platform workspaces.
pub const DIST_FOLDER_NAME: &str = "dist";

/// Permission bits for every directory the packagers create.
#[cfg(unix)]
pub(crate) const DIR_MODE: u32 = 0o755;

/// Location of the workspace for `platform`, without touching the filesystem.
pub fn workspace_path(project_root: &Path, platform: Platform) -> PathBuf {
    project_root.join(DIST_FOLDER_NAME).join(platform.dir_name())
}

/// Removes any existing workspace for `platform` and recreates it empty.
///
/// Returns the workspace root.
pub async fn reset_workspace(project_root: &Path, platform: Platform) -> Result<PathBuf> {
    let root = workspace_path(project_root, platform);

    match tokio::fs::remove_dir_all(&root).await {
        Ok(()) => log::debug!("Removed previous workspace {}", root.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e).fs_context("error removing existing folder", &root),
    }

    create_dir_all(&root)
        .await
        .fs_context("error creating new folder", &root)?;

    log::info!("Prepared blank workspace {}", root.display());
    Ok(root)
}

/// Path of the top-level entry `name` inside the workspace `root`.
///
/// `name` must be a single normal path component, so the entry's parent is
/// always `root`.
pub fn entry_path(root: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(root.join(name)),
        _ => Err(Error::OutsideWorkspace {
            workspace: root.to_path_buf(),
            name: name.to_string(),
        }),
    }
}

/// Creates `path` and any missing parents with the workspace directory mode.
pub(crate) async fn create_dir_all(path: &Path) -> std::io::Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(path).await
}

/// Creates exactly `path`; its parent must already exist.
pub(crate) async fn create_dir(path: &Path) -> std::io::Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(path).await
}
