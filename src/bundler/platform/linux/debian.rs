//! Debian metadata and archive assembly.
//!
//! The package folder is turned into a `.deb` by the system `dpkg-deb`,
//! run from the workspace root with `--root-owner-group` so every installed
//! file is owned by root regardless of who ran the build.

use crate::bundler::{
    error::{Error, ErrorExt, Result, ToolRole},
    process::{CommandRunner, Invocation},
    settings::{Arch, Settings},
    template::{self, Fields},
    workspace,
};
use crate::descriptor::AppDescriptor;
use std::path::{Path, PathBuf};

/// Placeholder values for the `DEBIAN/control` template.
pub fn control_fields(descriptor: &AppDescriptor, arch: Arch) -> Fields<'_> {
    Fields::from([
        ("Package", descriptor.id.as_str()),
        ("Version", descriptor.version.as_str()),
        ("Architecture", arch.debian()),
        ("Maintainer", descriptor.contact.as_str()),
        ("Description", descriptor.description.as_str()),
    ])
}

/// Creates `DEBIAN/` inside the package folder and renders `control` into it.
pub async fn write_control_file(
    package_folder: &Path,
    descriptor: &AppDescriptor,
    arch: Arch,
) -> Result<PathBuf> {
    let debian_dir = package_folder.join("DEBIAN");
    workspace::create_dir(&debian_dir)
        .await
        .fs_context("error creating DEBIAN folder", &debian_dir)?;

    let control = debian_dir.join("control");
    template::write_rendered(
        template::CONTROL,
        &control_fields(descriptor, arch),
        &control,
    )
    .await?;
    Ok(control)
}

/// Describes the `dpkg-deb` run turning `folder_name` into an archive.
pub fn archive_invocation(settings: &Settings, workspace_root: &Path, folder_name: &str) -> Invocation {
    Invocation::new(ToolRole::Packager, settings.deb_builder(), workspace_root)
        .arg("--build")
        .arg("--root-owner-group")
        .arg(folder_name)
}

/// Builds `<folder_name>.deb` next to the package folder and returns its path.
pub async fn build_archive<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    workspace_root: &Path,
    folder_name: &str,
) -> Result<PathBuf> {
    let invocation = archive_invocation(settings, workspace_root, folder_name);
    runner.run(&invocation).await?;

    let archive = workspace_root.join(format!("{folder_name}.deb"));
    if !archive.is_file() {
        return Err(Error::ToolOutputMissing {
            role: ToolRole::Packager,
            command: invocation.command_line(),
            path: archive,
        });
    }
    Ok(archive)
}
