//! freedesktop.org integration: the application menu entry and its icon.
//!
//! Both the entry's `Icon=` and `Exec=` refer to the application id, which
//! resolves against the hicolor theme and `/usr/local/bin` once installed.

use crate::bundler::{
    error::{ErrorExt, Result},
    resources::icons::{IconFormat, write_icon},
    template::{self, Fields},
    workspace,
};
use crate::descriptor::AppDescriptor;
use std::path::{Path, PathBuf};

/// Size directory the icon is installed under.
pub const ICON_THEME_SIZE: &str = "512x512";

/// Placeholder values for the desktop entry template.
pub fn desktop_fields(descriptor: &AppDescriptor) -> Fields<'_> {
    Fields::from([
        ("Name", descriptor.name.as_str()),
        ("Comment", descriptor.description.as_str()),
        ("Icon", descriptor.id.as_str()),
        ("Exec", descriptor.id.as_str()),
    ])
}

/// Writes `usr/share/applications/{id}.desktop`.
pub async fn write_desktop_entry(package_folder: &Path, descriptor: &AppDescriptor) -> Result<PathBuf> {
    let apps_dir = package_folder.join("usr").join("share").join("applications");
    workspace::create_dir_all(&apps_dir)
        .await
        .fs_context("error creating /usr/share/applications folder", &apps_dir)?;

    let entry = apps_dir.join(format!("{}.desktop", descriptor.id));
    template::write_rendered(template::DESKTOP_ENTRY, &desktop_fields(descriptor), &entry).await?;
    Ok(entry)
}

/// Copies the source icon into the hicolor theme as `{id}.{source ext}`.
pub async fn install_icon(
    project_root: &Path,
    package_folder: &Path,
    descriptor: &AppDescriptor,
) -> Result<PathBuf> {
    let icons_dir = package_folder
        .join("usr")
        .join("share")
        .join("icons")
        .join("hicolor")
        .join(ICON_THEME_SIZE)
        .join("apps");
    workspace::create_dir_all(&icons_dir)
        .await
        .fs_context("error creating icon theme folder", &icons_dir)?;

    let source = descriptor.icon_path(project_root);
    let dest = icons_dir.join(IconFormat::Copy.file_name(&descriptor.id, &source));
    write_icon(&source, IconFormat::Copy, &dest).await?;
    Ok(dest)
}
