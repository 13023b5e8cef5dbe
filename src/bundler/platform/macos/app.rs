//! `.app` bundle layout and metadata.

use crate::bundler::{
    error::{ErrorExt, Result},
    resources::icons::{IconFormat, write_icon},
    template::{self, Fields, escape_xml},
    workspace,
};
use crate::descriptor::AppDescriptor;
use std::path::{Path, PathBuf};

/// Bundle directory name, `{Name}.app`.
pub fn bundle_name(descriptor: &AppDescriptor) -> String {
    format!("{}.app", descriptor.name)
}

/// Creates `dir` (and missing parents) inside the bundle.
pub async fn create_folder(dir: &Path) -> Result<()> {
    workspace::create_dir_all(dir)
        .await
        .fs_context("error creating folder", dir)
}

/// Renders `Contents/Info.plist`, escaping every value for XML.
pub async fn write_info_plist(contents_dir: &Path, descriptor: &AppDescriptor) -> Result<PathBuf> {
    let id = escape_xml(&descriptor.id);
    let long_id = escape_xml(&descriptor.long_id);
    let name = escape_xml(&descriptor.name);
    let copyright = escape_xml(&descriptor.copyright);
    let version = escape_xml(&descriptor.version);

    let fields = Fields::from([
        ("ID", id.as_str()),
        ("LongID", long_id.as_str()),
        ("Name", name.as_str()),
        ("Copyright", copyright.as_str()),
        ("Executable", id.as_str()),
        ("Version", version.as_str()),
    ]);

    let plist = contents_dir.join("Info.plist");
    template::write_rendered(template::INFO_PLIST, &fields, &plist).await?;
    Ok(plist)
}

/// Encodes the source icon as `Resources/{id}.icns`.
pub async fn write_bundle_icon(
    project_root: &Path,
    resources_dir: &Path,
    descriptor: &AppDescriptor,
) -> Result<PathBuf> {
    let source = descriptor.icon_path(project_root);
    let dest = resources_dir.join(IconFormat::Icns.file_name(&descriptor.id, &source));
    write_icon(&source, IconFormat::Icns, &dest).await?;
    Ok(dest)
}
