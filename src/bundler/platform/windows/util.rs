//! Manifest version normalization and portable archive creation.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Formats a free-form version as the 4-part numeric version manifests need.
///
/// Pre-release and build suffixes are dropped, each part keeps its leading
/// digits (0 when there are none) and is clamped to `u16`:
/// - "1" -> "1.0.0.0"
/// - "1.2.3" -> "1.2.3.0"
/// - "1.2.3-beta.1" -> "1.2.3.0"
/// - "1.2.3.4.5" -> "1.2.3.4"
pub fn format_manifest_version(version: &str) -> String {
    let core = version
        .split(['-', '+'])
        .next()
        .unwrap_or_default();

    let mut parts: Vec<u16> = core.split('.').take(4).map(numeric_prefix).collect();
    parts.resize(4, 0);

    parts
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

fn numeric_prefix(part: &str) -> u16 {
    let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(n) => n.min(u64::from(u16::MAX)) as u16,
        Err(_) if digits.is_empty() => 0,
        Err(_) => u16::MAX,
    }
}

/// Compresses `folder` into `dest`, keeping the folder name as the top-level
/// entry of the archive.
///
/// Entries are added in file-name order so equal trees give equal listings.
pub fn zip_folder(folder: &Path, dest: &Path) -> Result<PathBuf> {
    let base = folder.parent().unwrap_or(folder);
    let file = File::create(dest).fs_context("error creating zip file", dest)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let name = entry_name(path.strip_prefix(base)?);

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)?;
        } else {
            zip.start_file(name, options)?;
            let mut source = File::open(path).fs_context("error opening file for zip", path)?;
            io::copy(&mut source, &mut zip).fs_context("error writing zip entry", path)?;
        }
    }

    let mut writer = zip.finish()?;
    io::Write::flush(&mut writer).fs_context("error flushing zip file", dest)?;
    log::debug!("Zipped {} into {}", folder.display(), dest.display());
    Ok(dest.to_path_buf())
}

/// Archive entry names always use forward slashes.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Runs [`zip_folder`] on the blocking thread pool.
pub async fn zip_folder_async(folder: PathBuf, dest: PathBuf) -> Result<PathBuf> {
    tokio::task::spawn_blocking(move || zip_folder(&folder, &dest))
        .await
        .map_err(|e| Error::GenericError(format!("Zip task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_manifest_version_padding() {
        assert_eq!(format_manifest_version("1"), "1.0.0.0");
        assert_eq!(format_manifest_version("1.2"), "1.2.0.0");
        assert_eq!(format_manifest_version("1.2.3.4"), "1.2.3.4");
        assert_eq!(format_manifest_version("1.2.3.4.5"), "1.2.3.4");
    }

    #[test]
    fn test_manifest_version_drops_non_numeric() {
        assert_eq!(format_manifest_version("1.2.3-beta.1"), "1.2.3.0");
        assert_eq!(format_manifest_version("v2.1"), "0.1.0.0");
        assert_eq!(format_manifest_version("1.0rc1"), "1.0.0.0");
        assert_eq!(format_manifest_version("1.99999"), "1.65535.0.0");
        assert_eq!(format_manifest_version(""), "0.0.0.0");
    }

    #[test]
    fn test_zip_keeps_folder_prefix() {
        let temp = tempfile::tempdir().unwrap();
        let folder = temp.path().join("foo_1.0_amd64");
        std::fs::create_dir(&folder).unwrap();
        std::fs::write(folder.join("foo.exe"), b"MZ").unwrap();
        std::fs::write(folder.join("foo.ico"), b"ico").unwrap();

        let dest = temp.path().join("foo_1.0_amd64.zip");
        zip_folder(&folder, &dest).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let names: Vec<String> = archive.file_names().map(String::from).collect();
        assert!(names.contains(&"foo_1.0_amd64/".to_string()));
        assert!(names.contains(&"foo_1.0_amd64/foo.exe".to_string()));

        let mut exe = String::new();
        archive
            .by_name("foo_1.0_amd64/foo.exe")
            .unwrap()
            .read_to_string(&mut exe)
            .unwrap();
        assert_eq!(exe, "MZ");
    }
}
