//! Icon conversion for multi-platform packaging.
//!
//! The descriptor names a single raster icon. Each platform wants it in a
//! different shape:
//!
//! | Platform | Output | Sizes |
//! |----------|--------|-------|
//! | Linux | source bytes, source extension | unchanged |
//! | macOS | ICNS | 16, 32, 64, 128, 256, 512, 1024 (incl. @2x) |
//! | Windows | ICO | 16, 24, 32, 48, 64, 128, 256 |
//!
//! Container sizes larger than the source are skipped rather than upscaled,
//! except that the smallest size is always present so the container is never
//! empty.

use crate::bundler::error::{Error, ErrorExt, Result};
use icns::{IconFamily, IconType, Image as IcnsImage, PixelFormat};
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::{DynamicImage, imageops::FilterType};
use std::path::{Path, PathBuf};

/// Target icon representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFormat {
    /// Byte-for-byte copy of the source (Linux hicolor theme).
    Copy,
    /// Apple icon container.
    Icns,
    /// Windows icon container.
    Ico,
}

impl IconFormat {
    /// File extension (without dot) of the converted icon.
    ///
    /// [`IconFormat::Copy`] keeps the source's extension, which may be empty.
    pub fn extension(self, source: &Path) -> String {
        match self {
            IconFormat::Copy => source
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
            IconFormat::Icns => "icns".to_string(),
            IconFormat::Ico => "ico".to_string(),
        }
    }

    /// File name for the converted icon of an application with id `stem`.
    pub fn file_name(self, stem: &str, source: &Path) -> String {
        match self.extension(source).as_str() {
            "" => stem.to_string(),
            ext => format!("{stem}.{ext}"),
        }
    }
}

const ICNS_TYPES: [(IconType, u32); 11] = [
    (IconType::RGBA32_16x16, 16),
    (IconType::RGBA32_16x16_2x, 32),
    (IconType::RGBA32_32x32, 32),
    (IconType::RGBA32_32x32_2x, 64),
    (IconType::RGBA32_64x64, 64),
    (IconType::RGBA32_128x128, 128),
    (IconType::RGBA32_128x128_2x, 256),
    (IconType::RGBA32_256x256, 256),
    (IconType::RGBA32_256x256_2x, 512),
    (IconType::RGBA32_512x512, 512),
    (IconType::RGBA32_512x512_2x, 1024),
];

const ICO_SIZES: [u32; 7] = [16, 24, 32, 48, 64, 128, 256];

/// Converts the icon at `source` into `format`, returning the encoded bytes.
///
/// A missing source is a filesystem error; a source that cannot be decoded
/// is an image format error.
pub fn convert_icon(source: &Path, format: IconFormat) -> Result<Vec<u8>> {
    let bytes = std::fs::read(source).fs_context("error opening icon file", source)?;

    match format {
        IconFormat::Copy => Ok(bytes),
        IconFormat::Icns => encode_icns(&decode(source, &bytes)?),
        IconFormat::Ico => encode_ico(&decode(source, &bytes)?),
    }
}

/// Converts `source` and writes the result to `dest`.
///
/// Decoding and resizing run on the blocking thread pool.
pub async fn write_icon(source: &Path, format: IconFormat, dest: &Path) -> Result<()> {
    let source_path = source.to_path_buf();
    let encoded = tokio::task::spawn_blocking(move || convert_icon(&source_path, format))
        .await
        .map_err(|e| Error::GenericError(format!("Icon conversion task failed: {}", e)))??;

    tokio::fs::write(dest, &encoded)
        .await
        .fs_context("error creating icon file", dest)?;

    log::debug!(
        "Wrote {:?} icon ({} bytes) from {} to {}",
        format,
        encoded.len(),
        source.display(),
        dest.display()
    );
    Ok(())
}

fn decode(source: &Path, bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|error| Error::ImageFormat {
        path: PathBuf::from(source),
        error,
    })
}

/// Sizes from `sizes` that do not require upscaling `img`.
fn usable_sizes(img: &DynamicImage, sizes: impl IntoIterator<Item = u32>) -> Vec<u32> {
    let limit = img.width().max(img.height());
    let mut sizes: Vec<u32> = sizes.into_iter().collect();
    let smallest = sizes.iter().copied().min();
    sizes.retain(|&size| size <= limit || Some(size) == smallest);
    sizes
}

fn resized_rgba(img: &DynamicImage, size: u32) -> Vec<u8> {
    img.resize_exact(size, size, FilterType::Lanczos3)
        .to_rgba8()
        .into_raw()
}

fn encode_icns(img: &DynamicImage) -> Result<Vec<u8>> {
    let sizes = usable_sizes(img, ICNS_TYPES.iter().map(|(_, size)| *size));
    let mut family = IconFamily::new();

    for (icon_type, size) in ICNS_TYPES {
        if !sizes.contains(&size) {
            continue;
        }
        let icns_img = IcnsImage::from_data(PixelFormat::RGBA, size, size, resized_rgba(img, size))
            .map_err(|e| Error::IconEncoding(format!("creating ICNS image {size}x{size}: {e}")))?;
        family
            .add_icon_with_type(&icns_img, icon_type)
            .map_err(|e| Error::IconEncoding(format!("adding {icon_type:?} to icon family: {e}")))?;
    }

    let mut out = Vec::new();
    family
        .write(&mut out)
        .map_err(|e| Error::IconEncoding(format!("writing ICNS data: {e}")))?;
    Ok(out)
}

fn encode_ico(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut icon_dir = IconDir::new(ResourceType::Icon);

    for size in usable_sizes(img, ICO_SIZES) {
        let icon_image = IconImage::from_rgba_data(size, size, resized_rgba(img, size));
        let entry = IconDirEntry::encode(&icon_image)
            .map_err(|e| Error::IconEncoding(format!("encoding {size}x{size} icon: {e}")))?;
        icon_dir.add_entry(entry);
    }

    let mut out = Vec::new();
    icon_dir
        .write(&mut out)
        .map_err(|e| Error::IconEncoding(format!("writing ICO data: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::error::ErrorKind;
    use image::{ImageBuffer, Rgba};

    fn write_png(dir: &Path, name: &str, size: u32) -> PathBuf {
        let path = dir.join(name);
        ImageBuffer::from_pixel(size, size, Rgba([200u8, 40, 40, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_copy_is_identity() {
        let temp = tempfile::tempdir().unwrap();
        let png = write_png(temp.path(), "icon.png", 8);
        let converted = convert_icon(&png, IconFormat::Copy).unwrap();
        assert_eq!(converted, std::fs::read(&png).unwrap());
    }

    #[test]
    fn test_copy_accepts_undecodable_bytes() {
        let temp = tempfile::tempdir().unwrap();
        let svg = temp.path().join("icon.svg");
        std::fs::write(&svg, "<svg/>").unwrap();
        assert_eq!(convert_icon(&svg, IconFormat::Copy).unwrap(), b"<svg/>");
    }

    #[test]
    fn test_extension_follows_format() {
        let src = Path::new("assets/icon.png");
        assert_eq!(IconFormat::Copy.file_name("foo", src), "foo.png");
        assert_eq!(IconFormat::Icns.file_name("foo", src), "foo.icns");
        assert_eq!(IconFormat::Ico.file_name("foo", src), "foo.ico");
        assert_eq!(IconFormat::Copy.file_name("foo", Path::new("icon")), "foo");
    }

    #[test]
    fn test_icns_has_container_magic() {
        let temp = tempfile::tempdir().unwrap();
        let png = write_png(temp.path(), "icon.png", 64);
        let icns = convert_icon(&png, IconFormat::Icns).unwrap();
        assert_eq!(&icns[..4], b"icns");

        let family = IconFamily::read(std::io::Cursor::new(icns)).unwrap();
        assert!(family.has_icon_with_type(IconType::RGBA32_64x64));
        assert!(!family.has_icon_with_type(IconType::RGBA32_128x128));
    }

    #[test]
    fn test_ico_contains_usable_sizes() {
        let temp = tempfile::tempdir().unwrap();
        let png = write_png(temp.path(), "icon.png", 32);
        let ico = convert_icon(&png, IconFormat::Ico).unwrap();

        let dir = IconDir::read(std::io::Cursor::new(ico)).unwrap();
        let widths: Vec<u32> = dir.entries().iter().map(|e| e.width()).collect();
        assert_eq!(widths, vec![16, 24, 32]);
    }

    #[test]
    fn test_tiny_source_still_gets_smallest_entry() {
        let temp = tempfile::tempdir().unwrap();
        let png = write_png(temp.path(), "icon.png", 4);
        let ico = convert_icon(&png, IconFormat::Ico).unwrap();
        let dir = IconDir::read(std::io::Cursor::new(ico)).unwrap();
        assert_eq!(dir.entries().len(), 1);
    }

    #[test]
    fn test_missing_source_is_filesystem_error() {
        let err = convert_icon(Path::new("/nonexistent/icon.png"), IconFormat::Icns).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
    }

    #[test]
    fn test_garbage_source_is_image_format_error() {
        let temp = tempfile::tempdir().unwrap();
        let bogus = temp.path().join("icon.png");
        std::fs::write(&bogus, b"definitely not a png").unwrap();
        let err = convert_icon(&bogus, IconFormat::Icns).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImageFormat);
    }
}
