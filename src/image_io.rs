use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};

static RAW_EXTS: &[&str] = &["raf", "dng", "nef", "cr2", "arw"];
static SUPPORTED_IMAGE_EXTS: &[&str] = &[
    "jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif", "raf", "dng", "nef", "cr2", "arw",
];

fn has_extension(path: &Path, exts: &[&str]) -> bool {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy()) else {
        return false;
    };
    exts.iter().any(|known| ext.eq_ignore_ascii_case(known))
}

pub fn is_raw_image(path: &Path) -> bool {
    has_extension(path, RAW_EXTS)
}

/// Returns `true` if the path has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    has_extension(path, SUPPORTED_IMAGE_EXTS)
}

/// Decode `path` to RGBA, falling back to raw decoding for RAW extensions.
pub fn open_image(path: &Path) -> anyhow::Result<RgbaImage> {
    Ok(open_dynamic(path)?.into_rgba8())
}

fn open_dynamic(path: &Path) -> anyhow::Result<DynamicImage> {
    // Fast path: try the standard image crate first.
    let err = match image::open(path) {
        Ok(img) => return Ok(img),
        Err(err) => err,
    };

    if !is_raw_image(path) {
        return Err(err).with_context(|| format!("failed to decode {}", path.display()));
    }

    tracing::debug!(path = %path.display(), %err, "falling back to raw develop");
    let raw = rawler::decode_file(path)
        .with_context(|| format!("raw decode failed for {}", path.display()))?;
    let develop = rawler::imgop::develop::RawDevelop::default();
    let intermediate = develop.develop_intermediate(&raw)?;
    intermediate
        .to_dynamic_image()
        .ok_or_else(|| anyhow::anyhow!("raw develop produced invalid image"))
}

/// Default export name for `input`, placed in `out_dir` or next to the input.
pub fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ekta".to_string());
    let name = format!("{}-edited.jpg", stem);
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.parent().unwrap_or(Path::new(".")).join(name),
    }
}

/// Encode `img` as JPEG at `quality` (1-100). Alpha is dropped.
pub fn export_jpeg(img: &RgbaImage, path: &Path, quality: u8) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let rgb = DynamicImage::ImageRgba8(img.clone()).into_rgb8();
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality.clamp(1, 100));
    encoder
        .encode_image(&rgb)
        .with_context(|| format!("failed to encode {}", path.display()))?;
    Ok(())
}
