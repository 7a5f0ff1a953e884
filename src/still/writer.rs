use crate::foundation::error::{OverwriteError, OverwriteResult};
use crate::foundation::paths::{ensure_parent_dir, replace_extension};
use crate::foundation::tensor::ImageBatch;
use crate::still::encode::save;
use crate::still::flatten::flatten_onto_white;
use crate::still::options::{ImageFormat, ImageWriteConfig};
use crate::still::resize::{apply_resize, resolve_resize};
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Path the image node actually writes for `output_path` and `format`.
pub fn image_output_path(output_path: &Path, format: ImageFormat) -> PathBuf {
    replace_extension(output_path, format.extension())
}

/// Write the first image of `images` to `output_path` in the configured format.
///
/// The extension of `output_path` is replaced by the lowercase format name. Missing parent
/// directories are created.
#[tracing::instrument(skip(images, cfg), fields(format = %cfg.format))]
pub fn write_image(
    images: &ImageBatch,
    output_path: &Path,
    cfg: &ImageWriteConfig,
) -> OverwriteResult<()> {
    cfg.validate()?;
    ensure_parent_dir(output_path)?;

    let mut img = images.first()?.to_dynamic()?;

    let (orig_w, orig_h) = (img.width(), img.height());
    if let Some(size) = resolve_resize((orig_w, orig_h), cfg.resize_width, cfg.resize_height) {
        img = apply_resize(&img, size, cfg.resize_method);
        tracing::info!(
            "Resized from {orig_w}x{orig_h} to {}x{} ({})",
            size.0,
            size.1,
            cfg.resize_method
        );
    }

    let out_path = image_output_path(output_path, cfg.format);
    let opts = cfg.save_options();

    // JPEG has no alpha channel.
    if cfg.format == ImageFormat::Jpeg && img.color().has_alpha() {
        img = flatten_onto_white(&img);
    }
    tracing::info!("{}", opts.describe());

    if let Err(e) = save(&img, &out_path, &opts) {
        tracing::error!(path = %out_path.display(), "Error saving image: {e}");
        return Err(e);
    }

    let bytes = std::fs::metadata(&out_path)
        .map_err(|e| OverwriteError::encode(format!("stat '{}': {e}", out_path.display())))?
        .len();
    tracing::info!(
        path = %out_path.display(),
        bytes,
        size_mb = %format!("{:.2}", bytes as f64 / (1024.0 * 1024.0)),
        dimensions = %format!("{}x{}", img.width(), img.height()),
        mode = color_mode(&img),
        "Image saved successfully"
    );
    Ok(())
}

/// Short color-mode label used in operator logs.
pub(crate) fn color_mode(img: &DynamicImage) -> &'static str {
    match img.color() {
        image::ColorType::L8 | image::ColorType::L16 => "L",
        image::ColorType::La8 | image::ColorType::La16 => "LA",
        image::ColorType::Rgb8 | image::ColorType::Rgb16 | image::ColorType::Rgb32F => "RGB",
        _ => "RGBA",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/still/writer.rs"]
mod tests;
