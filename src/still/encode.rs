use crate::foundation::error::{OverwriteError, OverwriteResult};
use crate::still::flatten::flatten_onto_white;
use crate::still::options::{JpegSubsampling, SaveOptions, TiffCompression};
use anyhow::{Context as _, anyhow};
use image::DynamicImage;
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

/// Encode `img` to `path` with the given options.
///
/// Every codec or IO failure is reported as [`OverwriteError::Encode`] carrying the cause.
pub fn save(img: &DynamicImage, path: &Path, opts: &SaveOptions) -> OverwriteResult<()> {
    let res = match *opts {
        SaveOptions::Png { compress_level, optimize } => {
            save_png(img, path, compress_level, optimize)
        }
        SaveOptions::Jpeg {
            quality,
            subsampling,
        } => save_jpeg(img, path, quality, subsampling),
        SaveOptions::Webp {
            quality,
            lossless,
            method,
        } => save_webp(img, path, quality, lossless, method),
        SaveOptions::Tiff {
            compression,
            quality,
        } => save_tiff(img, path, compression, quality),
        SaveOptions::Bmp => img
            .save_with_format(path, image::ImageFormat::Bmp)
            .context("bmp encode"),
    };
    res.map_err(|e| OverwriteError::encode(format!("{e:#}")))
}

/// PNG codec setting for a zlib level (0-9); 0 stores the data uncompressed.
pub(crate) fn png_compression(level: u8) -> image::codecs::png::CompressionType {
    use image::codecs::png::CompressionType;
    match level {
        0 => CompressionType::Uncompressed,
        n => CompressionType::Level(n.min(9)),
    }
}

fn save_png(img: &DynamicImage, path: &Path, level: u8, optimize: bool) -> anyhow::Result<()> {
    use image::ImageEncoder as _;
    use image::codecs::png::{FilterType, PngEncoder};

    let filter = if optimize {
        FilterType::Adaptive
    } else {
        FilterType::Sub
    };
    let out = BufWriter::new(create(path)?);
    PngEncoder::new_with_quality(out, png_compression(level), filter)
        .write_image(img.as_bytes(), img.width(), img.height(), img.color().into())
        .context("png encode")
}

fn save_jpeg(
    img: &DynamicImage,
    path: &Path,
    quality: u8,
    subsampling: JpegSubsampling,
) -> anyhow::Result<()> {
    let (width, height) = jpeg_dimensions(img)?;

    // Only the standard Huffman tables: the optimized pass of jpeg-encoder corrupts flat regions.
    let mut encoder = jpeg_encoder::Encoder::new_file(path, quality)
        .with_context(|| format!("create '{}'", path.display()))?;
    encoder.set_sampling_factor(subsampling.sampling_factor());

    match img {
        DynamicImage::ImageLuma8(buf) => {
            encoder.encode(buf.as_raw(), width, height, jpeg_encoder::ColorType::Luma)
        }
        other => {
            let rgb = other.to_rgb8();
            encoder.encode(rgb.as_raw(), width, height, jpeg_encoder::ColorType::Rgb)
        }
    }
    .context("jpeg encode")
}

fn jpeg_dimensions(img: &DynamicImage) -> anyhow::Result<(u16, u16)> {
    let width = u16::try_from(img.width())
        .map_err(|_| anyhow!("jpeg width {} exceeds 65535", img.width()))?;
    let height = u16::try_from(img.height())
        .map_err(|_| anyhow!("jpeg height {} exceeds 65535", img.height()))?;
    Ok((width, height))
}

fn save_webp(
    img: &DynamicImage,
    path: &Path,
    quality: u8,
    lossless: bool,
    method: u8,
) -> anyhow::Result<()> {
    let mut config = libwebp_sys::WebPConfig::new()
        .map_err(|()| anyhow!("libwebp rejected its default encoder config"))?;
    config.lossless = i32::from(lossless);
    config.quality = f32::from(quality);
    config.method = i32::from(method);

    let (w, h) = (img.width(), img.height());
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), w, h).encode_advanced(&config)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), w, h).encode_advanced(&config)
    }
    .map_err(|e| anyhow!("webp encode: {e:?}"))?;

    std::fs::write(path, &*encoded).with_context(|| format!("write '{}'", path.display()))
}

fn save_tiff(
    img: &DynamicImage,
    path: &Path,
    compression: TiffCompression,
    quality: Option<u8>,
) -> anyhow::Result<()> {
    use tiff::encoder::compression::{Deflate, DeflateLevel, Lzw, Uncompressed};

    match compression {
        TiffCompression::None => write_tiff(img, path, Uncompressed),
        TiffCompression::Lzw => write_tiff(img, path, Lzw),
        TiffCompression::Deflate => {
            write_tiff(img, path, Deflate::with_level(DeflateLevel::Balanced))
        }
        TiffCompression::Jpeg => {
            let quality = quality.ok_or_else(|| anyhow!("JPEG-in-TIFF needs a quality value"))?;
            write_tiff_jpeg(img, path, quality)
        }
    }
}

/// Single-strip TIFF with "new style" JPEG compression (Compression = 7).
///
/// Color samples are stored as-is (Photometric = RGB, 4:4:4), so readers that honour the TIFF tags
/// get RGB back without a YCbCr round trip. Alpha is flattened onto white first.
fn write_tiff_jpeg(img: &DynamicImage, path: &Path, quality: u8) -> anyhow::Result<()> {
    use tiff::encoder::TiffEncoder;
    use tiff::tags::{CompressionMethod, PhotometricInterpretation, PlanarConfiguration, Tag};

    let (width, height) = jpeg_dimensions(img)?;
    let mut strip = Vec::new();
    let mut jpeg = jpeg_encoder::Encoder::new(&mut strip, quality);
    jpeg.set_sampling_factor(jpeg_encoder::SamplingFactor::R_4_4_4);

    let (photometric, samples) = match img {
        DynamicImage::ImageLuma8(buf) => {
            jpeg.encode(buf.as_raw(), width, height, jpeg_encoder::ColorType::Luma)
                .context("jpeg strip encode")?;
            (PhotometricInterpretation::BlackIsZero, 1u16)
        }
        other => {
            let rgb = flatten_onto_white(other).to_rgb8();
            // Declared as YCbCr so the encoder skips its color transform.
            jpeg.encode(rgb.as_raw(), width, height, jpeg_encoder::ColorType::Ycbcr)
                .context("jpeg strip encode")?;
            (PhotometricInterpretation::RGB, 3u16)
        }
    };

    let mut out = Cursor::new(Vec::new());
    {
        let mut tiff = TiffEncoder::new(&mut out).context("tiff header")?;
        let mut dir = tiff.new_directory().context("tiff directory")?;
        let offset = dir.write_data(&strip[..]).context("tiff strip")?;

        let bits = vec![8u16; usize::from(samples)];
        dir.write_tag(Tag::ImageWidth, img.width())?;
        dir.write_tag(Tag::ImageLength, img.height())?;
        dir.write_tag(Tag::BitsPerSample, &bits[..])?;
        dir.write_tag(Tag::Compression, CompressionMethod::ModernJPEG.to_u16())?;
        dir.write_tag(Tag::PhotometricInterpretation, photometric.to_u16())?;
        dir.write_tag(Tag::StripOffsets, u32::try_from(offset)?)?;
        dir.write_tag(Tag::SamplesPerPixel, samples)?;
        dir.write_tag(Tag::RowsPerStrip, img.height())?;
        dir.write_tag(Tag::StripByteCounts, u32::try_from(strip.len())?)?;
        dir.write_tag(
            Tag::PlanarConfiguration,
            PlanarConfiguration::Chunky.to_u16(),
        )?;
        dir.finish().context("tiff directory")?;
    }

    std::fs::write(path, out.into_inner()).with_context(|| format!("write '{}'", path.display()))
}

fn write_tiff<D>(img: &DynamicImage, path: &Path, compression: D) -> anyhow::Result<()>
where
    D: tiff::encoder::compression::Compression,
{
    use tiff::encoder::{TiffEncoder, colortype};

    let mut encoder = TiffEncoder::new(BufWriter::new(create(path)?)).context("tiff header")?;
    let (w, h) = (img.width(), img.height());
    match img {
        DynamicImage::ImageLuma8(buf) => encoder
            .write_image_with_compression::<colortype::Gray8, D>(w, h, compression, buf.as_raw()),
        other if other.color().has_alpha() => {
            let rgba = other.to_rgba8();
            encoder
                .write_image_with_compression::<colortype::RGBA8, D>(w, h, compression, rgba.as_raw())
        }
        other => {
            let rgb = other.to_rgb8();
            encoder.write_image_with_compression::<colortype::RGB8, D>(w, h, compression, rgb.as_raw())
        }
    }
    .context("tiff encode")
}

fn create(path: &Path) -> anyhow::Result<File> {
    File::create(path).with_context(|| format!("create '{}'", path.display()))
}

#[cfg(test)]
#[path = "../../tests/unit/still/encode.rs"]
mod tests;
