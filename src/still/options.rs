use crate::foundation::choice::{Choice, choice_str_impls, parse_choice};
use crate::foundation::error::{OverwriteError, OverwriteResult};
use serde::{Deserialize, Serialize};

/// Largest accepted value for `resize_width` / `resize_height`.
pub const MAX_RESIZE_DIM: u32 = 16384;

/// libwebp compression effort used for every WEBP save (0 = fastest, 6 = smallest).
pub const WEBP_METHOD: u8 = 6;

/// Still-image container written by the image node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// Baseline JPEG.
    Jpeg,
    /// WebP, lossy or lossless.
    Webp,
    /// TIFF with a selectable compression scheme.
    Tiff,
    /// Uncompressed BMP.
    Bmp,
}

impl ImageFormat {
    /// File extension (lowercase format name, no dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Tiff => "tiff",
            Self::Bmp => "bmp",
        }
    }
}

impl Choice for ImageFormat {
    const KIND: &'static str = "image format";
    const ALL: &'static [Self] = &[Self::Png, Self::Jpeg, Self::Webp, Self::Tiff, Self::Bmp];

    fn spelling(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Webp => "WEBP",
            Self::Tiff => "TIFF",
            Self::Bmp => "BMP",
        }
    }
}

choice_str_impls!(ImageFormat);

/// JPEG chroma subsampling mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JpegSubsampling {
    /// Full chroma resolution.
    #[serde(rename = "4:4:4")]
    S444,
    /// Half horizontal chroma resolution.
    #[serde(rename = "4:2:2")]
    S422,
    /// Half horizontal and vertical chroma resolution.
    #[default]
    #[serde(rename = "4:2:0")]
    S420,
}

impl JpegSubsampling {
    /// Numeric subsampling code: 0 = 4:4:4, 1 = 4:2:2, 2 = 4:2:0.
    pub fn code(self) -> u8 {
        match self {
            Self::S444 => 0,
            Self::S422 => 1,
            Self::S420 => 2,
        }
    }

    pub(crate) fn sampling_factor(self) -> jpeg_encoder::SamplingFactor {
        match self {
            Self::S444 => jpeg_encoder::SamplingFactor::R_4_4_4,
            Self::S422 => jpeg_encoder::SamplingFactor::R_4_2_2,
            Self::S420 => jpeg_encoder::SamplingFactor::R_4_2_0,
        }
    }
}

impl Choice for JpegSubsampling {
    const KIND: &'static str = "jpeg subsampling";
    const ALL: &'static [Self] = &[Self::S444, Self::S422, Self::S420];

    fn spelling(self) -> &'static str {
        match self {
            Self::S444 => "4:4:4",
            Self::S422 => "4:2:2",
            Self::S420 => "4:2:0",
        }
    }
}

choice_str_impls!(JpegSubsampling);

/// TIFF compression scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiffCompression {
    /// Raw strips.
    None,
    /// LZW.
    #[default]
    Lzw,
    /// zlib/Deflate.
    #[serde(rename = "tiff_deflate", alias = "deflate")]
    Deflate,
    /// JPEG-in-TIFF at the configured quality.
    Jpeg,
}

impl Choice for TiffCompression {
    const KIND: &'static str = "tiff compression";
    const ALL: &'static [Self] = &[Self::None, Self::Lzw, Self::Deflate, Self::Jpeg];

    fn spelling(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Lzw => "lzw",
            Self::Deflate => "tiff_deflate",
            Self::Jpeg => "jpeg",
        }
    }
}

impl std::fmt::Display for TiffCompression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spelling())
    }
}

impl std::str::FromStr for TiffCompression {
    type Err = OverwriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("deflate") {
            return Ok(Self::Deflate);
        }
        parse_choice(s)
    }
}

/// Resampling filter used when resizing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMethod {
    /// Nearest neighbour.
    Nearest,
    /// Linear (triangle) filter.
    Bilinear,
    /// Cubic (Catmull-Rom) filter.
    Bicubic,
    /// Lanczos with window 3.
    #[default]
    Lanczos,
}

impl ResizeMethod {
    /// Matching filter of the `image` crate.
    pub fn filter(self) -> image::imageops::FilterType {
        use image::imageops::FilterType;
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
            Self::Bicubic => FilterType::CatmullRom,
            Self::Lanczos => FilterType::Lanczos3,
        }
    }
}

impl Choice for ResizeMethod {
    const KIND: &'static str = "resize method";
    const ALL: &'static [Self] = &[Self::Nearest, Self::Bilinear, Self::Bicubic, Self::Lanczos];

    fn spelling(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
            Self::Lanczos => "lanczos",
        }
    }
}

choice_str_impls!(ResizeMethod);

/// User-chosen parameters of the image node.
///
/// Fields missing from a deserialized job take the node defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageWriteConfig {
    /// Target container.
    pub format: ImageFormat,
    /// Quality knob, 1-100. Used by JPEG, lossy WEBP and JPEG-in-TIFF.
    pub quality: u8,
    /// PNG zlib level, 0-9.
    pub png_compression: u8,
    /// JPEG chroma subsampling.
    pub jpeg_subsampling: JpegSubsampling,
    /// Force lossless WEBP (quality is then pinned to 100).
    pub webp_lossless: bool,
    /// TIFF compression scheme.
    pub tiff_compression: TiffCompression,
    /// Target width, 0 = unset.
    pub resize_width: u32,
    /// Target height, 0 = unset.
    pub resize_height: u32,
    /// Resampling filter.
    pub resize_method: ResizeMethod,
}

impl Default for ImageWriteConfig {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            quality: 95,
            png_compression: 6,
            jpeg_subsampling: JpegSubsampling::S420,
            webp_lossless: false,
            tiff_compression: TiffCompression::Lzw,
            resize_width: 0,
            resize_height: 0,
            resize_method: ResizeMethod::Lanczos,
        }
    }
}

impl ImageWriteConfig {
    /// Default configuration for `format`.
    pub fn for_format(format: ImageFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Check every field against its declared range.
    pub fn validate(&self) -> OverwriteResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(OverwriteError::validation(format!(
                "quality must be in 1..=100, got {}",
                self.quality
            )));
        }
        if self.png_compression > 9 {
            return Err(OverwriteError::validation(format!(
                "png_compression must be in 0..=9, got {}",
                self.png_compression
            )));
        }
        if self.resize_width > MAX_RESIZE_DIM || self.resize_height > MAX_RESIZE_DIM {
            return Err(OverwriteError::validation(format!(
                "resize dimensions must be at most {MAX_RESIZE_DIM}, got {}x{}",
                self.resize_width, self.resize_height
            )));
        }
        Ok(())
    }

    /// Encoder options for the configured format.
    pub fn save_options(&self) -> SaveOptions {
        match self.format {
            ImageFormat::Png => SaveOptions::Png {
                compress_level: self.png_compression,
                optimize: true,
            },
            ImageFormat::Jpeg => SaveOptions::Jpeg {
                quality: self.quality,
                subsampling: self.jpeg_subsampling,
            },
            ImageFormat::Webp => SaveOptions::Webp {
                quality: if self.webp_lossless { 100 } else { self.quality },
                lossless: self.webp_lossless,
                method: WEBP_METHOD,
            },
            ImageFormat::Tiff => SaveOptions::Tiff {
                compression: self.tiff_compression,
                quality: (self.tiff_compression == TiffCompression::Jpeg).then_some(self.quality),
            },
            ImageFormat::Bmp => SaveOptions::Bmp,
        }
    }
}

/// Format-specific encoder options, derived from an [`ImageWriteConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOptions {
    /// PNG options.
    Png {
        /// zlib level, 0-9.
        compress_level: u8,
        /// Spend extra effort on filter selection.
        optimize: bool,
    },
    /// JPEG options.
    Jpeg {
        /// Quality, 1-100.
        quality: u8,
        /// Chroma subsampling.
        subsampling: JpegSubsampling,
    },
    /// WEBP options.
    Webp {
        /// Quality, 1-100 (100 when lossless).
        quality: u8,
        /// Lossless mode.
        lossless: bool,
        /// Compression effort, 0-6.
        method: u8,
    },
    /// TIFF options.
    Tiff {
        /// Compression scheme.
        compression: TiffCompression,
        /// Quality, only present for JPEG compression.
        quality: Option<u8>,
    },
    /// BMP takes no options.
    Bmp,
}

impl SaveOptions {
    /// Container these options apply to.
    pub fn format(&self) -> ImageFormat {
        match self {
            Self::Png { .. } => ImageFormat::Png,
            Self::Jpeg { .. } => ImageFormat::Jpeg,
            Self::Webp { .. } => ImageFormat::Webp,
            Self::Tiff { .. } => ImageFormat::Tiff,
            Self::Bmp => ImageFormat::Bmp,
        }
    }

    /// One-line operator description of the save.
    pub fn describe(&self) -> String {
        match self {
            Self::Png { compress_level, .. } => {
                format!("Saving PNG with compression level {compress_level}")
            }
            Self::Jpeg {
                quality,
                subsampling,
                ..
            } => format!("Saving JPEG with quality {quality}, subsampling {subsampling}"),
            Self::Webp {
                lossless: true, ..
            } => "Saving WebP (lossless)".to_string(),
            Self::Webp { quality, .. } => format!("Saving WebP (lossy, quality {quality})"),
            Self::Tiff { compression, .. } => {
                format!("Saving TIFF with {compression} compression")
            }
            Self::Bmp => "Saving BMP (uncompressed)".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/still/options.rs"]
mod tests;
