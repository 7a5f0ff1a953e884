use crate::foundation::error::{OverwriteError, OverwriteResult};
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

/// One picture as normalized intensities in `[0, 1]`, row-major `height x width x channels`.
///
/// `channels` is 1 (L), 2 (LA), 3 (RGB) or 4 (RGBA).
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<f32>,
}

impl Image {
    /// Wrap a raw `height x width x channels` buffer.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<f32>) -> OverwriteResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(OverwriteError::validation(format!(
                "image must have 1 to 4 channels, got {channels}"
            )));
        }
        if width == 0 || height == 0 {
            return Err(OverwriteError::validation(
                "image width/height must be non-zero",
            ));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(OverwriteError::validation(format!(
                "image buffer has {} values, expected {expected} ({width}x{height}x{channels})",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Build an image where every pixel equals `pixel` (one value per channel).
    pub fn solid(width: u32, height: u32, pixel: &[f32]) -> OverwriteResult<Self> {
        let channels = u8::try_from(pixel.len())
            .map_err(|_| OverwriteError::validation("too many channels in fill pixel"))?;
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * pixel.len())
            .collect();
        Self::new(width, height, channels, data)
    }

    /// Convert a decoded picture into normalized intensities.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (channels, raw) = match img.color().channel_count() {
            1 => (1, img.to_luma8().into_raw()),
            2 => (2, img.to_luma_alpha8().into_raw()),
            3 => (3, img.to_rgb8().into_raw()),
            _ => (4, img.to_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            data: raw.into_iter().map(|b| f32::from(b) / 255.0).collect(),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel count (1-4).
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Raw normalized values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Rasterize to an 8-bit-per-channel bitmap.
    pub fn to_dynamic(&self) -> OverwriteResult<DynamicImage> {
        let bytes: Vec<u8> = self.data.iter().copied().map(quantize).collect();
        let (w, h) = (self.width, self.height);
        let img = match self.channels {
            1 => GrayImage::from_raw(w, h, bytes).map(DynamicImage::ImageLuma8),
            2 => GrayAlphaImage::from_raw(w, h, bytes).map(DynamicImage::ImageLumaA8),
            3 => RgbImage::from_raw(w, h, bytes).map(DynamicImage::ImageRgb8),
            _ => RgbaImage::from_raw(w, h, bytes).map(DynamicImage::ImageRgba8),
        };
        img.ok_or_else(|| OverwriteError::validation("image buffer does not match its shape"))
    }
}

fn quantize(v: f32) -> u8 {
    // Truncates like an 8-bit cast. NaN saturates to 0.
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

/// An ordered run of images, the batch dimension of the host's image tensor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageBatch {
    images: Vec<Image>,
}

impl ImageBatch {
    /// Wrap images in batch order.
    pub fn new(images: Vec<Image>) -> Self {
        Self { images }
    }

    /// First element of the batch.
    pub fn first(&self) -> OverwriteResult<&Image> {
        self.images
            .first()
            .ok_or_else(|| OverwriteError::validation("image batch is empty"))
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Return `true` when the batch holds no images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Images in batch order.
    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.images.iter()
    }
}

impl From<Image> for ImageBatch {
    fn from(image: Image) -> Self {
        Self::new(vec![image])
    }
}

impl FromIterator<Image> for ImageBatch {
    fn from_iter<I: IntoIterator<Item = Image>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ImageBatch {
    type Item = &'a Image;
    type IntoIter = std::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/tensor.rs"]
mod tests;
