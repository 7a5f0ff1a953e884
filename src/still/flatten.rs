use image::{DynamicImage, Rgb, RgbImage};

/// Background that alpha is composited onto before a JPEG save.
pub const JPEG_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Composite an alpha-carrying image onto opaque white.
pub fn flatten_onto_white(img: &DynamicImage) -> DynamicImage {
    flatten_onto(img, JPEG_BACKGROUND)
}

/// Composite an alpha-carrying image (straight alpha) onto an opaque background.
///
/// Images without alpha are returned unchanged. Fully opaque pixels are copied as-is.
pub fn flatten_onto(img: &DynamicImage, bg: [u8; 3]) -> DynamicImage {
    if !img.color().has_alpha() {
        return img.clone();
    }

    let src = img.to_rgba8();
    let mut out = RgbImage::new(src.width(), src.height());
    for (d, s) in out.pixels_mut().zip(src.pixels()) {
        let a = u16::from(s[3]);
        if a == 255 {
            *d = Rgb([s[0], s[1], s[2]]);
            continue;
        }

        let inv = 255u16 - a;
        for c in 0..3 {
            let v = mul_div255(u16::from(s[c]), a) + mul_div255(u16::from(bg[c]), inv);
            d[c] = v.min(255) as u8;
        }
    }
    DynamicImage::ImageRgb8(out)
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/still/flatten.rs"]
mod tests;
