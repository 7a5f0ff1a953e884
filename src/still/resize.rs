use crate::still::options::ResizeMethod;
use image::DynamicImage;

/// Resolve the requested `width`/`height` (0 = unset) against the source size.
///
/// Both set: used as-is. One set: the other follows the source aspect ratio, rounded down and
/// never below one pixel. Neither set: `None`.
pub fn resolve_resize(original: (u32, u32), width: u32, height: u32) -> Option<(u32, u32)> {
    let (orig_w, orig_h) = original;
    match (width, height) {
        (0, 0) => None,
        (w, 0) => Some((w, scale_side(orig_h, w, orig_w))),
        (0, h) => Some((scale_side(orig_w, h, orig_h), h)),
        (w, h) => Some((w, h)),
    }
}

fn scale_side(other: u32, target: u32, side: u32) -> u32 {
    if side == 0 {
        return target.max(1);
    }
    let scaled = u64::from(other) * u64::from(target) / u64::from(side);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Resample `img` to exactly `size` with the requested filter.
pub fn apply_resize(img: &DynamicImage, size: (u32, u32), method: ResizeMethod) -> DynamicImage {
    img.resize_exact(size.0, size.1, method.filter())
}

#[cfg(test)]
#[path = "../../tests/unit/still/resize.rs"]
mod tests;
