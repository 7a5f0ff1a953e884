use super::*;
use image::{GrayAlphaImage, LumaA, Rgba, RgbaImage};

#[test]
fn opaque_pixels_are_preserved() {
    let mut src = RgbaImage::new(2, 1);
    src.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
    src.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
    let out = flatten_onto_white(&DynamicImage::ImageRgba8(src));
    assert_eq!(out.color(), image::ColorType::Rgb8);
    assert_eq!(out.to_rgb8().into_raw(), vec![10, 20, 30, 200, 100, 50]);
}

#[test]
fn transparent_pixels_become_white() {
    let src = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
    let out = flatten_onto_white(&DynamicImage::ImageRgba8(src));
    assert_eq!(out.to_rgb8().into_raw(), vec![255, 255, 255]);
}

#[test]
fn half_alpha_blends_with_background() {
    // Straight red @ ~50% over black => ~128,0,0.
    let src = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
    let out = flatten_onto(&DynamicImage::ImageRgba8(src), [0, 0, 0]);
    assert_eq!(out.to_rgb8().into_raw(), vec![128, 0, 0]);
}

#[test]
fn gray_alpha_flattens_to_rgb() {
    let src = GrayAlphaImage::from_pixel(1, 1, LumaA([0, 0]));
    let out = flatten_onto_white(&DynamicImage::ImageLumaA8(src));
    assert_eq!(out.color(), image::ColorType::Rgb8);
    assert_eq!(out.to_rgb8().into_raw(), vec![255, 255, 255]);
}

#[test]
fn images_without_alpha_pass_through() {
    let src = image::RgbImage::from_pixel(1, 1, Rgb([1, 2, 3]));
    let img = DynamicImage::ImageRgb8(src);
    assert_eq!(flatten_onto_white(&img), img);
}
