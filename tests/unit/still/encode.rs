use super::*;
use image::{Rgb, RgbImage, Rgba, RgbaImage};

fn gradient_rgb(w: u32, h: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
        Rgb([(x * 8) as u8, (y * 8) as u8, 128])
    }))
}

fn solid_rgb(w: u32, h: u32, px: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(px)))
}

fn assert_close(got: [u8; 3], want: [u8; 3], tolerance: u8, what: &str) {
    for (g, w) in got.iter().zip(want) {
        assert!(g.abs_diff(w) <= tolerance, "{what}: got {got:?}, want {want:?}");
    }
}

#[test]
fn png_level_is_passed_through() {
    use image::codecs::png::CompressionType;
    assert!(matches!(png_compression(0), CompressionType::Uncompressed));
    assert!(matches!(png_compression(1), CompressionType::Level(1)));
    assert!(matches!(png_compression(6), CompressionType::Level(6)));
    assert!(matches!(png_compression(9), CompressionType::Level(9)));
}

#[test]
fn png_levels_produce_distinct_files() {
    let dir = tempfile::tempdir().unwrap();
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(64, 64, |x, y| {
        Rgb([(x * 4) as u8, (y * 4) as u8, ((x * y) % 256) as u8])
    }));
    let bytes = |level: u8| {
        let path = dir.path().join(format!("l{level}.png"));
        save(
            &img,
            &path,
            &SaveOptions::Png {
                compress_level: level,
                optimize: true,
            },
        )
        .unwrap();
        assert_eq!(image::open(&path).unwrap().to_rgb8(), img.to_rgb8());
        std::fs::read(&path).unwrap()
    };
    let stored = bytes(0);
    let fast = bytes(1);
    let best = bytes(9);
    assert!(stored.len() > fast.len());
    assert!(best.len() <= fast.len());
}

#[test]
fn png_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.png");
    let img = gradient_rgb(16, 8);
    save(
        &img,
        &path,
        &SaveOptions::Png {
            compress_level: 9,
            optimize: true,
        },
    )
    .unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!(back.to_rgb8(), img.to_rgb8());
}

#[test]
fn jpeg_writes_decodable_rgb() {
    let dir = tempfile::tempdir().unwrap();
    for subsampling in [
        JpegSubsampling::S444,
        JpegSubsampling::S422,
        JpegSubsampling::S420,
    ] {
        let path = dir.path().join(format!("a_{}.jpeg", subsampling.code()));
        save(
            &gradient_rgb(16, 16),
            &path,
            &SaveOptions::Jpeg {
                quality: 90,
                subsampling,
            },
        )
        .unwrap();
        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (16, 16));
        assert_eq!(back.color(), image::ColorType::Rgb8);
        let src = gradient_rgb(16, 16).to_rgb8();
        assert_close(
            back.to_rgb8().get_pixel(8, 8).0,
            src.get_pixel(8, 8).0,
            24,
            &format!("{subsampling:?}"),
        );
    }
}

#[test]
fn jpeg_flat_colors_survive_every_subsampling() {
    let dir = tempfile::tempdir().unwrap();
    for subsampling in [
        JpegSubsampling::S444,
        JpegSubsampling::S422,
        JpegSubsampling::S420,
    ] {
        for color in [[255, 255, 255], [0, 0, 0], [200, 30, 30], [40, 90, 220]] {
            let path = dir.path().join("flat.jpeg");
            save(
                &solid_rgb(16, 16, color),
                &path,
                &SaveOptions::Jpeg {
                    quality: 95,
                    subsampling,
                },
            )
            .unwrap();
            let back = image::open(&path).unwrap().to_rgb8();
            for (x, y) in [(0, 0), (8, 8), (15, 15)] {
                assert_close(
                    back.get_pixel(x, y).0,
                    color,
                    6,
                    &format!("{subsampling:?} at ({x},{y})"),
                );
            }
        }
    }
}

#[test]
fn jpeg_grayscale_stays_single_channel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("g.jpeg");
    let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(8, 8, image::Luma([77])));
    save(
        &img,
        &path,
        &SaveOptions::Jpeg {
            quality: 95,
            subsampling: JpegSubsampling::S420,
        },
    )
    .unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!(back.color(), image::ColorType::L8);
    assert!(back.to_luma8().get_pixel(4, 4).0[0].abs_diff(77) <= 3);
}

#[test]
fn webp_lossless_round_trips_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.webp");
    let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(8, 8, |x, y| {
        Rgba([(x * 30) as u8, (y * 30) as u8, 7, 200])
    }));
    save(
        &img,
        &path,
        &SaveOptions::Webp {
            quality: 100,
            lossless: true,
            method: 6,
        },
    )
    .unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!(back.to_rgba8(), img.to_rgba8());
}

#[test]
fn webp_lossy_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.webp");
    save(
        &gradient_rgb(32, 32),
        &path,
        &SaveOptions::Webp {
            quality: 40,
            lossless: false,
            method: 6,
        },
    )
    .unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!((back.width(), back.height()), (32, 32));
}

#[test]
fn tiff_schemes_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let img = gradient_rgb(12, 10);
    for compression in [
        TiffCompression::None,
        TiffCompression::Lzw,
        TiffCompression::Deflate,
    ] {
        let path = dir.path().join(format!("a_{compression}.tiff"));
        save(
            &img,
            &path,
            &SaveOptions::Tiff {
                compression,
                quality: None,
            },
        )
        .unwrap();
        let back = image::open(&path).unwrap();
        assert_eq!(back.to_rgb8(), img.to_rgb8(), "{compression}");
    }
}

#[test]
fn tiff_jpeg_round_trips_within_tolerance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("j.tiff");
    save(
        &solid_rgb(24, 10, [200, 30, 30]),
        &path,
        &SaveOptions::Tiff {
            compression: TiffCompression::Jpeg,
            quality: Some(80),
        },
    )
    .unwrap();

    let back = image::open(&path).unwrap();
    assert_eq!((back.width(), back.height()), (24, 10));
    assert_eq!(back.color(), image::ColorType::Rgb8);
    let rgb = back.to_rgb8();
    for (x, y) in [(0, 0), (12, 5), (23, 9)] {
        assert_close(rgb.get_pixel(x, y).0, [200, 30, 30], 8, "tiff/jpeg");
    }
}

#[test]
fn tiff_jpeg_quality_changes_the_strip() {
    let dir = tempfile::tempdir().unwrap();
    let img = gradient_rgb(32, 32);
    let size = |quality: u8| {
        let path = dir.path().join(format!("q{quality}.tiff"));
        save(
            &img,
            &path,
            &SaveOptions::Tiff {
                compression: TiffCompression::Jpeg,
                quality: Some(quality),
            },
        )
        .unwrap();
        std::fs::metadata(&path).unwrap().len()
    };
    assert!(size(20) < size(100));
}

#[test]
fn tiff_jpeg_flattens_alpha_and_keeps_gray() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.tiff");
    let clear = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 0])));
    let opts = SaveOptions::Tiff {
        compression: TiffCompression::Jpeg,
        quality: Some(90),
    };
    save(&clear, &path, &opts).unwrap();
    let back = image::open(&path).unwrap().to_rgb8();
    assert_close(back.get_pixel(4, 4).0, [255, 255, 255], 4, "flattened");

    let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(8, 8, image::Luma([128])));
    save(&gray, &path, &opts).unwrap();
    let back = image::open(&path).unwrap();
    assert_eq!(back.color(), image::ColorType::L8);
    assert!(back.to_luma8().get_pixel(4, 4).0[0].abs_diff(128) <= 3);
}

#[test]
fn tiff_jpeg_without_quality_is_an_encode_failure() {
    let dir = tempfile::tempdir().unwrap();
    let err = save(
        &gradient_rgb(4, 4),
        &dir.path().join("a.tiff"),
        &SaveOptions::Tiff {
            compression: TiffCompression::Jpeg,
            quality: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, OverwriteError::Encode(_)));
    assert!(err.to_string().starts_with("Failed to save image:"));
}

#[test]
fn bmp_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.bmp");
    let img = gradient_rgb(5, 3);
    save(&img, &path, &SaveOptions::Bmp).unwrap();
    assert_eq!(image::open(&path).unwrap().to_rgb8(), img.to_rgb8());
}

#[test]
fn unwritable_path_is_an_encode_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("a.png");
    let err = save(
        &gradient_rgb(2, 2),
        &path,
        &SaveOptions::Png {
            compress_level: 6,
            optimize: true,
        },
    )
    .unwrap_err();
    assert!(matches!(err, OverwriteError::Encode(_)));
}
