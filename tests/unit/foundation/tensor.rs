use super::*;

#[test]
fn new_rejects_mismatched_buffer() {
    assert!(Image::new(2, 2, 3, vec![0.0; 11]).is_err());
    assert!(Image::new(2, 2, 5, vec![0.0; 20]).is_err());
    assert!(Image::new(0, 2, 3, vec![]).is_err());
    assert!(Image::new(2, 2, 3, vec![0.0; 12]).is_ok());
}

#[test]
fn to_dynamic_scales_and_clamps() {
    let img = Image::new(3, 1, 1, vec![0.0, 1.0, 1.7]).unwrap();
    let dynamic = img.to_dynamic().unwrap();
    assert_eq!(dynamic.color(), image::ColorType::L8);
    assert_eq!(dynamic.to_luma8().into_raw(), vec![0, 255, 255]);

    let img = Image::new(1, 1, 3, vec![-0.5, 0.5, f32::NAN]).unwrap();
    assert_eq!(img.to_dynamic().unwrap().to_rgb8().into_raw(), vec![0, 127, 0]);
}

#[test]
fn quantization_truncates_toward_zero() {
    let img = Image::new(4, 1, 1, vec![0.999, 0.5, 0.0021, 254.6 / 255.0]).unwrap();
    assert_eq!(
        img.to_dynamic().unwrap().to_luma8().into_raw(),
        vec![254, 127, 0, 254]
    );
}

#[test]
fn channel_count_selects_color_mode() {
    let rgba = Image::solid(2, 2, &[1.0, 0.0, 0.0, 0.5]).unwrap();
    assert_eq!(rgba.to_dynamic().unwrap().color(), image::ColorType::Rgba8);

    let la = Image::solid(2, 2, &[0.2, 1.0]).unwrap();
    assert_eq!(la.to_dynamic().unwrap().color(), image::ColorType::La8);
}

#[test]
fn eight_bit_round_trip_stays_within_one_step() {
    let src: Vec<u8> = (0..=255).flat_map(|v| [v, 255 - v, v / 2]).collect();
    let rgb = image::RgbImage::from_raw(256, 1, src.clone()).unwrap();
    let img = Image::from_dynamic(&image::DynamicImage::ImageRgb8(rgb));
    assert_eq!(img.channels(), 3);
    let back = img.to_dynamic().unwrap().to_rgb8().into_raw();
    for (got, want) in back.iter().zip(&src) {
        assert!(want.abs_diff(*got) <= 1, "{got} vs {want}");
    }
    assert_eq!(back[0], 0);
    assert_eq!(back[3 * 255], 255);
}

#[test]
fn batch_first_and_order() {
    let a = Image::solid(1, 1, &[0.0, 0.0, 0.0]).unwrap();
    let b = Image::solid(1, 1, &[1.0, 1.0, 1.0]).unwrap();
    let batch: ImageBatch = [a.clone(), b.clone()].into_iter().collect();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch.first().unwrap(), &a);
    assert_eq!(batch.iter().nth(1), Some(&b));

    assert!(ImageBatch::default().first().is_err());
}
