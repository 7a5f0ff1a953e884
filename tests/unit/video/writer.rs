use super::*;
use crate::foundation::tensor::Image;
use crate::video::args::EncoderInvocation;
use crate::video::options::{Bitrate, ProresProfile, QualityPreset, VideoCodec};
use crate::video::runner::{ProcessOutput, is_encoder_available};
use std::cell::RefCell;
use std::path::PathBuf;

/// Records each call and what the staging directory held at that moment.
struct FakeEncoder {
    code: Option<i32>,
    calls: RefCell<Vec<(EncoderInvocation, Vec<String>)>>,
}

impl FakeEncoder {
    fn exiting(code: Option<i32>) -> Self {
        Self {
            code,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn staged_dir(&self) -> PathBuf {
        let calls = self.calls.borrow();
        let pattern = PathBuf::from(calls[0].0.arg_value("-i").unwrap());
        pattern.parent().unwrap().to_path_buf()
    }
}

impl EncoderRunner for FakeEncoder {
    fn run(&self, invocation: &EncoderInvocation) -> OverwriteResult<ProcessOutput> {
        let pattern = PathBuf::from(invocation.arg_value("-i").unwrap());
        let mut names: Vec<String> = std::fs::read_dir(pattern.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        self.calls.borrow_mut().push((invocation.clone(), names));
        Ok(ProcessOutput {
            code: self.code,
            stdout: Vec::new(),
            stderr: b"boom".to_vec(),
        })
    }
}

fn frames(n: usize) -> ImageBatch {
    (0..n)
        .map(|i| Image::solid(6, 4, &[0.1 * i as f32, 0.5, 0.5]).unwrap())
        .collect()
}

fn args_of(inv: &EncoderInvocation) -> Vec<String> {
    inv.args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn three_frame_h264_default_quality() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("clip.mp4");
    let runner = FakeEncoder::exiting(Some(0));
    let cfg = VideoWriteConfig {
        fps: 24,
        codec: VideoCodec::H264,
        quality: QualityPreset::High,
        bitrate: Bitrate::Auto,
        ..VideoWriteConfig::default()
    };

    write_video_with(&runner, &frames(3), &out, &cfg).unwrap();

    let calls = runner.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (inv, staged) = &calls[0];
    assert_eq!(staged, &["000000.png", "000001.png", "000002.png"]);

    let args = args_of(inv);
    let tail: Vec<&str> = args[5..].iter().map(String::as_str).collect();
    assert_eq!(&args[..3], ["-y", "-framerate", "24"]);
    assert!(args[4].ends_with("%06d.png"));
    assert_eq!(
        tail,
        [
            "-c:v",
            "libx264",
            "-crf",
            "18",
            "-preset",
            "slow",
            "-pix_fmt",
            "yuv420p",
            out.to_str().unwrap(),
        ]
    );
}

#[test]
fn staging_dir_is_removed_after_success() {
    let dir = tempfile::tempdir().unwrap();
    let runner = FakeEncoder::exiting(Some(0));
    write_video_with(
        &runner,
        &frames(2),
        &dir.path().join("a.mp4"),
        &VideoWriteConfig::default(),
    )
    .unwrap();
    assert!(!runner.staged_dir().exists());
}

#[test]
fn nonzero_exit_reports_code_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let runner = FakeEncoder::exiting(Some(1));
    let err = write_video_with(
        &runner,
        &frames(2),
        &dir.path().join("a.mp4"),
        &VideoWriteConfig::default(),
    )
    .unwrap_err();

    assert_eq!(err.exit_code(), Some(1));
    assert!(err.to_string().contains("return code 1"), "{err}");
    assert!(!runner.staged_dir().exists());
}

#[test]
fn killed_encoder_has_no_code() {
    let dir = tempfile::tempdir().unwrap();
    let runner = FakeEncoder::exiting(None);
    let err = write_video_with(
        &runner,
        &frames(1),
        &dir.path().join("a.mp4"),
        &VideoWriteConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, OverwriteError::ExternalProcess { code: None, .. }));
}

#[test]
fn prores_output_moves_to_mov_container() {
    let dir = tempfile::tempdir().unwrap();
    let runner = FakeEncoder::exiting(Some(0));
    let cfg = VideoWriteConfig {
        codec: VideoCodec::ProresKs,
        prores_profile: ProresProfile::P4444,
        ..VideoWriteConfig::default()
    };
    write_video_with(&runner, &frames(2), &dir.path().join("out").join("a.mp4"), &cfg).unwrap();

    let calls = runner.calls.borrow();
    let args = args_of(&calls[0].0);
    assert_eq!(
        args.last().map(String::as_str),
        dir.path().join("out").join("a.mov").to_str()
    );
    assert!(dir.path().join("out").is_dir());
    assert_eq!(
        calls[0].0.arg_value("-pix_fmt").unwrap(),
        "yuva444p10le"
    );
}

#[test]
fn empty_sequence_never_launches_encoder() {
    let dir = tempfile::tempdir().unwrap();
    let runner = FakeEncoder::exiting(Some(0));
    let err = write_video_with(
        &runner,
        &ImageBatch::default(),
        &dir.path().join("a.mp4"),
        &VideoWriteConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, OverwriteError::Validation(_)));
    assert!(runner.calls.borrow().is_empty());
}

#[test]
fn out_of_range_fps_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let runner = FakeEncoder::exiting(Some(0));
    let cfg = VideoWriteConfig {
        fps: 0,
        ..VideoWriteConfig::default()
    };
    let err = write_video_with(&runner, &frames(1), &dir.path().join("a.mp4"), &cfg).unwrap_err();
    assert!(matches!(err, OverwriteError::Validation(_)));
    assert!(runner.calls.borrow().is_empty());
}

#[test]
fn real_ffmpeg_writes_a_playable_file() {
    let cfg = VideoWriteConfig {
        quality: QualityPreset::Low,
        ..VideoWriteConfig::default()
    };
    if !is_encoder_available(&cfg.ffmpeg) {
        eprintln!("skipping: ffmpeg not available");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("real.mp4");
    // libx264 with yuv420p needs even dimensions.
    let batch: ImageBatch = (0..4)
        .map(|i| Image::solid(16, 16, &[0.25 * i as f32, 0.2, 0.8]).unwrap())
        .collect();
    write_video(&batch, &out, &cfg).unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}
