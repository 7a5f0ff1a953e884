use crate::foundation::paths::{lowercase_extension, replace_extension};
use crate::video::options::{Bitrate, ProresProfile, QualityPreset, VideoCodec, VideoWriteConfig};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Zero-padded input pattern the encoder reads staged frames through.
pub const FRAME_PATTERN: &str = "%06d.png";

/// File name of the `index`-th staged frame; matches [`FRAME_PATTERN`].
pub fn frame_file_name(index: usize) -> String {
    format!("{index:06}.png")
}

/// Normalize the container extension of `path` for `codec`.
///
/// An extension already accepted by the codec family is kept; anything else is replaced by the
/// family default.
pub fn video_container_path(path: &Path, codec: VideoCodec) -> PathBuf {
    let keep = lowercase_extension(path)
        .is_some_and(|ext| codec.accepted_extensions().contains(&ext.as_str()));
    if keep {
        path.to_path_buf()
    } else {
        replace_extension(path, codec.default_extension())
    }
}

/// One external encoder call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderInvocation {
    /// Program to launch.
    pub program: PathBuf,
    /// Arguments, in order.
    pub args: Vec<OsString>,
}

impl EncoderInvocation {
    /// Short program name for messages (`ffmpeg` for `/usr/bin/ffmpeg`).
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Space-joined command line, for operator logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Value following `flag` in the argument list.
    pub fn arg_value(&self, flag: &str) -> Option<&std::ffi::OsStr> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }
}

/// Build the full encoder call reading frames from `input_pattern` into `output`.
pub fn build_invocation(
    cfg: &VideoWriteConfig,
    input_pattern: &Path,
    output: &Path,
) -> EncoderInvocation {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-framerate".into(),
        cfg.fps.to_string().into(),
        "-i".into(),
        input_pattern.into(),
    ];
    args.extend(codec_args(cfg).into_iter().map(OsString::from));
    args.push(output.into());

    EncoderInvocation {
        program: cfg.ffmpeg.clone(),
        args,
    }
}

/// Codec-specific encoder flags for `cfg`.
pub fn codec_args(cfg: &VideoWriteConfig) -> Vec<String> {
    if cfg.codec.is_prores() {
        prores_args(cfg.codec, cfg.prores_profile)
    } else {
        h264_args(cfg.quality, cfg.bitrate)
    }
}

/// libx264 flags. The x264 preset follows the quality level in both rate-control modes.
pub fn h264_args(quality: QualityPreset, bitrate: Bitrate) -> Vec<String> {
    let (crf, preset) = quality.h264_settings();
    let mut args = vec!["-c:v".to_string(), VideoCodec::H264.encoder().to_string()];

    match bitrate.buffer_size() {
        Some(bufsize) => {
            let rate = bitrate.to_string();
            args.extend([
                "-b:v".to_string(),
                rate.clone(),
                "-maxrate".to_string(),
                rate,
                "-bufsize".to_string(),
                bufsize,
            ]);
        }
        None => args.extend(["-crf".to_string(), crf.to_string()]),
    }

    args.extend([
        "-preset".to_string(),
        preset.to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
    ]);
    args
}

/// ProRes flags for either ffmpeg ProRes encoder.
pub fn prores_args(codec: VideoCodec, profile: ProresProfile) -> Vec<String> {
    let mut args = vec![
        "-c:v".to_string(),
        codec.encoder().to_string(),
        "-profile:v".to_string(),
        profile.id().to_string(),
    ];
    if codec == VideoCodec::ProresKs {
        args.extend(["-vendor".to_string(), "apl0".to_string()]);
    }
    args.extend(["-pix_fmt".to_string(), profile.pix_fmt().to_string()]);
    args
}

#[cfg(test)]
#[path = "../../tests/unit/video/args.rs"]
mod tests;
