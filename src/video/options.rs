use crate::foundation::choice::{Choice, choice_str_impls};
use crate::foundation::error::{OverwriteError, OverwriteResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Accepted frame-rate range, inclusive.
pub const FPS_RANGE: std::ops::RangeInclusive<u32> = 1..=120;

/// Video codec family written by the video node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    /// H.264 through libx264.
    #[default]
    H264,
    /// Apple ProRes, ffmpeg's `prores` encoder.
    Prores,
    /// Apple ProRes, ffmpeg's `prores_ks` encoder.
    ProresKs,
}

impl VideoCodec {
    /// ffmpeg encoder name passed to `-c:v`.
    pub fn encoder(self) -> &'static str {
        match self {
            Self::H264 => "libx264",
            Self::Prores => "prores",
            Self::ProresKs => "prores_ks",
        }
    }

    /// Default container extension for this codec family.
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::H264 => "mp4",
            Self::Prores | Self::ProresKs => "mov",
        }
    }

    /// Container extensions accepted as-is for this codec family.
    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            Self::H264 => &["mp4", "mkv"],
            Self::Prores | Self::ProresKs => &["mov", "mxf"],
        }
    }

    /// Return `true` for the ProRes variants.
    pub fn is_prores(self) -> bool {
        matches!(self, Self::Prores | Self::ProresKs)
    }
}

impl Choice for VideoCodec {
    const KIND: &'static str = "video codec";
    const ALL: &'static [Self] = &[Self::H264, Self::Prores, Self::ProresKs];

    fn spelling(self) -> &'static str {
        match self {
            Self::H264 => "h264",
            Self::Prores => "prores",
            Self::ProresKs => "prores_ks",
        }
    }
}

choice_str_impls!(VideoCodec);

/// Quality preset for H.264 output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreset {
    /// CRF 28, fast.
    Low,
    /// CRF 23, medium.
    Medium,
    /// CRF 18, slow.
    #[default]
    High,
    /// CRF 15, slower.
    VeryHigh,
    /// CRF 0, veryslow.
    Lossless,
}

impl QualityPreset {
    /// `(crf, x264 preset)` pair for this quality level.
    pub fn h264_settings(self) -> (u8, &'static str) {
        match self {
            Self::Low => (28, "fast"),
            Self::Medium => (23, "medium"),
            Self::High => (18, "slow"),
            Self::VeryHigh => (15, "slower"),
            Self::Lossless => (0, "veryslow"),
        }
    }
}

impl Choice for QualityPreset {
    const KIND: &'static str = "quality preset";
    const ALL: &'static [Self] = &[
        Self::Low,
        Self::Medium,
        Self::High,
        Self::VeryHigh,
        Self::Lossless,
    ];

    fn spelling(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very_high",
            Self::Lossless => "lossless",
        }
    }
}

choice_str_impls!(QualityPreset);

/// ProRes profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProresProfile {
    /// Profile 0.
    #[serde(rename = "proxy")]
    Proxy,
    /// Profile 1.
    #[serde(rename = "lt")]
    Lt,
    /// Profile 2.
    #[default]
    #[serde(rename = "standard")]
    Standard,
    /// Profile 3.
    #[serde(rename = "hq")]
    Hq,
    /// Profile 4, carries alpha.
    #[serde(rename = "4444")]
    P4444,
    /// Profile 5, carries alpha.
    #[serde(rename = "4444xq")]
    P4444Xq,
}

impl ProresProfile {
    /// Numeric id passed to `-profile:v`.
    pub fn id(self) -> u8 {
        match self {
            Self::Proxy => 0,
            Self::Lt => 1,
            Self::Standard => 2,
            Self::Hq => 3,
            Self::P4444 => 4,
            Self::P4444Xq => 5,
        }
    }

    /// ffmpeg pixel format for this profile.
    pub fn pix_fmt(self) -> &'static str {
        match self {
            Self::P4444 | Self::P4444Xq => "yuva444p10le",
            _ => "yuv422p10le",
        }
    }
}

impl Choice for ProresProfile {
    const KIND: &'static str = "prores profile";
    const ALL: &'static [Self] = &[
        Self::Proxy,
        Self::Lt,
        Self::Standard,
        Self::Hq,
        Self::P4444,
        Self::P4444Xq,
    ];

    fn spelling(self) -> &'static str {
        match self {
            Self::Proxy => "proxy",
            Self::Lt => "lt",
            Self::Standard => "standard",
            Self::Hq => "hq",
            Self::P4444 => "4444",
            Self::P4444Xq => "4444xq",
        }
    }
}

choice_str_impls!(ProresProfile);

/// H.264 rate control override.
///
/// Parsed from the host string: empty or `auto` (any case) selects constant quality; `<N>M`
/// targets `N` megabits per second (`m` is accepted too). Other unit forms are rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Bitrate {
    /// Constant-quality mode driven by the quality preset.
    #[default]
    Auto,
    /// Target bitrate in megabits per second.
    Megabits(u32),
}

impl Bitrate {
    /// Rate-control buffer size, twice the target.
    pub fn buffer_size(self) -> Option<String> {
        match self {
            Self::Auto => None,
            Self::Megabits(n) => Some(format!("{}M", u64::from(n) * 2)),
        }
    }
}

impl std::fmt::Display for Bitrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Megabits(n) => write!(f, "{n}M"),
        }
    }
}

impl std::str::FromStr for Bitrate {
    type Err = OverwriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let invalid = || {
            OverwriteError::validation(format!(
                "bitrate '{s}' is not understood (expected \"auto\" or whole megabits such as \"5M\")"
            ))
        };
        let digits = s.strip_suffix(['M', 'm']).ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        match digits.parse::<u32>() {
            Ok(0) => Err(OverwriteError::validation("bitrate must be positive")),
            Ok(n) => Ok(Self::Megabits(n)),
            Err(_) => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Bitrate {
    type Error = OverwriteError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Bitrate> for String {
    fn from(b: Bitrate) -> Self {
        b.to_string()
    }
}

/// User-chosen parameters of the video node.
///
/// Fields missing from a deserialized job take the node defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoWriteConfig {
    /// Input frame rate, 1-120.
    pub fps: u32,
    /// Codec family.
    pub codec: VideoCodec,
    /// Quality preset (H.264 only).
    pub quality: QualityPreset,
    /// Rate control override (H.264 only).
    pub bitrate: Bitrate,
    /// ProRes profile (ProRes only).
    pub prores_profile: ProresProfile,
    /// Encoder program to launch.
    pub ffmpeg: PathBuf,
}

impl Default for VideoWriteConfig {
    fn default() -> Self {
        Self {
            fps: 24,
            codec: VideoCodec::H264,
            quality: QualityPreset::High,
            bitrate: Bitrate::Auto,
            prores_profile: ProresProfile::Standard,
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

impl VideoWriteConfig {
    /// Default configuration for `codec`.
    pub fn for_codec(codec: VideoCodec) -> Self {
        Self {
            codec,
            ..Self::default()
        }
    }

    /// Check every field against its declared range.
    pub fn validate(&self) -> OverwriteResult<()> {
        if !FPS_RANGE.contains(&self.fps) {
            return Err(OverwriteError::validation(format!(
                "fps must be in {}..={}, got {}",
                FPS_RANGE.start(),
                FPS_RANGE.end(),
                self.fps
            )));
        }
        if self.ffmpeg.as_os_str().is_empty() {
            return Err(OverwriteError::validation("encoder program must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/options.rs"]
mod tests;
