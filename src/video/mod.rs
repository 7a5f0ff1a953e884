pub(crate) mod args;
pub(crate) mod options;
pub(crate) mod runner;
pub(crate) mod stage;
pub(crate) mod writer;

pub use args::{
    EncoderInvocation, FRAME_PATTERN, build_invocation, codec_args, frame_file_name, h264_args,
    prores_args, video_container_path,
};
pub use options::{Bitrate, FPS_RANGE, ProresProfile, QualityPreset, VideoCodec, VideoWriteConfig};
pub use runner::{EncoderRunner, ProcessOutput, SystemRunner, is_encoder_available};
pub use stage::FrameStage;
pub use writer::{write_video, write_video_with};
