use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use overwrite::still::{
    ImageFormat, ImageWriteConfig, JpegSubsampling, ResizeMethod, TiffCompression,
};
use overwrite::video::{Bitrate, ProresProfile, QualityPreset, VideoCodec, VideoWriteConfig};
use overwrite::{Job, NODES};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "overwrite", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one picture in a chosen still format.
    Image(ImageArgs),
    /// Encode a sequence of pictures into a video (requires `ffmpeg`).
    Video(VideoArgs),
    /// Run a node from a JSON job file.
    Run(RunArgs),
    /// List the registered nodes.
    Nodes,
}

#[derive(Args, Debug)]
struct ImageArgs {
    /// Input picture; only the first is written.
    #[arg(long = "in", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output path. Its extension is replaced by the format name.
    #[arg(long)]
    out: PathBuf,

    /// PNG, JPEG, WEBP, TIFF or BMP.
    #[arg(long)]
    format: Option<ImageFormat>,

    /// Quality, 1-100.
    #[arg(long)]
    quality: Option<u8>,

    /// PNG zlib level, 0-9.
    #[arg(long)]
    png_compression: Option<u8>,

    /// 4:4:4, 4:2:2 or 4:2:0.
    #[arg(long)]
    jpeg_subsampling: Option<JpegSubsampling>,

    /// Write lossless WEBP.
    #[arg(long)]
    webp_lossless: bool,

    /// none, lzw, tiff_deflate or jpeg.
    #[arg(long)]
    tiff_compression: Option<TiffCompression>,

    /// Target width, 0 = keep.
    #[arg(long)]
    resize_width: Option<u32>,

    /// Target height, 0 = keep.
    #[arg(long)]
    resize_height: Option<u32>,

    /// nearest, bilinear, bicubic or lanczos.
    #[arg(long)]
    resize_method: Option<ResizeMethod>,
}

impl ImageArgs {
    fn config(&self) -> ImageWriteConfig {
        let d = ImageWriteConfig::default();
        ImageWriteConfig {
            format: self.format.unwrap_or(d.format),
            quality: self.quality.unwrap_or(d.quality),
            png_compression: self.png_compression.unwrap_or(d.png_compression),
            jpeg_subsampling: self.jpeg_subsampling.unwrap_or(d.jpeg_subsampling),
            webp_lossless: self.webp_lossless,
            tiff_compression: self.tiff_compression.unwrap_or(d.tiff_compression),
            resize_width: self.resize_width.unwrap_or(d.resize_width),
            resize_height: self.resize_height.unwrap_or(d.resize_height),
            resize_method: self.resize_method.unwrap_or(d.resize_method),
        }
    }
}

#[derive(Args, Debug)]
struct VideoArgs {
    /// Frames, in order.
    #[arg(long = "in", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Output path. The container extension follows the codec.
    #[arg(long)]
    out: PathBuf,

    /// Frame rate, 1-120.
    #[arg(long)]
    fps: Option<u32>,

    /// h264, prores or prores_ks.
    #[arg(long)]
    codec: Option<VideoCodec>,

    /// low, medium, high, very_high or lossless.
    #[arg(long)]
    quality: Option<QualityPreset>,

    /// "auto" or whole megabits such as "5M".
    #[arg(long)]
    bitrate: Option<Bitrate>,

    /// proxy, lt, standard, hq, 4444 or 4444xq.
    #[arg(long)]
    prores_profile: Option<ProresProfile>,

    /// Encoder program.
    #[arg(long, env = "OVERWRITE_FFMPEG")]
    ffmpeg: Option<PathBuf>,
}

impl VideoArgs {
    fn config(&self) -> VideoWriteConfig {
        let d = VideoWriteConfig::default();
        VideoWriteConfig {
            fps: self.fps.unwrap_or(d.fps),
            codec: self.codec.unwrap_or(d.codec),
            quality: self.quality.unwrap_or(d.quality),
            bitrate: self.bitrate.unwrap_or(d.bitrate),
            prores_profile: self.prores_profile.unwrap_or(d.prores_profile),
            ffmpeg: self.ffmpeg.clone().unwrap_or(d.ffmpeg),
        }
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Job JSON.
    #[arg(long)]
    job: PathBuf,

    /// Encoder program for video jobs, overriding the job file.
    #[arg(long, env = "OVERWRITE_FFMPEG")]
    ffmpeg: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Image(args) => cmd_image(args),
        Command::Video(args) => cmd_video(args),
        Command::Run(args) => cmd_run(args),
        Command::Nodes => {
            cmd_nodes();
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_image(args: ImageArgs) -> anyhow::Result<()> {
    let job = Job::Image {
        config: args.config(),
        inputs: args.inputs,
        output_path: args.out,
    };
    job.run().context("image node failed")
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let job = Job::Video {
        config: args.config(),
        inputs: args.inputs,
        output_path: args.out,
    };
    job.run().context("video node failed")
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut job = Job::from_path(&args.job)?;
    if let (Job::Video { config, .. }, Some(ffmpeg)) = (&mut job, args.ffmpeg) {
        config.ffmpeg = ffmpeg;
    }
    job.run()
        .with_context(|| format!("{} node failed", job.kind()))
}

fn cmd_nodes() {
    for node in NODES {
        println!(
            "{}\t{}\t{}",
            node.name(),
            node.display_name(),
            node.category()
        );
    }
}
