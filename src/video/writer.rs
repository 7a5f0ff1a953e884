use crate::foundation::error::{OverwriteError, OverwriteResult};
use crate::foundation::paths::ensure_parent_dir;
use crate::foundation::tensor::ImageBatch;
use crate::video::args::{build_invocation, video_container_path};
use crate::video::options::VideoWriteConfig;
use crate::video::runner::{EncoderRunner, SystemRunner};
use crate::video::stage::FrameStage;
use std::path::Path;

/// Encode `images` into a video at `output_path` with the system encoder.
///
/// See [`write_video_with`].
pub fn write_video(
    images: &ImageBatch,
    output_path: &Path,
    cfg: &VideoWriteConfig,
) -> OverwriteResult<()> {
    write_video_with(&SystemRunner, images, output_path, cfg)
}

/// Encode `images` into a video at `output_path`, launching the encoder through `runner`.
///
/// The container extension is normalized for the codec. Frames are staged in a scratch
/// directory that is removed on every exit path. A non-zero encoder exit is an
/// [`OverwriteError::ExternalProcess`] carrying the exit code; the output file is left as the
/// encoder wrote it.
#[tracing::instrument(skip(runner, images, cfg), fields(codec = %cfg.codec, fps = cfg.fps, frames = images.len()))]
pub fn write_video_with(
    runner: &dyn EncoderRunner,
    images: &ImageBatch,
    output_path: &Path,
    cfg: &VideoWriteConfig,
) -> OverwriteResult<()> {
    cfg.validate()?;
    if images.is_empty() {
        return Err(OverwriteError::validation("image sequence is empty"));
    }
    ensure_parent_dir(output_path)?;

    let out_path = video_container_path(output_path, cfg.codec);
    if out_path != output_path {
        tracing::info!(
            "{} codec uses a .{} container. Changed output to: {}",
            cfg.codec,
            cfg.codec.default_extension(),
            out_path.display()
        );
    }

    let mut stage = FrameStage::new()?;
    let staged = stage.stage(images)?;
    tracing::debug!(frames = staged, dir = %stage.path().display(), "staged frames");

    let invocation = build_invocation(cfg, &stage.pattern(), &out_path);
    tracing::info!("Running FFmpeg command: {}", invocation.command_line());

    let output = runner.run(&invocation)?;
    let program = invocation.program_name();

    if !output.success() {
        tracing::error!(
            code = ?output.code,
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "{program} error output"
        );
        return Err(match output.code {
            Some(code) => OverwriteError::process_exit(&program, code),
            None => OverwriteError::process_killed(&program),
        });
    }

    if let Err(e) = stage.close() {
        tracing::warn!("{e}");
    }
    tracing::info!(path = %out_path.display(), "Video saved");
    if !output.stdout.is_empty() {
        tracing::info!(stdout = %String::from_utf8_lossy(&output.stdout).trim(), "{program} output");
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/video/writer.rs"]
mod tests;
