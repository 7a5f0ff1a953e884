use crate::foundation::error::OverwriteResult;
use crate::foundation::tensor::ImageBatch;
use crate::video::args::{FRAME_PATTERN, frame_file_name};
use anyhow::Context as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding one invocation's frames as numbered PNGs.
///
/// The directory and everything in it is removed when the stage is dropped or closed.
#[derive(Debug)]
pub struct FrameStage {
    dir: TempDir,
    frames: usize,
}

impl FrameStage {
    /// Create a fresh, empty staging directory under the system temp dir.
    pub fn new() -> OverwriteResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("overwrite-frames-")
            .tempdir()
            .context("failed to create frame staging directory")?;
        Ok(Self { dir, frames: 0 })
    }

    /// Staging directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Encoder input pattern covering every staged frame.
    pub fn pattern(&self) -> PathBuf {
        self.dir.path().join(FRAME_PATTERN)
    }

    /// Number of frames staged so far.
    pub fn len(&self) -> usize {
        self.frames
    }

    /// Return `true` when nothing has been staged.
    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    /// Rasterize `images` in order, continuing the numbering of earlier calls.
    pub fn stage(&mut self, images: &ImageBatch) -> OverwriteResult<usize> {
        for img in images {
            let path = self.dir.path().join(frame_file_name(self.frames));
            img.to_dynamic()?
                .save_with_format(&path, image::ImageFormat::Png)
                .with_context(|| format!("failed to stage frame '{}'", path.display()))?;
            self.frames += 1;
        }
        Ok(self.frames)
    }

    /// Remove the directory now, reporting any failure.
    pub fn close(self) -> OverwriteResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .with_context(|| format!("failed to remove staging directory '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/video/stage.rs"]
mod tests;
