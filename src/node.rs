use crate::foundation::error::{OverwriteError, OverwriteResult};
use crate::foundation::tensor::{Image, ImageBatch};
use crate::still::{ImageWriteConfig, write_image};
use crate::video::{EncoderRunner, SystemRunner, VideoWriteConfig, write_video_with};
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// The output nodes this package registers with a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Still-image writer.
    OverwriteImage,
    /// Image-sequence-to-video writer.
    OverwriteVideo,
}

/// Every registered node, in registration order.
pub const NODES: &[NodeKind] = &[NodeKind::OverwriteVideo, NodeKind::OverwriteImage];

impl NodeKind {
    /// Registry key.
    pub fn name(self) -> &'static str {
        match self {
            Self::OverwriteImage => "OverwriteImage",
            Self::OverwriteVideo => "Overwrite Video",
        }
    }

    /// Label shown in the host UI.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::OverwriteImage => "Overwrite Image (Enhanced)",
            Self::OverwriteVideo => "Overwrite Video (No Suffix, Overwrite)",
        }
    }

    /// Menu category.
    pub fn category(self) -> &'static str {
        match self {
            Self::OverwriteImage => "image",
            Self::OverwriteVideo => "video",
        }
    }

    /// Both nodes are terminal: they produce files, not values.
    pub fn is_output(self) -> bool {
        true
    }

    /// Look a node up by registry key. `OverwriteVideo` is accepted as a legacy key.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "OverwriteVideo" => Some(Self::OverwriteVideo),
            _ => NODES.iter().copied().find(|n| n.name() == name),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One serialized node invocation: decoded inputs, an output path and the node parameters.
///
/// ```json
/// { "node": "OverwriteImage", "inputs": ["in.png"], "output_path": "out/temp", "format": "WEBP" }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum Job {
    /// Run the image node.
    #[serde(rename = "OverwriteImage")]
    Image {
        /// Input pictures; only the first is written.
        inputs: Vec<PathBuf>,
        /// Requested output path.
        output_path: PathBuf,
        /// Node parameters.
        #[serde(flatten)]
        config: ImageWriteConfig,
    },
    /// Run the video node.
    #[serde(rename = "Overwrite Video", alias = "OverwriteVideo")]
    Video {
        /// Frames, in order.
        inputs: Vec<PathBuf>,
        /// Requested output path.
        output_path: PathBuf,
        /// Node parameters.
        #[serde(flatten)]
        config: VideoWriteConfig,
    },
}

impl Job {
    /// Read a job from a JSON file.
    pub fn from_path(path: &Path) -> OverwriteResult<Self> {
        let f = File::open(path).with_context(|| format!("open job '{}'", path.display()))?;
        let job = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse job JSON '{}'", path.display()))?;
        Ok(job)
    }

    /// Node this job targets.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Image { .. } => NodeKind::OverwriteImage,
            Self::Video { .. } => NodeKind::OverwriteVideo,
        }
    }

    /// Decode the inputs and run the node with the system encoder.
    pub fn run(&self) -> OverwriteResult<()> {
        self.run_with(&SystemRunner)
    }

    /// Decode the inputs and run the node, launching any encoder through `runner`.
    #[tracing::instrument(skip(self, runner), fields(node = %self.kind()))]
    pub fn run_with(&self, runner: &dyn EncoderRunner) -> OverwriteResult<()> {
        match self {
            Self::Image {
                inputs,
                output_path,
                config,
            } => write_image(&load_batch(inputs)?, output_path, config),
            Self::Video {
                inputs,
                output_path,
                config,
            } => write_video_with(runner, &load_batch(inputs)?, output_path, config),
        }
    }
}

/// Decode `paths` in order into a batch of normalized images.
pub fn load_batch(paths: &[PathBuf]) -> OverwriteResult<ImageBatch> {
    if paths.is_empty() {
        return Err(OverwriteError::validation("no input images given"));
    }
    paths
        .iter()
        .map(|p| -> OverwriteResult<Image> {
            let img = image::open(p).with_context(|| format!("decode '{}'", p.display()))?;
            Ok(Image::from_dynamic(&img))
        })
        .collect::<OverwriteResult<Vec<_>>>()
        .map(ImageBatch::new)
}

#[cfg(test)]
#[path = "../tests/unit/node.rs"]
mod tests;
