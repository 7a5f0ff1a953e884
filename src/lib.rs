//! Overwrite is a pair of terminal output nodes for a node-based image pipeline.
//!
//! - [`write_image`] writes one picture as PNG, JPEG, WEBP, TIFF or BMP with per-format tuning
//!   and an optional resize.
//! - [`write_video`] stages an image sequence as numbered PNGs and encodes it with an external
//!   ffmpeg into H.264 or ProRes.
//!
//! Both rewrite the caller's file extension to match what they produce. [`node::Job`] wraps
//! either call in a serializable record for hosts that drive the nodes from files.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Host registration surface: node identities and serialized jobs.
pub mod node;
/// The image output node: one picture, five still formats.
pub mod still;
/// The video output node: an image sequence encoded by an external ffmpeg.
pub mod video;

pub use crate::foundation::choice::{Choice, parse_choice};
pub use crate::foundation::error::{OverwriteError, OverwriteResult};
pub use crate::foundation::paths::{ensure_parent_dir, replace_extension};
pub use crate::foundation::tensor::{Image, ImageBatch};

pub use crate::node::{Job, NODES, NodeKind, load_batch};
pub use crate::still::{ImageFormat, ImageWriteConfig, write_image};
pub use crate::video::{VideoCodec, VideoWriteConfig, write_video};
