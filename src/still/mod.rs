pub(crate) mod encode;
pub(crate) mod flatten;
pub(crate) mod options;
pub(crate) mod resize;
pub(crate) mod writer;

pub use flatten::{JPEG_BACKGROUND, flatten_onto, flatten_onto_white};
pub use options::{
    ImageFormat, ImageWriteConfig, JpegSubsampling, MAX_RESIZE_DIM, ResizeMethod, SaveOptions,
    TiffCompression, WEBP_METHOD,
};
pub use resize::{apply_resize, resolve_resize};
pub use writer::{image_output_path, write_image};
