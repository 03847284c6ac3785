//! Decoding: staged file → `DynamicImage`.
//!
//! The format is sniffed from the file's magic bytes first and only falls
//! back to the extension when sniffing finds nothing. Browsers happily upload
//! a PNG called `photo.jpg`, so the name alone is not trusted.

use crate::error::Upload2PngError;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;
use tracing::debug;

/// A decoded upload together with the format it was stored in.
#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    /// `None` only if the decoder never reported a format.
    pub format: Option<ImageFormat>,
}

/// Open and decode the image at `path`.
///
/// `name` is the uploaded filename, used for error messages.
pub fn decode_file(path: &Path, name: &str) -> Result<DecodedImage, Upload2PngError> {
    let decode_err = |source: image::ImageError| Upload2PngError::DecodeFailed {
        name: name.to_string(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(|e| decode_err(e.into()))?
        .with_guessed_format()
        .map_err(|e| decode_err(e.into()))?;
    let format = reader.format();
    let image = reader.decode().map_err(decode_err)?;

    debug!(
        "Decoded '{}' as {:?}: {}x{} {:?}",
        name,
        format,
        image.width(),
        image.height(),
        image.color()
    );

    Ok(DecodedImage { image, format })
}
