pub mod tesseract;
pub mod vision;

use crate::errors::OcrError;
use async_trait::async_trait;
use image::DynamicImage;
use std::fmt::Debug;

/// A trait for text-recognition engines.
///
/// The engine receives an already-decoded image and returns whatever text it
/// recognized. Output normalization is left to the caller.
#[async_trait]
pub trait OcrEngine: Send + Sync + Debug {
    async fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// Encodes a decoded image as PNG bytes.
pub(crate) fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, OcrError> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| OcrError::Stage(e.to_string()))?;
    Ok(buffer.into_inner())
}
