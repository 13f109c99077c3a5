//! # OCR Adapter
//!
//! Decodes uploaded image bytes, hands the decoded image to an `OcrEngine` and
//! normalizes the recognized text. The result is a suggestion: callers may let
//! the student edit it before asking for an answer.

use crate::{
    errors::ExtractionError,
    normalize::normalize,
    providers::ocr::OcrEngine,
    types::ExtractionResult,
};
use image::{DynamicImage, ImageFormat};
use tracing::{info, instrument, warn};

/// Raster formats accepted for homework photos.
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[ImageFormat::Png, ImageFormat::Jpeg];

/// Sniffs the format from the bytes and decodes the image.
///
/// Fails with `UnsupportedFormat` for unrecognized data, formats outside
/// `SUPPORTED_FORMATS` and corrupt images.
pub fn decode_image(image_bytes: &[u8]) -> Result<DynamicImage, ExtractionError> {
    let format = image::guess_format(image_bytes)
        .map_err(|e| ExtractionError::UnsupportedFormat(e.to_string()))?;

    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(ExtractionError::UnsupportedFormat(format!(
            "{format:?} images are not supported, use PNG or JPEG"
        )));
    }

    image::load_from_memory_with_format(image_bytes, format)
        .map_err(|e| ExtractionError::UnsupportedFormat(e.to_string()))
}

/// Extracts question text from an image.
///
/// The engine is only invoked once the bytes decode successfully.
#[instrument(skip_all, fields(bytes = image_bytes.len()))]
pub async fn extract_text(
    engine: &dyn OcrEngine,
    image_bytes: &[u8],
) -> Result<ExtractionResult, ExtractionError> {
    let image = decode_image(image_bytes).inspect_err(|e| warn!("Rejected image: {e}"))?;
    info!(
        width = image.width(),
        height = image.height(),
        "Image decoded, running OCR"
    );

    let recognized = engine
        .recognize(&image)
        .await
        .inspect_err(|e| warn!("OCR engine failed: {e}"))?;

    let raw_text = normalize(&recognized);
    info!(chars = raw_text.chars().count(), "OCR finished");
    Ok(ExtractionResult { raw_text })
}
