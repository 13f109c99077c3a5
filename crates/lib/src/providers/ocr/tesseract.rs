use crate::{
    constants::{DEFAULT_OCR_LANGUAGE, DEFAULT_TESSERACT_BINARY},
    errors::OcrError,
    providers::ocr::{encode_png, OcrEngine},
};
use async_trait::async_trait;
use image::DynamicImage;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs the `tesseract` command-line program on a staged PNG copy of the image.
#[derive(Clone, Debug)]
pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TESSERACT_BINARY, DEFAULT_OCR_LANGUAGE)
    }
}

impl TesseractEngine {
    /// Creates an engine using `binary` (a path or a name on `PATH`) and the
    /// Tesseract language code `language`, e.g. `eng` or `eng+deu`.
    pub fn new(binary: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let png = encode_png(image)?;
        let staged = tempfile::Builder::new()
            .prefix("studytutor-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Stage(e.to_string()))?;
        tokio::fs::write(staged.path(), &png)
            .await
            .map_err(|e| OcrError::Stage(e.to_string()))?;

        debug!(binary = %self.binary.display(), language = %self.language, "Running tesseract");

        let output = Command::new(&self.binary)
            .arg(staged.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .await
            .map_err(OcrError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, "tesseract exited unsuccessfully");
            return Err(OcrError::Exit {
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
