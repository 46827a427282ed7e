//! The OCR collaborator boundary.
//!
//! The engine behind `TextRecognizer` is long-lived and stateful: model
//! load is expensive, so the Tesseract instance is created lazily on the
//! first recognize call and reused across strategies and scans until the
//! recognizer is dropped.

use std::io::Write;

use tempfile::NamedTempFile;
use tesseract::{PageSegMode, Tesseract};

use crate::utils::ScanError;

/// Character whitelist handed to the engine: the MRZ alphabet only.
pub const MRZ_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789<";

/// Anything that can turn an encoded image into raw multi-line text.
/// Engine instances are not reentrant; callers running concurrent scans
/// must serialize access (the scanner wraps its recognizer in a mutex).
pub trait TextRecognizer {
    fn recognize(&mut self, image_data: &[u8]) -> Result<String, ScanError>;
}

/// Tesseract-backed recognizer, whitelist-constrained to the MRZ alphabet.
pub struct TesseractRecognizer {
    lang: String,
    engine: Option<Tesseract>,
}

impl TesseractRecognizer {
    pub fn new(lang: &str) -> Self {
        TesseractRecognizer {
            lang: lang.to_string(),
            engine: None,
        }
    }

    fn acquire_engine(&mut self) -> Result<Tesseract, ScanError> {
        if let Some(engine) = self.engine.take() {
            return Ok(engine);
        }
        log::debug!("initializing Tesseract engine (lang={})", self.lang);
        let mut engine = Tesseract::new(None, Some(&self.lang))
            .map_err(|e| ScanError::Ocr(format!("Tesseract init error: {}", e)))?
            .set_variable("tessedit_char_whitelist", MRZ_WHITELIST)
            .map_err(|e| ScanError::Ocr(format!("Tesseract set variable error: {}", e)))?;
        engine.set_page_seg_mode(PageSegMode::PsmSingleBlock);
        Ok(engine)
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&mut self, image_data: &[u8]) -> Result<String, ScanError> {
        // The engine reads from a path, so stage the bytes in a temp file.
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(image_data)?;
        let path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| ScanError::Ocr("temp file path is not valid UTF-8".to_string()))?
            .to_string();

        let engine = self.acquire_engine()?;
        let mut engine = engine
            .set_image(&path)
            .map_err(|e| ScanError::Ocr(format!("Tesseract set image error: {}", e)))?;
        let text = engine
            .get_text()
            .map_err(|e| ScanError::Ocr(format!("Tesseract recognize error: {}", e)))?;

        // Hand the warm engine back for the next strategy or scan.
        self.engine = Some(engine);
        Ok(text)
    }
}
