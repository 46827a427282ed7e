use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Image processing error: {0}")]
    Image(String),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("OCR engine error: {0}")]
    Ocr(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
