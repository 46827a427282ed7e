pub mod detect;
pub mod extract;
pub mod image;
pub mod normalize;
pub mod ocr;

pub use detect::detect;
pub use extract::extract;
pub use normalize::{correct_numeric, normalize_line};
pub use ocr::{TesseractRecognizer, TextRecognizer};
