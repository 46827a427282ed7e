pub mod models;
pub mod processing;
pub mod scanner;
pub mod utils;
pub mod validation;

pub use scanner::{default_strategies, MrzScanner, ScanOptions, ScanStrategy};
pub use utils::ScanError;
