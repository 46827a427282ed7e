pub mod data;

pub use data::{
    ChecksumFlags, FieldSet, MrzBlock, MrzFormat, ParsedIdentity, ScanCode, ScanResult,
    ValidationReport, ValidationStatus,
};
