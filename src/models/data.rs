use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// MRZ layout variants per ICAO Doc 9303. TD1 (3 x 30, national ID cards)
/// is the production format; TD3 (2 x 44, passports) is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MrzFormat {
    Td1,
    Td3,
    Unknown,
}

impl MrzFormat {
    pub fn line_count(&self) -> usize {
        match self {
            MrzFormat::Td1 => 3,
            MrzFormat::Td3 | MrzFormat::Unknown => 2,
        }
    }

    pub fn line_length(&self) -> usize {
        match self {
            MrzFormat::Td1 => 30,
            MrzFormat::Td3 | MrzFormat::Unknown => 44,
        }
    }
}

/// A contiguous group of normalized OCR lines identified as an MRZ,
/// plus where the group started in the original OCR output.
#[derive(Debug, Clone)]
pub struct MrzBlock {
    pub format: MrzFormat,
    pub lines: Vec<String>,
    pub start_index: usize,
}

impl MrzBlock {
    pub fn new(format: MrzFormat, lines: Vec<String>, start_index: usize) -> Self {
        MrzBlock {
            format,
            lines,
            start_index,
        }
    }

    /// Format used for slicing. Fallback blocks carry `Unknown` and are
    /// read with the offset table matching their line count.
    pub fn effective_format(&self) -> MrzFormat {
        match self.format {
            MrzFormat::Unknown => {
                if self.lines.len() >= 3 {
                    MrzFormat::Td1
                } else {
                    MrzFormat::Td3
                }
            }
            format => format,
        }
    }
}

/// Fixed-width slices taken out of an MrzBlock, before any interpretation.
/// Numeric fields have already had the scoped digit-confusion correction
/// applied; name fields are untouched.
#[derive(Debug, Clone)]
pub struct FieldSet {
    pub document_type: String,
    pub issuing_country: String,
    pub names_raw: String,
    pub document_number_raw: String,
    pub document_number_check: char,
    pub nationality: String,
    pub birth_raw: String,
    pub birth_check: char,
    pub sex: String,
    pub expiry_raw: String,
    pub expiry_check: char,
    /// TD3 only.
    pub personal_number_raw: Option<String>,
    pub personal_number_check: Option<char>,
    pub composite_check: Option<char>,
}

/// One independent pass/fail per checked field. No field's failure
/// invalidates the others.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChecksumFlags {
    pub document_number_valid: bool,
    pub birth_date_valid: bool,
    pub expiry_date_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_number_valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_valid: Option<bool>,
}

impl ChecksumFlags {
    pub fn passed(&self) -> usize {
        [
            Some(self.document_number_valid),
            Some(self.birth_date_valid),
            Some(self.expiry_date_valid),
            self.personal_number_valid,
            self.composite_valid,
        ]
        .iter()
        .filter(|flag| **flag == Some(true))
        .count()
    }

    pub fn total(&self) -> usize {
        3 + self.personal_number_valid.is_some() as usize + self.composite_valid.is_some() as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Ok,
    Partial,
    Error,
}

/// The structured output of a successful MRZ parse. Dates are resolved
/// calendar dates (None when the raw field is not a plausible date); the
/// full name is given-name-first.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedIdentity {
    pub format: MrzFormat,
    pub document_type: String,
    pub issuing_country: String,
    pub document_number: String,
    pub surname: String,
    pub given_names: String,
    pub full_name: String,
    pub nationality: String,
    pub birth_date: Option<NaiveDate>,
    pub sex: String,
    pub expiry_date: Option<NaiveDate>,
    pub checks: ChecksumFlags,
    pub status: ValidationStatus,
    pub raw_lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanCode {
    Ok,
    Partial,
    NoMrzDetected,
    NoImage,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    pub messages: Vec<String>,
}

/// Terminal result of a multi-strategy scan, serialized as-is for the
/// record-store collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub code: ScanCode,
    pub data: Option<ParsedIdentity>,
    pub validation: ValidationReport,
    pub strategy: String,
    pub timestamp: DateTime<Utc>,
}

impl ScanResult {
    pub fn no_image(message: &str) -> Self {
        ScanResult {
            code: ScanCode::NoImage,
            data: None,
            validation: ValidationReport {
                status: ValidationStatus::Error,
                messages: vec![message.to_string()],
            },
            strategy: String::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn no_mrz_detected() -> Self {
        ScanResult {
            code: ScanCode::NoMrzDetected,
            data: None,
            validation: ValidationReport {
                status: ValidationStatus::Error,
                messages: vec!["no plausible MRZ block found in any strategy".to_string()],
            },
            strategy: String::new(),
            timestamp: Utc::now(),
        }
    }
}
