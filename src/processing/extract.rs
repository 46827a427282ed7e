//! Fixed-offset field slicing per MRZ format.
//!
//! One offset table per format, shared by every caller. TD1 carries the
//! name line first and the numeric line second (the national-ID layout this
//! engine is built for); TD3 is the two-line passport layout.

use crate::models::{FieldSet, MrzBlock, MrzFormat};
use crate::processing::normalize::correct_numeric;

/// Right-pad with fillers, then cut to the exact format width. Slicing
/// never panics on short OCR output.
fn pad_line(line: &str, width: usize) -> String {
    let mut padded = line.to_string();
    while padded.len() < width {
        padded.push('<');
    }
    padded.truncate(width);
    padded
}

fn char_at(line: &str, index: usize) -> char {
    line.as_bytes().get(index).map(|b| *b as char).unwrap_or('<')
}

/// Split the composite names field on the first `<<` into surname and
/// given-name segments, collapsing internal fillers into single spaces.
/// A field with no `<<` is a lone unsplit name.
pub fn split_names(names_raw: &str) -> (String, String) {
    match names_raw.split_once("<<") {
        Some((surname, given)) => (clean_name_segment(surname), clean_name_segment(given)),
        None => (clean_name_segment(names_raw), String::new()),
    }
}

fn clean_name_segment(segment: &str) -> String {
    segment
        .split('<')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Slice a detected block into its raw fields. Numeric fields (document
/// number, dates, check characters) get the scoped digit-confusion
/// correction here, after slicing; names are left exactly as normalized.
pub fn extract(block: &MrzBlock) -> FieldSet {
    match block.effective_format() {
        MrzFormat::Td3 => extract_td3(block),
        _ => extract_td1(block),
    }
}

/// TD1, 30-character lines. Line 1: document type (0,2), issuing country
/// (2,3), names (5,25). Line 2: document number (0,9) + check, nationality
/// (10,3), birth date (13,6) + check, sex (20,1), expiry date (21,6) + check.
fn extract_td1(block: &MrzBlock) -> FieldSet {
    let width = MrzFormat::Td1.line_length();
    let line1 = pad_line(block.lines.first().map(String::as_str).unwrap_or(""), width);
    let line2 = pad_line(block.lines.get(1).map(String::as_str).unwrap_or(""), width);

    FieldSet {
        document_type: line1[0..2].to_string(),
        issuing_country: line1[2..5].to_string(),
        names_raw: line1[5..30].to_string(),
        document_number_raw: correct_numeric(&line2[0..9]),
        document_number_check: numeric_char_at(&line2, 9),
        nationality: line2[10..13].to_string(),
        birth_raw: correct_numeric(&line2[13..19]),
        birth_check: numeric_char_at(&line2, 19),
        sex: line2[20..21].to_string(),
        expiry_raw: correct_numeric(&line2[21..27]),
        expiry_check: numeric_char_at(&line2, 27),
        personal_number_raw: None,
        personal_number_check: None,
        composite_check: None,
    }
}

/// TD3, 44-character lines, per the ICAO passport layout. Also carries the
/// personal number and the composite (final) check digit. Passport document
/// and personal numbers are alphanumeric, so the digit-confusion correction
/// applies only to the date fields and check characters here.
fn extract_td3(block: &MrzBlock) -> FieldSet {
    let width = MrzFormat::Td3.line_length();
    let line1 = pad_line(block.lines.first().map(String::as_str).unwrap_or(""), width);
    let line2 = pad_line(block.lines.get(1).map(String::as_str).unwrap_or(""), width);

    FieldSet {
        document_type: line1[0..1].to_string(),
        issuing_country: line1[2..5].to_string(),
        names_raw: line1[5..44].to_string(),
        document_number_raw: line2[0..9].to_string(),
        document_number_check: numeric_char_at(&line2, 9),
        nationality: line2[10..13].to_string(),
        birth_raw: correct_numeric(&line2[13..19]),
        birth_check: numeric_char_at(&line2, 19),
        sex: line2[20..21].to_string(),
        expiry_raw: correct_numeric(&line2[21..27]),
        expiry_check: numeric_char_at(&line2, 27),
        personal_number_raw: Some(line2[28..42].to_string()),
        personal_number_check: Some(numeric_char_at(&line2, 42)),
        composite_check: Some(numeric_char_at(&line2, 43)),
    }
}

fn numeric_char_at(line: &str, index: usize) -> char {
    correct_numeric(&char_at(line, index).to_string())
        .chars()
        .next()
        .unwrap_or('<')
}
