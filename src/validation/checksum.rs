//! ICAO Doc 9303 check-digit arithmetic.
//!
//! Each character maps to a value (digits as themselves, `<` as 0, A-Z as
//! 10-35) and is weighted by the repeating 7-3-1 cycle; the check digit is
//! the weighted sum mod 10.

const WEIGHTS: [u32; 3] = [7, 3, 1];

pub fn char_value(c: char) -> u32 {
    match c {
        '<' => 0,
        '0'..='9' => c as u32 - '0' as u32,
        'A'..='Z' => c as u32 - 'A' as u32 + 10,
        _ => 0,
    }
}

pub fn checksum(field: &str) -> u32 {
    field
        .chars()
        .enumerate()
        .map(|(i, c)| char_value(c) * WEIGHTS[i % 3])
        .sum::<u32>()
        % 10
}

/// The check digit a well-formed MRZ would print for this field.
pub fn compute_check_digit(field: &str) -> char {
    char::from_digit(checksum(field), 10).unwrap_or('0')
}

/// Recompute the checksum and compare to the extracted check character.
/// Non-digit check characters always fail.
pub fn verify_digit(field: &str, check: char) -> bool {
    match check.to_digit(10) {
        Some(expected) => checksum(field) == expected,
        None => false,
    }
}
