//! Cleans raw OCR lines into the MRZ alphabet `{A-Z, 0-9, <}`.
//!
//! Normalization never substitutes digits for letters: a blanket O->0 or
//! I->1 pass corrupts legitimate name characters. That correction is scoped
//! to fields known to be numeric and applied after field extraction, via
//! `correct_numeric`.

/// Marks OCR commonly reads in place of the MRZ filler: pipes, spacing
/// bars and the smart-quote family.
const FILLER_CONFUSABLES: &[char] = &[
    '|', '\u{01C0}', '\u{2016}', '\u{201A}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
];

/// Normalize one raw OCR line: uppercase, map filler confusables to `<`,
/// drop everything outside the MRZ alphabet. Pure and idempotent; an
/// unusable line simply comes back empty.
pub fn normalize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        let c = c.to_ascii_uppercase();
        if FILLER_CONFUSABLES.contains(&c) {
            out.push('<');
        } else if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '<' {
            out.push(c);
        }
    }
    out
}

/// Digit-confusion correction for numeric-only fields (document number,
/// dates, check characters). Never applied to name fields.
pub fn correct_numeric(field: &str) -> String {
    field
        .chars()
        .map(|c| match c {
            'O' | 'Q' | 'D' => '0',
            'I' | 'L' => '1',
            'Z' => '2',
            'S' => '5',
            'G' => '6',
            'B' => '8',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_uppercases_and_filters() {
        assert_eq!(normalize_line("i<hnd garcia"), "I<HNDGARCIA");
        assert_eq!(normalize_line("ab!@#12"), "AB12");
        assert_eq!(normalize_line(""), "");
    }

    #[test]
    fn test_normalize_maps_filler_confusables() {
        assert_eq!(normalize_line("A|B\u{2016}C\u{201C}D"), "A<B<C<D");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in ["I<HND0123456789", "ab|cd \u{201A}12", "ÑÉ<<X", "  <<  "] {
            let once = normalize_line(s);
            assert_eq!(normalize_line(&once), once);
        }
    }

    #[test]
    fn test_normalize_keeps_letters_o_and_i_intact() {
        // Names must survive normalization untouched.
        assert_eq!(normalize_line("OLIVIA<<ISIDORO"), "OLIVIA<<ISIDORO");
    }

    #[test]
    fn test_correct_numeric_maps_confused_letters() {
        assert_eq!(correct_numeric("O1234S678"), "012345678");
        assert_eq!(correct_numeric("9OOIOI"), "900101");
        assert_eq!(correct_numeric("25<10B"), "25<108");
    }

    #[test]
    fn test_correct_numeric_not_used_on_names() {
        // The scoping contract: name text run through normalize_line only
        // keeps its Os and Is, while the same text through correct_numeric
        // would not. The extractor must call the former for names.
        let name = "OLIVIA<LOPEZ";
        assert_eq!(normalize_line(name), name);
        assert_ne!(correct_numeric(name), name);
    }
}
