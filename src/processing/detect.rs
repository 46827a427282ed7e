//! Locates the MRZ block inside a list of normalized OCR lines.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{MrzBlock, MrzFormat};

/// Acceptance band around the nominal TD1 line length of 30.
const TD1_BAND: RangeInclusive<usize> = 27..=35;
/// Acceptance band around the nominal TD3 line length of 44.
const TD3_BAND: RangeInclusive<usize> = 40..=50;

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{6}").expect("digit run pattern"))
}

/// Scan all contiguous windows for a plausible MRZ block. TD1 is the
/// primary supported format and wins top-to-bottom; TD3 is only considered
/// when the caller enables it. Returns None when nothing plausible is
/// found, which is the normal outcome for an unreadable photo.
pub fn detect(lines: &[String], allow_td3: bool) -> Option<MrzBlock> {
    if lines.len() >= 3 {
        for (i, window) in lines.windows(3).enumerate() {
            if window.iter().all(|l| TD1_BAND.contains(&l.len())) {
                return Some(MrzBlock::new(MrzFormat::Td1, window.to_vec(), i));
            }
        }
    }

    if allow_td3 && lines.len() >= 2 {
        for (i, window) in lines.windows(2).enumerate() {
            if window.iter().all(|l| TD3_BAND.contains(&l.len())) {
                return Some(MrzBlock::new(MrzFormat::Td3, window.to_vec(), i));
            }
        }
    }

    // Loose fallback: a line carrying the `<<` name separator paired with a
    // nearby line holding a run of six digits can form a two-line block.
    // A synthesized two-line block is read with passport offsets, so the
    // caller must have opted into TD3 for it to apply.
    if allow_td3 && lines.len() >= 2 {
        for (i, line) in lines.iter().enumerate() {
            if !line.contains("<<") {
                continue;
            }
            let partner = lines
                .iter()
                .enumerate()
                .find(|(j, other)| *j != i && digit_run().is_match(other))
                .map(|(j, _)| j);
            if let Some(j) = partner {
                let (first, second) = (i.min(j), i.max(j));
                return Some(MrzBlock::new(
                    MrzFormat::Unknown,
                    vec![lines[first].clone(), lines[second].clone()],
                    first,
                ));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_td1_window() {
        let input = lines(&[
            "REPUBLICA", // header noise, too short
            "I<HNDGARCIA<LOPEZ<<MARIA<JOSE<",
            "0123456784HND9001011F2501017<<",
            "<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<",
        ]);
        let block = detect(&input, false).expect("TD1 block");
        assert_eq!(block.format, MrzFormat::Td1);
        assert_eq!(block.start_index, 1);
        assert_eq!(block.lines.len(), 3);
    }

    #[test]
    fn test_detect_requires_at_least_two_lines() {
        assert!(detect(&[], false).is_none());
        assert!(detect(&lines(&["I<HNDGARCIA<LOPEZ<<MARIA<JOSE<"]), false).is_none());
    }

    #[test]
    fn test_detect_rejects_out_of_band_lengths() {
        let input = lines(&["SHORT", "ALSO<SHORT", "TINY"]);
        assert!(detect(&input, true).is_none());
    }

    #[test]
    fn test_detect_td3_only_when_enabled() {
        let input = lines(&[
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
            "L898902C36UTO7408122F1204159ZE184226B<<<<<10",
        ]);
        assert!(detect(&input, false).is_none());
        let block = detect(&input, true).expect("TD3 block");
        assert_eq!(block.format, MrzFormat::Td3);
        assert_eq!(block.start_index, 0);
    }

    #[test]
    fn test_detect_fallback_pairs_names_with_digits() {
        // Neither line fits a strict band, but together they look like an
        // MRZ fragment worth a parse attempt.
        let input = lines(&["GARCIA<LOPEZ<<MARIA", "XX0123456789XX"]);
        let block = detect(&input, true).expect("fallback block");
        assert_eq!(block.format, MrzFormat::Unknown);
        assert_eq!(block.lines.len(), 2);
        assert_eq!(block.start_index, 0);
        // Without TD3 opted in the loose pair is not synthesized.
        assert!(detect(&input, false).is_none());
    }

    #[test]
    fn test_detect_prefers_td1_over_td3() {
        let input = lines(&[
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<",
            "L898902C36UTO7408122F1204159ZE184226B<<<<<10",
            "I<HNDGARCIA<LOPEZ<<MARIA<JOSE<",
            "0123456784HND9001011F2501017<<",
            "<<<<<<<<<<<<<<<<<<<<<<<<<<<<<<",
        ]);
        let block = detect(&input, true).expect("block");
        assert_eq!(block.format, MrzFormat::Td1);
        assert_eq!(block.start_index, 2);
    }
}
