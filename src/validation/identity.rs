//! Builds the final checksum-annotated identity from extracted fields.

use crate::models::{ChecksumFlags, FieldSet, MrzBlock, ParsedIdentity, ValidationStatus};
use crate::processing::extract::split_names;
use crate::validation::checksum::verify_digit;
use crate::validation::date;

/// Run every applicable check digit over a field set. Checks are
/// independent; one failing never masks the others.
pub fn verify_fields(fields: &FieldSet) -> ChecksumFlags {
    let personal_number_valid = match (&fields.personal_number_raw, fields.personal_number_check) {
        (Some(raw), Some(check)) => Some(verify_digit(raw, check)),
        _ => None,
    };

    let composite_valid = fields.composite_check.map(|check| {
        let composite = format!(
            "{}{}{}{}{}{}{}{}",
            fields.document_number_raw,
            fields.document_number_check,
            fields.birth_raw,
            fields.birth_check,
            fields.expiry_raw,
            fields.expiry_check,
            fields.personal_number_raw.as_deref().unwrap_or(""),
            fields
                .personal_number_check
                .map(String::from)
                .unwrap_or_default(),
        );
        verify_digit(&composite, check)
    });

    ChecksumFlags {
        document_number_valid: verify_digit(&fields.document_number_raw, fields.document_number_check),
        birth_date_valid: verify_digit(&fields.birth_raw, fields.birth_check),
        expiry_date_valid: verify_digit(&fields.expiry_raw, fields.expiry_check),
        personal_number_valid,
        composite_valid,
    }
}

fn status_from(checks: &ChecksumFlags) -> ValidationStatus {
    let passed = checks.passed();
    if passed == checks.total() {
        ValidationStatus::Ok
    } else if passed > 0 {
        ValidationStatus::Partial
    } else {
        ValidationStatus::Error
    }
}

/// Assemble the ParsedIdentity: split names, strip fillers from the
/// document number, resolve dates, attach checksum flags and the overall
/// status.
pub fn build_identity(block: &MrzBlock, fields: &FieldSet) -> ParsedIdentity {
    let checks = verify_fields(fields);
    let (surname, given_names) = split_names(&fields.names_raw);
    let full_name = if given_names.is_empty() {
        surname.clone()
    } else {
        format!("{} {}", given_names, surname)
    };

    let sex = match fields.sex.as_str() {
        "M" | "F" => fields.sex.clone(),
        _ => String::new(),
    };

    ParsedIdentity {
        format: block.effective_format(),
        document_type: fields.document_type.trim_end_matches('<').to_string(),
        issuing_country: fields.issuing_country.clone(),
        document_number: fields.document_number_raw.replace('<', ""),
        surname,
        given_names,
        full_name,
        nationality: fields.nationality.clone(),
        birth_date: date::resolve(&fields.birth_raw),
        sex,
        expiry_date: date::resolve(&fields.expiry_raw),
        status: status_from(&checks),
        checks,
        raw_lines: block.lines.clone(),
    }
}

/// Human-readable warnings for every failed check, surfaced alongside
/// PARTIAL results so the caller can offer manual correction.
pub fn failure_messages(checks: &ChecksumFlags) -> Vec<String> {
    let mut messages = Vec::new();
    if !checks.document_number_valid {
        messages.push("document number checksum failed".to_string());
    }
    if !checks.birth_date_valid {
        messages.push("birth date checksum failed".to_string());
    }
    if !checks.expiry_date_valid {
        messages.push("expiry date checksum failed".to_string());
    }
    if checks.personal_number_valid == Some(false) {
        messages.push("personal number checksum failed".to_string());
    }
    if checks.composite_valid == Some(false) {
        messages.push("composite checksum failed".to_string());
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MrzFormat;
    use crate::processing::extract::extract;
    use crate::validation::checksum::compute_check_digit;
    use chrono::NaiveDate;

    /// A well-formed TD1 block with check digits computed by the engine's
    /// own checksum, so all three checks must verify.
    fn clean_td1_block() -> MrzBlock {
        let document_number = "012345678";
        let birth = "900101";
        let expiry = "250101";
        let line1 = format!("I<HND{:<25}", "GARCIA<LOPEZ<<MARIA<JOSE").replace(' ', "<");
        let line2 = format!(
            "{}{}HND{}{}F{}{}<<",
            document_number,
            compute_check_digit(document_number),
            birth,
            compute_check_digit(birth),
            expiry,
            compute_check_digit(expiry),
        );
        let line3 = "<".repeat(30);
        MrzBlock::new(MrzFormat::Td1, vec![line1, line2, line3], 0)
    }

    #[test]
    fn test_clean_td1_parses_ok() {
        let block = clean_td1_block();
        assert_eq!(block.lines[0].len(), 30);
        assert_eq!(block.lines[1].len(), 30);

        let fields = extract(&block);
        let identity = build_identity(&block, &fields);

        assert_eq!(identity.status, ValidationStatus::Ok);
        assert!(identity.checks.document_number_valid);
        assert!(identity.checks.birth_date_valid);
        assert!(identity.checks.expiry_date_valid);
        assert_eq!(identity.format, MrzFormat::Td1);
        assert_eq!(identity.document_number, "012345678");
        assert_eq!(identity.surname, "GARCIA LOPEZ");
        assert_eq!(identity.given_names, "MARIA JOSE");
        assert_eq!(identity.full_name, "MARIA JOSE GARCIA LOPEZ");
        assert_eq!(identity.sex, "F");
        assert_eq!(identity.nationality, "HND");
        assert_eq!(identity.birth_date, NaiveDate::from_ymd_opt(1990, 1, 1));
        assert_eq!(identity.expiry_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert!(failure_messages(&identity.checks).is_empty());
    }

    #[test]
    fn test_one_bad_check_digit_gives_partial() {
        let mut block = clean_td1_block();
        // Corrupt the birth-date check digit (position 19 of line 2).
        let mut line2: Vec<char> = block.lines[1].chars().collect();
        line2[19] = if line2[19] == '9' { '8' } else { '9' };
        block.lines[1] = line2.into_iter().collect();

        let fields = extract(&block);
        let identity = build_identity(&block, &fields);

        assert_eq!(identity.status, ValidationStatus::Partial);
        assert!(identity.checks.document_number_valid);
        assert!(!identity.checks.birth_date_valid);
        assert!(identity.checks.expiry_date_valid);
        assert_eq!(
            failure_messages(&identity.checks),
            vec!["birth date checksum failed".to_string()]
        );
    }

    #[test]
    fn test_all_checks_failing_gives_error_with_data() {
        let block = MrzBlock::new(
            MrzFormat::Td1,
            vec![
                "I<HNDGARCIA<LOPEZ<<MARIA<JOSE<".to_string(),
                "0123456780HND9001010F2501010<<".to_string(),
                "<".repeat(30),
            ],
            0,
        );
        let fields = extract(&block);
        let identity = build_identity(&block, &fields);

        assert_eq!(identity.status, ValidationStatus::Error);
        // Data is still usable; nothing is thrown away.
        assert_eq!(identity.document_number, "012345678");
        assert_eq!(failure_messages(&identity.checks).len(), 3);
    }

    #[test]
    fn test_td3_specimen_verifies_completely() {
        let block = MrzBlock::new(
            MrzFormat::Td3,
            vec![
                "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<".to_string(),
                "L898902C36UTO7408122F1204159ZE184226B<<<<<10".to_string(),
            ],
            0,
        );
        let fields = extract(&block);
        let identity = build_identity(&block, &fields);

        assert_eq!(identity.status, ValidationStatus::Ok);
        assert_eq!(identity.checks.personal_number_valid, Some(true));
        assert_eq!(identity.checks.composite_valid, Some(true));
        assert_eq!(identity.document_number, "L898902C3");
        assert_eq!(identity.full_name, "ANNA MARIA ERIKSSON");
        assert_eq!(identity.birth_date, NaiveDate::from_ymd_opt(1974, 8, 12));
    }

    #[test]
    fn test_sex_filler_maps_to_empty() {
        let mut block = clean_td1_block();
        let mut line2: Vec<char> = block.lines[1].chars().collect();
        line2[20] = '<';
        block.lines[1] = line2.into_iter().collect();

        let fields = extract(&block);
        let identity = build_identity(&block, &fields);
        assert_eq!(identity.sex, "");
    }
}
