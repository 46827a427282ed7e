//! Resolves 6-digit MRZ date fields (YYMMDD) into calendar dates.

use chrono::{Datelike, NaiveDate, Utc};

/// Resolve a YYMMDD field against today's two-digit year. A two-digit year
/// greater than the current one is read as 1900s, otherwise 2000s. The
/// standard MRZ heuristic; it misreads people at exactly the 100-year
/// boundary, which is a documented limitation rather than something this
/// engine tries to outguess.
pub fn resolve(yymmdd: &str) -> Option<NaiveDate> {
    resolve_with_pivot(yymmdd, (Utc::now().year() % 100) as u32)
}

/// Same resolution with an explicit pivot year, for deterministic tests.
pub fn resolve_with_pivot(yymmdd: &str, current_yy: u32) -> Option<NaiveDate> {
    if yymmdd.len() != 6 || !yymmdd.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let yy: u32 = yymmdd[0..2].parse().ok()?;
    let month: u32 = yymmdd[2..4].parse().ok()?;
    let day: u32 = yymmdd[4..6].parse().ok()?;

    let year = if yy > current_yy { 1900 + yy } else { 2000 + yy } as i32;

    // Rejects impossible composites (month 13, February 30, ...).
    NaiveDate::from_ymd_opt(year, month, day)
}
