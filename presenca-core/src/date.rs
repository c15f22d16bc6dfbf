//! Conversion between the display date format (`DD/MM/YYYY`) and the
//! internal storage format (`YYYY-MM-DD`).
//!
//! Both conversions are total: input that does not match the expected
//! pattern is returned unchanged. Callers must treat unchanged output as a
//! sign of invalid input, never as a converted value.

use chrono::NaiveDate;

/// Display format used for `chrono` formatting.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";
/// Internal storage format used for `chrono` formatting.
pub const INTERNAL_FORMAT: &str = "%Y-%m-%d";

/// Returns true if `s` has exactly the shape `DD/MM/YYYY` (ASCII digits).
pub fn is_display(s: &str) -> bool {
    matches_shape(s, &[2, 2, 4], b'/')
}

/// Returns true if `s` has exactly the shape `YYYY-MM-DD` (ASCII digits).
pub fn is_internal(s: &str) -> bool {
    matches_shape(s, &[4, 2, 2], b'-')
}

/// Converts `DD/MM/YYYY` to `YYYY-MM-DD`.
pub fn to_internal(display: &str) -> String {
    if !is_display(display) {
        return display.to_string();
    }
    let (day, month, year) = (&display[0..2], &display[3..5], &display[6..10]);
    format!("{}-{}-{}", year, month, day)
}

/// Converts `YYYY-MM-DD` to `DD/MM/YYYY`.
pub fn to_display(internal: &str) -> String {
    if !is_internal(internal) {
        return internal.to_string();
    }
    let (year, month, day) = (&internal[0..4], &internal[5..7], &internal[8..10]);
    format!("{}/{}/{}", day, month, year)
}

/// Parses a display-format date into a calendar date.
///
/// Unlike [`to_internal`], this rejects dates that do not exist (`31/02/2024`).
pub fn parse_display(s: &str) -> Option<NaiveDate> {
    if !is_display(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DISPLAY_FORMAT).ok()
}

/// Parses an internal-format date into a calendar date.
pub fn parse_internal(s: &str) -> Option<NaiveDate> {
    if !is_internal(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, INTERNAL_FORMAT).ok()
}

/// Formats a calendar date for display.
pub fn format_display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

fn matches_shape(s: &str, groups: &[usize; 3], sep: u8) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != groups.iter().sum::<usize>() + 2 {
        return false;
    }

    let mut pos = 0;
    for (i, len) in groups.iter().enumerate() {
        if !bytes[pos..pos + len].iter().all(u8::is_ascii_digit) {
            return false;
        }
        pos += len;
        if i < 2 {
            if bytes[pos] != sep {
                return false;
            }
            pos += 1;
        }
    }
    true
}
