//! Canonicalization of loosely formatted time strings.

use std::sync::OnceLock;

use chrono::NaiveTime;
use regex::Regex;

use super::CanonicalTime;
use crate::error::{Error, Result};

fn leading_digit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d):").expect("valid regex"))
}

fn trailing_digit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The marker after the digit is captured and re-inserted so "9:3PM"
    // becomes "9:03PM", not "9:03".
    RE.get_or_init(|| Regex::new(r":(\d)(AM|PM|\s|$)").expect("valid regex"))
}

/// Parse a loose "HH:MM", "H:M", "HH:MM AM"-style string into a
/// [`CanonicalTime`]. Single-digit hours and minutes are zero-padded before
/// parsing; already-canonical input passes through unchanged.
pub fn normalize(raw: &str) -> Result<CanonicalTime> {
    let mut text = raw.trim().to_uppercase();

    text = leading_digit_re().replace(&text, "0${1}:").into_owned();
    text = trailing_digit_re()
        .replace(&text, ":0${1}${2}")
        .into_owned();
    text.retain(|c| !c.is_whitespace());

    let parsed = if text.contains("AM") || text.contains("PM") {
        NaiveTime::parse_from_str(&text, "%I:%M%p")
    } else {
        NaiveTime::parse_from_str(&text, "%H:%M")
    };

    parsed
        .map(CanonicalTime::from)
        .map_err(|_| Error::TimeFormat {
            raw: raw.to_string(),
        })
}
