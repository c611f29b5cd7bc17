//! Fixed label -> IANA timezone registry.

use chrono_tz::Tz;

use crate::config::TimezoneEntry;
use crate::error::{Error, Result};

/// Ordered, immutable mapping from a display label to a resolved timezone.
/// Built once at startup and passed by reference; iteration order is the
/// configuration order and is part of the conversion output contract.
#[derive(Debug, Clone)]
pub struct TimeZoneRegistry {
    entries: Vec<(String, Tz)>,
}

impl TimeZoneRegistry {
    /// Build the registry, failing if any zone id does not resolve or a
    /// label repeats.
    pub fn from_entries(entries: &[TimezoneEntry]) -> Result<Self> {
        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            let tz: Tz = entry.zone.parse().map_err(|_| {
                Error::Config(format!(
                    "Unresolvable timezone '{}' for label '{}'",
                    entry.zone, entry.label
                ))
            })?;
            if resolved.iter().any(|(label, _)| label == &entry.label) {
                return Err(Error::Config(format!(
                    "Duplicate timezone label: {}",
                    entry.label
                )));
            }
            resolved.push((entry.label.clone(), tz));
        }
        Ok(Self { entries: resolved })
    }

    pub fn resolve(&self, label: &str) -> Option<Tz> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, tz)| *tz)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Tz)> {
        self.entries.iter().map(|(l, tz)| (l.as_str(), *tz))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match a known label at the start of `input` (case-insensitive,
    /// longest label wins). Returns the canonical label and the remainder.
    /// Lets commands accept labels containing spaces without a separator.
    pub fn match_label_prefix<'a>(&self, input: &'a str) -> Option<(&str, &'a str)> {
        let trimmed = input.trim();

        let mut best: Option<(&str, usize, &'a str)> = None;
        for (label, _) in &self.entries {
            if let Some(rest) = strip_label_prefix(trimmed, label) {
                let matched = label.chars().count();
                if best.map(|(_, len, _)| matched > len).unwrap_or(true) {
                    best = Some((label.as_str(), matched, rest));
                }
            }
        }

        best.map(|(label, _, rest)| (label, rest))
    }
}

/// Case-insensitive label prefix match, char by char so that case folding
/// never desynchronizes byte offsets into `input`. The label must be followed
/// by whitespace or the end of the input.
fn strip_label_prefix<'a>(input: &'a str, label: &str) -> Option<&'a str> {
    let mut chars = input.char_indices();
    for expected in label.chars() {
        let (_, got) = chars.next()?;
        if !got.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    match chars.next() {
        None => Some(""),
        Some((idx, next)) if next.is_whitespace() => Some(input[idx..].trim_start()),
        Some(_) => None,
    }
}
