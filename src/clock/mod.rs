//! Time parsing and multi-timezone conversion.

pub mod convert;
pub mod normalize;
pub mod registry;

pub use convert::{convert, current_time_in};
pub use normalize::normalize;
pub use registry::TimeZoneRegistry;

use chrono::{NaiveTime, Timelike};

/// A parsed, unambiguous hour/minute pair. Hour is 0-23.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalTime {
    pub hour: u32,
    pub minute: u32,
}

impl CanonicalTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    pub fn to_naive(self) -> NaiveTime {
        // Invariant upheld by constructors.
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default()
    }

    /// Format as 12-hour with explicit AM/PM, e.g. "03:04 PM".
    pub fn format_12h(self) -> String {
        self.to_naive().format("%I:%M %p").to_string()
    }
}

impl From<NaiveTime> for CanonicalTime {
    fn from(t: NaiveTime) -> Self {
        Self {
            hour: t.hour(),
            minute: t.minute(),
        }
    }
}
