//! Elapsed-time normalization to whole hours.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Whole hours since admission. Any timestamp with non-zero minutes rounds
/// up to the next hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourBucket(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("timestamp '{0}' is not in hh:mm form")]
    MissingSeparator(String),
    #[error("invalid {component} '{value}' in timestamp '{timestamp}'")]
    InvalidComponent {
        timestamp: String,
        component: &'static str,
        value: String,
    },
    #[error("timestamp '{0}' is out of range")]
    Overflow(String),
    #[error("timestamp '{timestamp}' falls in hour {hour}, past the limit of {max}")]
    BeyondLimit {
        timestamp: String,
        hour: u32,
        max: u32,
    },
}

impl HourBucket {
    pub const fn new(hour: u32) -> Self {
        Self(hour)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Normalizes `hh:mm`: `"03:00"` is hour 3, `"03:01"` and `"03:59"` are hour 4.
    pub fn from_timestamp(timestamp: &str) -> Result<Self, TimestampError> {
        let trimmed = timestamp.trim();
        let (hours, minutes) = trimmed
            .split_once(':')
            .ok_or_else(|| TimestampError::MissingSeparator(trimmed.to_string()))?;
        let hours = parse_component(trimmed, "hours", hours)?;
        let minutes = parse_component(trimmed, "minutes", minutes)?;
        let hour = if minutes > 0 {
            hours
                .checked_add(1)
                .ok_or_else(|| TimestampError::Overflow(trimmed.to_string()))?
        } else {
            hours
        };
        Ok(Self(hour))
    }
}

fn parse_component(
    timestamp: &str,
    component: &'static str,
    value: &str,
) -> Result<u32, TimestampError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| TimestampError::InvalidComponent {
            timestamp: timestamp.to_string(),
            component,
            value: value.to_string(),
        })
}

impl FromStr for HourBucket {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_timestamp(s)
    }
}

impl fmt::Display for HourBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<HourBucket> for i64 {
    fn from(bucket: HourBucket) -> Self {
        i64::from(bucket.0)
    }
}
