use crate::error::DataError;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Unit of an [`Interval`] label.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum IntervalUnit {
    Minute,
    Hour,
    Day,
}

impl IntervalUnit {
    fn minutes(self) -> u32 {
        match self {
            IntervalUnit::Minute => 1,
            IntervalUnit::Hour => 60,
            IntervalUnit::Day => 1440,
        }
    }

    fn suffix(self) -> char {
        match self {
            IntervalUnit::Minute => 'm',
            IntervalUnit::Hour => 'h',
            IntervalUnit::Day => 'd',
        }
    }
}

/// Sampling interval of a bar series, parsed from labels such as `15m`, `45m`, `1h` or `1d`.
///
/// The label is preserved for display, so `60m` and `1h` render as written even though they
/// share a [`duration`](Self::duration). Use [`same_duration`](Self::same_duration) to compare
/// by length.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Interval {
    value: u32,
    unit: IntervalUnit,
}

impl Interval {
    pub const M15: Self = Self::minutes(15);
    pub const M30: Self = Self::minutes(30);
    pub const M45: Self = Self::minutes(45);
    pub const M60: Self = Self::minutes(60);

    pub const fn minutes(value: u32) -> Self {
        Self {
            value,
            unit: IntervalUnit::Minute,
        }
    }

    pub const fn hours(value: u32) -> Self {
        Self {
            value,
            unit: IntervalUnit::Hour,
        }
    }

    pub const fn days(value: u32) -> Self {
        Self {
            value,
            unit: IntervalUnit::Day,
        }
    }

    /// Total length of this interval in minutes.
    pub fn total_minutes(&self) -> u32 {
        self.value.saturating_mul(self.unit.minutes())
    }

    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.total_minutes()))
    }

    pub fn same_duration(&self, other: &Interval) -> bool {
        self.total_minutes() == other.total_minutes()
    }

    /// Returns true if `self` evenly subdivides `other`, eg/ `15m` divides `45m`.
    pub fn divides(&self, other: &Interval) -> bool {
        let (fine, coarse) = (self.total_minutes(), other.total_minutes());
        fine > 0 && coarse % fine == 0
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

impl FromStr for Interval {
    type Err = DataError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let label = label.trim().to_ascii_lowercase();
        let invalid = || DataError::InvalidInterval(label.clone());

        let unit = match label.chars().last() {
            Some('m') => IntervalUnit::Minute,
            Some('h') => IntervalUnit::Hour,
            Some('d') => IntervalUnit::Day,
            _ => return Err(invalid()),
        };

        let value = label[..label.len() - 1]
            .parse::<u32>()
            .map_err(|_| invalid())?;

        if value == 0 {
            return Err(invalid());
        }

        Ok(Self { value, unit })
    }
}

impl TryFrom<String> for Interval {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.to_string()
    }
}
