//! Fixed-precision hour quantities.

use super::ParseHoursError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HUNDREDTHS_PER_HOUR: u32 = 100;

/// Non-negative number of hours with two decimal places of precision.
///
/// Stored as hundredths of an hour so that arithmetic stays exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hours(u32);

impl Hours {
    /// Zero hours.
    pub const ZERO: Self = Self(0);

    /// Creates a value from hundredths of an hour.
    #[must_use]
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    /// Creates a value from whole hours, or `None` on overflow.
    #[must_use]
    pub const fn from_whole(hours: u32) -> Option<Self> {
        match hours.checked_mul(HUNDREDTHS_PER_HOUR) {
            Some(hundredths) => Some(Self(hundredths)),
            None => None,
        }
    }

    /// Returns the value in hundredths of an hour.
    #[must_use]
    pub const fn hundredths(self) -> u32 {
        self.0
    }

    /// Adds two values, saturating at the numeric bound.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl FromStr for Hours {
    type Err = ParseHoursError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseHoursError(value.to_owned());
        let trimmed = value.trim();
        let (whole_part, fraction_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        let is_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if (whole_part.is_empty() && fraction_part.is_empty())
            || !is_digits(whole_part)
            || !is_digits(fraction_part)
            || fraction_part.len() > 2
        {
            return Err(invalid());
        }

        let whole = if whole_part.is_empty() {
            0
        } else {
            whole_part.parse::<u32>().map_err(|_| invalid())?
        };
        let fraction = match fraction_part.len() {
            0 => 0,
            1 => fraction_part.parse::<u32>().map_err(|_| invalid())? * 10,
            _ => fraction_part.parse::<u32>().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(HUNDREDTHS_PER_HOUR)
            .and_then(|hundredths| hundredths.checked_add(fraction))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl TryFrom<&str> for Hours {
    type Error = ParseHoursError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.checked_div(HUNDREDTHS_PER_HOUR).unwrap_or_default();
        let fraction = self.0.checked_rem(HUNDREDTHS_PER_HOUR).unwrap_or_default();
        write!(f, "{whole}.{fraction:02}")
    }
}
