// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Caller-requested pacing between color frames.

use std::str::FromStr;
use std::time::Duration;

/// Desired pause after a color frame, in milliseconds.
///
/// Render hosts usually expose this as a free-form user property, so it is
/// parsed leniently: leading whitespace and a sign are accepted, digits are
/// read up to the first non-digit, and anything unparseable counts as zero.
/// Only a positive value produces a pacing hint.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use govee_lan::types::FrameDelay;
///
/// let delay: FrameDelay = "25ms".parse().unwrap();
/// assert_eq!(delay.pacing(), Some(Duration::from_millis(25)));
///
/// assert_eq!(FrameDelay::from(-5).pacing(), None);
/// assert_eq!("fast".parse::<FrameDelay>().unwrap().pacing(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameDelay(i64);

impl FrameDelay {
    /// No pacing.
    pub const NONE: Self = Self(0);

    /// Returns the raw millisecond value.
    #[must_use]
    pub const fn millis(&self) -> i64 {
        self.0
    }

    /// Returns the pause to apply after a frame, if any.
    #[must_use]
    pub fn pacing(&self) -> Option<Duration> {
        u64::try_from(self.0)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

impl From<i64> for FrameDelay {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Duration> for FrameDelay {
    fn from(value: Duration) -> Self {
        Self(i64::try_from(value.as_millis()).unwrap_or(i64::MAX))
    }
}

impl FromStr for FrameDelay {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(parse_leading_int(s).unwrap_or(0)))
    }
}

/// Reads an optionally signed integer prefix, ignoring leading whitespace.
///
/// Returns `None` when no digit follows the optional sign or the value
/// overflows `i64`.
pub(crate) fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_int_parsing() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("  17px"), Some(17));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("+8"), Some(8));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn only_positive_delay_paces() {
        assert_eq!(FrameDelay::NONE.pacing(), None);
        assert_eq!(FrameDelay::from(0).pacing(), None);
        assert_eq!(
            FrameDelay::from(1).pacing(),
            Some(Duration::from_millis(1))
        );
    }

    #[test]
    fn delay_from_duration() {
        let delay = FrameDelay::from(Duration::from_millis(30));
        assert_eq!(delay.millis(), 30);
    }
}
