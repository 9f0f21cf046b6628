// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LED partitioning across logical device segments.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::RgbColor;

/// How a device's LEDs are partitioned.
///
/// Only [`SplitMode::Mirrored`] changes what goes on the wire: the color
/// buffer is sent twice in a row so both halves of the strip show the same
/// colors. The other modes are bookkeeping for the render host.
///
/// # Examples
///
/// ```
/// use govee_lan::types::{RgbColor, SplitMode};
///
/// let colors = [RgbColor::new(1, 2, 3), RgbColor::new(4, 5, 6)];
/// assert_eq!(SplitMode::Single.apply(&colors).len(), 2);
/// assert_eq!(SplitMode::Mirrored.apply(&colors).len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SplitMode {
    /// One logical device.
    #[default]
    Single,
    /// Both halves show the same buffer.
    Mirrored,
    /// The strip is driven as two devices.
    TwoDevices,
    /// The host maps custom components onto the strip.
    CustomComponents,
    /// A split number the driver does not know; treated like `Single`.
    Unknown(u8),
}

impl SplitMode {
    /// Converts a declared split number.
    #[must_use]
    pub const fn from_num(value: u8) -> Self {
        match value {
            1 => Self::Single,
            2 => Self::Mirrored,
            3 => Self::TwoDevices,
            4 => Self::CustomComponents,
            other => Self::Unknown(other),
        }
    }

    /// Returns the split number.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Mirrored => 2,
            Self::TwoDevices => 3,
            Self::CustomComponents => 4,
            Self::Unknown(value) => *value,
        }
    }

    /// Returns a human-readable split name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single device",
            Self::Mirrored => "Mirrored",
            Self::TwoDevices => "Two devices",
            Self::CustomComponents => "Custom components",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Applies the split to an outgoing color buffer.
    ///
    /// Mirrored buffers are concatenated with themselves; every other mode
    /// borrows the input unchanged.
    #[must_use]
    pub fn apply<'a>(&self, colors: &'a [RgbColor]) -> Cow<'a, [RgbColor]> {
        match self {
            Self::Mirrored => Cow::Owned(colors.repeat(2)),
            _ => Cow::Borrowed(colors),
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for SplitMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_num())
    }
}

impl<'de> Deserialize<'de> for SplitMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(Self::from_num)
    }
}
