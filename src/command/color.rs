// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color commands: static color and binary frame carrier.

use serde_json::{Value, json};

use crate::codec::PayloadCodec;
use crate::command::Command;
use crate::types::RgbColor;

/// Sets a single static color.
///
/// The color temperature is always sent as zero so the device uses the RGB
/// value as-is.
///
/// # Examples
///
/// ```
/// use govee_lan::command::{ColorwcCommand, Command};
/// use govee_lan::types::RgbColor;
///
/// let cmd = ColorwcCommand::new(RgbColor::new(255, 0, 16));
/// let data = cmd.data();
/// assert_eq!(data["color"]["r"], 255);
/// assert_eq!(data["color"]["b"], 16);
/// assert_eq!(data["colorTemInKelvin"], 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorwcCommand {
    color: RgbColor,
}

impl ColorwcCommand {
    /// Creates a static color command.
    #[must_use]
    pub const fn new(color: RgbColor) -> Self {
        Self { color }
    }

    /// Returns the color.
    #[must_use]
    pub const fn color(&self) -> RgbColor {
        self.color
    }
}

impl Command for ColorwcCommand {
    fn name(&self) -> &'static str {
        "colorwc"
    }

    fn data(&self) -> Value {
        json!({
            "color": {
                "r": self.color.red(),
                "g": self.color.green(),
                "b": self.color.blue(),
            },
            "colorTemInKelvin": 0,
        })
    }
}

/// Carries a binary frame in the `pt` field.
///
/// Used for every framed color encoding and for the razer mode toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RazerCommand {
    pt: String,
}

impl RazerCommand {
    /// Encodes raw frame bytes with the given codec.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_lan::codec::Base64Codec;
    /// use govee_lan::command::{Command, RazerCommand};
    ///
    /// let cmd = RazerCommand::from_frame(&[0xBB, 0x00, 0x01], &Base64Codec);
    /// assert_eq!(cmd.pt(), "uwAB");
    /// assert_eq!(cmd.name(), "razer");
    /// ```
    #[must_use]
    pub fn from_frame(frame: &[u8], codec: &dyn PayloadCodec) -> Self {
        Self {
            pt: codec.encode(frame),
        }
    }

    /// Returns the transport-encoded payload.
    #[must_use]
    pub fn pt(&self) -> &str {
        &self.pt
    }
}

impl Command for RazerCommand {
    fn name(&self) -> &'static str {
        "razer"
    }

    fn data(&self) -> Value {
        json!({ "pt": self.pt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Base64Codec;

    #[test]
    fn colorwc_envelope() {
        let cmd = ColorwcCommand::new(RgbColor::new(1, 2, 3));
        let envelope = cmd.envelope();
        assert_eq!(envelope["msg"]["cmd"], "colorwc");
        assert_eq!(
            envelope["msg"]["data"],
            json!({"color": {"r": 1, "g": 2, "b": 3}, "colorTemInKelvin": 0})
        );
    }

    #[test]
    fn razer_payload_decodes_back() {
        let frame = [0xBB, 0x00, 0x01, 0xB1, 0x01, 0x0A];
        let cmd = RazerCommand::from_frame(&frame, &Base64Codec);
        assert_eq!(Base64Codec.decode(cmd.pt()).unwrap(), frame.to_vec());
        assert_eq!(cmd.data()["pt"], cmd.pt());
    }
}
