// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color triple as carried in color frames.
//!
//! Render drivers hand the device a buffer of `[r, g, b]` triples, one per
//! LED segment. [`RgbColor`] is that triple with hex parsing for
//! convenience. It serializes as `{"r":..,"g":..,"b":..}`, the object layout
//! the `colorwc` command carries.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use govee_lan::types::RgbColor;
///
/// let color = RgbColor::new(255, 128, 0);
/// assert_eq!(color.to_bytes(), [255, 128, 0]);
///
/// let red = RgbColor::from_hex("#FF0000").unwrap();
/// assert_eq!(red, RgbColor::from([255, 0, 0]));
/// assert_eq!(red.to_hex_with_hash(), "#FF0000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    #[serde(rename = "r")]
    red: u8,
    #[serde(rename = "g")]
    green: u8,
    #[serde(rename = "b")]
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses an RGB color from a hex string.
    ///
    /// Accepts formats: `#RRGGBB`, `RRGGBB`, `#RGB`, `RGB`
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidHexColor` if the hex string is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use govee_lan::types::RgbColor;
    ///
    /// let color = RgbColor::from_hex("#FF5733").unwrap();
    /// assert_eq!(color.green(), 87);
    ///
    /// let short = RgbColor::from_hex("F00").unwrap();
    /// assert_eq!(short.red(), 255);
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        let hex = hex.trim_start_matches('#');

        match hex.len() {
            3 if hex.is_ascii() => {
                let chars: Vec<char> = hex.chars().collect();
                let r = parse_hex_char(chars[0])?;
                let g = parse_hex_char(chars[1])?;
                let b = parse_hex_char(chars[2])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            6 if hex.is_ascii() => {
                let r = parse_hex_pair(&hex[0..2])?;
                let g = parse_hex_pair(&hex[2..4])?;
                let b = parse_hex_pair(&hex[4..6])?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ValueError::InvalidHexColor(hex.to_string())),
        }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the channels in wire order.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Returns the color as a hex string without the hash prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Returns the color as a hex string with the hash prefix.
    #[must_use]
    pub fn to_hex_with_hash(&self) -> String {
        format!("#{}", self.to_hex())
    }

    /// Creates a black color, used to blank a device before powering it off.
    #[must_use]
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Creates a white color.
    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_with_hash())
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

fn parse_hex_char(c: char) -> Result<u8, ValueError> {
    c.to_digit(16)
        .and_then(|d| u8::try_from(d).ok())
        .ok_or_else(|| ValueError::InvalidHexColor(c.to_string()))
}

fn parse_hex_pair(s: &str) -> Result<u8, ValueError> {
    u8::from_str_radix(s, 16).map_err(|_| ValueError::InvalidHexColor(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_from_hex_full() {
        let color = RgbColor::from_hex("#FF5733").unwrap();
        assert_eq!(color.to_bytes(), [255, 87, 51]);

        let color = RgbColor::from_hex("00FF00").unwrap();
        assert_eq!(color.to_bytes(), [0, 255, 0]);
    }

    #[test]
    fn rgb_from_hex_short() {
        let color = RgbColor::from_hex("#0F0").unwrap();
        assert_eq!(color.to_bytes(), [0, 255, 0]);
    }

    #[test]
    fn rgb_from_hex_invalid() {
        assert!(RgbColor::from_hex("#GG0000").is_err());
        assert!(RgbColor::from_hex("#FF00").is_err());
        assert!(RgbColor::from_hex("").is_err());
    }

    #[test]
    fn rgb_to_hex_leading_zeros() {
        let color = RgbColor::new(0, 15, 255);
        assert_eq!(color.to_hex(), "000FFF");
        assert_eq!(color.to_string(), "#000FFF");
    }

    #[test]
    fn rgb_serializes_as_channel_object() {
        let json = serde_json::to_value(RgbColor::new(1, 2, 3)).unwrap();
        assert_eq!(json, serde_json::json!({"r": 1, "g": 2, "b": 3}));
    }

    #[test]
    fn rgb_conversions() {
        let from_tuple: RgbColor = (10u8, 20u8, 30u8).into();
        let from_array: RgbColor = [10u8, 20, 30].into();
        assert_eq!(from_tuple, from_array);
        assert_eq!(RgbColor::default(), RgbColor::black());
    }
}
