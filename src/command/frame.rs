// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary color frame encoder.
//!
//! Each [`ProtocolType`] maps a color buffer to a different byte layout:
//!
//! | Type | Header | Payload | Trailer |
//! |------|--------|---------|---------|
//! | Dreamview | `BB lenHi lenLo B0` | `gradientOff count (r g b)*` | XOR checksum |
//! | DreamviewV2 | `BB lenHi lenLo B4` | `gradientOff count (r g b tag)*` | XOR checksum |
//! | Razer | `BB 00 0E B0 01 count` | `(r g b)*` | XOR checksum |
//! | RazerLegacy | `BB 00 0E B0 01 count` | `(r g b)*` | `00` |
//! | SolidColor | none | first color as `colorwc` | none |
//!
//! The length field of the Dreamview variants is the big-endian byte count
//! between the header and the checksum. The Razer length field is the
//! constant `0x000E` whatever the payload. The RazerLegacy trailer is always
//! `0x00`; legacy firmware does not verify it.

use std::borrow::Cow;

use crate::codec::{PayloadCodec, xor_checksum};
use crate::command::{ColorwcCommand, Command, Message, RazerCommand};
use crate::error::EncodeError;
use crate::types::{ProtocolType, RgbColor, SplitMode};

/// SKUs that cannot interpolate between colors.
///
/// Frames for these devices carry a gradient flag of 0. Matching is exact.
pub const GRADIENT_OFF_SKUS: [&str; 18] = [
    "H610A", "H6056", "H6047", "H610B", "H6046", "H6608", "H6609", "H606A", "H6065", "H6066",
    "H6067", "H6061", "H6043", "H6042", "H70BC", "H6063", "H6069", "H8069",
];

/// Largest color count a frame's single count byte can declare.
pub const MAX_COLORS: usize = u8::MAX as usize;

/// Number of leading colors DreamviewV2 tags as segment 1.
pub const DREAMVIEW_V2_FIRST_SEGMENT: usize = 37;

const FRAME_START: u8 = 0xBB;
const DREAMVIEW_OPCODE: u8 = 0xB0;
const DREAMVIEW_V2_OPCODE: u8 = 0xB4;
const RAZER_HEADER: [u8; 5] = [FRAME_START, 0x00, 0x0E, 0xB0, 0x01];
const MODE_TOGGLE_OPCODE: u8 = 0xB1;

/// Returns the gradient flag for a SKU.
///
/// # Examples
///
/// ```
/// use govee_lan::command::frame::gradient_off;
///
/// assert_eq!(gradient_off(Some("H6061")), 0);
/// assert_eq!(gradient_off(Some("H6199")), 1);
/// assert_eq!(gradient_off(Some("h6061")), 1);
/// assert_eq!(gradient_off(None), 1);
/// ```
#[must_use]
pub fn gradient_off(sku: Option<&str>) -> u8 {
    match sku {
        Some(sku) if GRADIENT_OFF_SKUS.contains(&sku) => 0,
        _ => 1,
    }
}

/// Builds the 6-byte razer mode toggle frame. It carries no checksum.
///
/// # Examples
///
/// ```
/// use govee_lan::command::frame::mode_toggle_frame;
///
/// assert_eq!(mode_toggle_frame(true), [0xBB, 0x00, 0x01, 0xB1, 0x01, 0x0A]);
/// assert_eq!(mode_toggle_frame(false), [0xBB, 0x00, 0x01, 0xB1, 0x00, 0x0B]);
/// ```
#[must_use]
pub const fn mode_toggle_frame(enable: bool) -> [u8; 6] {
    let (flag, trailer) = if enable { (0x01, 0x0A) } else { (0x00, 0x0B) };
    [FRAME_START, 0x00, 0x01, MODE_TOGGLE_OPCODE, flag, trailer]
}

/// Output of the color encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A binary frame, sent base64-encoded in a `razer` command.
    Binary(Vec<u8>),
    /// A static color, sent as a `colorwc` command.
    SolidColor(RgbColor),
}

impl Frame {
    /// Returns the raw bytes of a binary frame.
    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            Self::SolidColor(_) => None,
        }
    }

    /// Wraps the frame in its command envelope.
    #[must_use]
    pub fn to_message(&self, codec: &dyn PayloadCodec) -> Message {
        match self {
            Self::Binary(bytes) => RazerCommand::from_frame(bytes, codec).to_message(),
            Self::SolidColor(color) => ColorwcCommand::new(*color).to_message(),
        }
    }
}

/// Encodes color buffers for one device.
///
/// # Examples
///
/// ```
/// use govee_lan::command::{ColorEncoder, Frame};
/// use govee_lan::types::{ProtocolType, RgbColor, SplitMode};
///
/// let encoder = ColorEncoder::new(ProtocolType::Razer, SplitMode::Single);
/// let frame = encoder.encode(&[RgbColor::new(255, 0, 0)]).unwrap();
/// assert_eq!(
///     frame,
///     Frame::Binary(vec![0xBB, 0x00, 0x0E, 0xB0, 0x01, 0x01, 0xFF, 0x00, 0x00, 0xFA])
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorEncoder {
    protocol: ProtocolType,
    split: SplitMode,
    gradient_off: u8,
}

impl ColorEncoder {
    /// Creates an encoder for a device without a known SKU.
    #[must_use]
    pub fn new(protocol: ProtocolType, split: SplitMode) -> Self {
        Self {
            protocol,
            split,
            gradient_off: gradient_off(None),
        }
    }

    /// Sets the gradient flag from the device's SKU.
    #[must_use]
    pub fn with_sku(mut self, sku: Option<&str>) -> Self {
        self.gradient_off = gradient_off(sku);
        self
    }

    /// Returns the protocol this encoder targets.
    #[must_use]
    pub const fn protocol(&self) -> ProtocolType {
        self.protocol
    }

    /// Returns the gradient flag written into Dreamview frames.
    #[must_use]
    pub const fn gradient_off(&self) -> u8 {
        self.gradient_off
    }

    /// Encodes a color buffer, applying the split mode first.
    ///
    /// # Errors
    ///
    /// - `EncodeError::EmptyColors` for a solid-color device and no colors
    /// - `EncodeError::TooManyColors` if the (split) buffer exceeds [`MAX_COLORS`]
    /// - `EncodeError::UnsupportedProtocol` for an unknown protocol type
    pub fn encode(&self, colors: &[RgbColor]) -> Result<Frame, EncodeError> {
        let colors: Cow<'_, [RgbColor]> = self.split.apply(colors);

        match self.protocol {
            ProtocolType::Dreamview => dreamview_frame(self.gradient_off, &colors),
            ProtocolType::DreamviewV2 => dreamview_v2_frame(self.gradient_off, &colors),
            ProtocolType::Razer => razer_frame(&colors, true),
            ProtocolType::RazerLegacy => razer_frame(&colors, false),
            ProtocolType::SolidColor => colors
                .first()
                .map(|color| Frame::SolidColor(*color))
                .ok_or(EncodeError::EmptyColors),
            ProtocolType::Unknown(value) => Err(EncodeError::UnsupportedProtocol(value)),
        }
    }
}

fn color_count(colors: &[RgbColor]) -> Result<u8, EncodeError> {
    u8::try_from(colors.len()).map_err(|_| EncodeError::TooManyColors {
        count: colors.len(),
        max: MAX_COLORS,
    })
}

fn dreamview_frame(gradient_off: u8, colors: &[RgbColor]) -> Result<Frame, EncodeError> {
    let mut payload = Vec::with_capacity(2 + colors.len() * 3);
    payload.push(gradient_off);
    payload.push(color_count(colors)?);
    for color in colors {
        payload.extend_from_slice(&color.to_bytes());
    }

    Ok(Frame::Binary(length_framed(DREAMVIEW_OPCODE, &payload)))
}

fn dreamview_v2_frame(gradient_off: u8, colors: &[RgbColor]) -> Result<Frame, EncodeError> {
    let mut payload = Vec::with_capacity(2 + colors.len() * 4);
    payload.push(gradient_off);
    payload.push(color_count(colors)?);
    for (index, color) in colors.iter().enumerate() {
        payload.extend_from_slice(&color.to_bytes());
        payload.push(if index < DREAMVIEW_V2_FIRST_SEGMENT { 1 } else { 2 });
    }

    Ok(Frame::Binary(length_framed(DREAMVIEW_V2_OPCODE, &payload)))
}

fn razer_frame(colors: &[RgbColor], checksum: bool) -> Result<Frame, EncodeError> {
    let mut frame = Vec::with_capacity(RAZER_HEADER.len() + 2 + colors.len() * 3);
    frame.extend_from_slice(&RAZER_HEADER);
    frame.push(color_count(colors)?);
    for color in colors {
        frame.extend_from_slice(&color.to_bytes());
    }

    let trailer = if checksum { xor_checksum(&frame) } else { 0x00 };
    frame.push(trailer);
    Ok(Frame::Binary(frame))
}

/// Prefixes a Dreamview payload with its header and appends the checksum.
///
/// The payload is at most `2 + 4 * MAX_COLORS` bytes, so its length always
/// fits the 16-bit field.
fn length_framed(opcode: u8, payload: &[u8]) -> Vec<u8> {
    let len = u16::try_from(payload.len()).unwrap_or(u16::MAX);
    let [len_hi, len_lo] = len.to_be_bytes();

    let mut frame = Vec::with_capacity(payload.len() + 5);
    frame.extend_from_slice(&[FRAME_START, len_hi, len_lo, opcode]);
    frame.extend_from_slice(payload);
    frame.push(xor_checksum(&frame));
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rainbow(count: usize) -> Vec<RgbColor> {
        (0..count)
            .map(|i| {
                #[allow(clippy::cast_possible_truncation)]
                let v = (i * 7) as u8;
                RgbColor::new(v, v.wrapping_add(1), v.wrapping_add(2))
            })
            .collect()
    }

    fn binary(frame: Frame) -> Vec<u8> {
        match frame {
            Frame::Binary(bytes) => bytes,
            Frame::SolidColor(_) => panic!("expected binary frame"),
        }
    }

    fn declared_len(frame: &[u8]) -> usize {
        usize::from(u16::from_be_bytes([frame[1], frame[2]]))
    }

    #[test]
    fn gradient_flag_follows_deny_list() {
        for sku in GRADIENT_OFF_SKUS {
            assert_eq!(gradient_off(Some(sku)), 0, "{sku}");
        }
        assert_eq!(gradient_off(Some("H6199")), 1);
        assert_eq!(gradient_off(Some("")), 1);
        assert_eq!(gradient_off(Some(" H6061")), 1);
        assert_eq!(gradient_off(None), 1);
    }

    #[test]
    fn dreamview_layout() {
        let encoder = ColorEncoder::new(ProtocolType::Dreamview, SplitMode::Single);
        let frame = binary(encoder.encode(&[RgbColor::new(1, 2, 3)]).unwrap());

        assert_eq!(&frame[..4], &[0xBB, 0x00, 0x05, 0xB0]);
        assert_eq!(&frame[4..9], &[1, 1, 1, 2, 3]);
        assert_eq!(frame.len(), 10);
        assert_eq!(xor_checksum(&frame), 0);
    }

    #[test]
    fn dreamview_length_excludes_header_and_checksum() {
        let encoder = ColorEncoder::new(ProtocolType::Dreamview, SplitMode::Single);
        for count in [0, 1, 20, 86, 255] {
            let frame = binary(encoder.encode(&rainbow(count)).unwrap());
            assert_eq!(declared_len(&frame), frame.len() - 5);
            assert_eq!(declared_len(&frame), 2 + 3 * count);
            assert_eq!(xor_checksum(&frame), 0);
        }
    }

    #[test]
    fn dreamview_uses_sku_gradient_flag() {
        let encoder =
            ColorEncoder::new(ProtocolType::Dreamview, SplitMode::Single).with_sku(Some("H70BC"));
        let frame = binary(encoder.encode(&rainbow(2)).unwrap());
        assert_eq!(frame[4], 0);
        assert_eq!(frame[5], 2);
    }

    #[test]
    fn dreamview_v2_segment_tags() {
        let encoder = ColorEncoder::new(ProtocolType::DreamviewV2, SplitMode::Single);

        let frame = binary(encoder.encode(&rainbow(37)).unwrap());
        assert_eq!(frame[3], 0xB4);
        assert_eq!(declared_len(&frame), 2 + 4 * 37);
        let tags: Vec<u8> = frame[6..frame.len() - 1]
            .chunks(4)
            .map(|chunk| chunk[3])
            .collect();
        assert_eq!(tags.len(), 37);
        assert!(tags.iter().all(|tag| *tag == 1));

        let frame = binary(encoder.encode(&rainbow(38)).unwrap());
        let tags: Vec<u8> = frame[6..frame.len() - 1]
            .chunks(4)
            .map(|chunk| chunk[3])
            .collect();
        assert_eq!(tags[36], 1);
        assert_eq!(tags[37], 2);
        assert_eq!(xor_checksum(&frame), 0);
    }

    #[test]
    fn razer_layout_and_checksum() {
        let encoder = ColorEncoder::new(ProtocolType::Razer, SplitMode::Single);
        let frame = binary(encoder.encode(&rainbow(3)).unwrap());

        assert_eq!(&frame[..6], &[0xBB, 0x00, 0x0E, 0xB0, 0x01, 0x03]);
        assert_eq!(frame.len(), 6 + 9 + 1);
        assert_eq!(xor_checksum(&frame), 0);
    }

    #[test]
    fn razer_length_field_is_constant() {
        let encoder = ColorEncoder::new(ProtocolType::Razer, SplitMode::Single);
        for count in [0, 5, 100] {
            let frame = binary(encoder.encode(&rainbow(count)).unwrap());
            assert_eq!(&frame[1..3], &[0x00, 0x0E]);
        }
    }

    #[test]
    fn razer_legacy_trailer_is_zero() {
        let encoder = ColorEncoder::new(ProtocolType::RazerLegacy, SplitMode::Single);
        for count in [0, 1, 3, 64] {
            let frame = binary(encoder.encode(&rainbow(count)).unwrap());
            assert_eq!(frame.last(), Some(&0x00));
            let declared = u8::try_from(count).unwrap();
            assert_eq!(&frame[..6], &[0xBB, 0x00, 0x0E, 0xB0, 0x01, declared]);
        }
    }

    #[test]
    fn empty_buffers_still_frame() {
        let encoder = ColorEncoder::new(ProtocolType::Razer, SplitMode::Single);
        let frame = binary(encoder.encode(&[]).unwrap());
        assert_eq!(frame, vec![0xBB, 0x00, 0x0E, 0xB0, 0x01, 0x00, 0x04]);

        let encoder = ColorEncoder::new(ProtocolType::Dreamview, SplitMode::Single);
        let frame = binary(encoder.encode(&[]).unwrap());
        assert_eq!(&frame[..6], &[0xBB, 0x00, 0x02, 0xB0, 0x01, 0x00]);
    }

    #[test]
    fn solid_color_uses_first_color() {
        let encoder = ColorEncoder::new(ProtocolType::SolidColor, SplitMode::Single);
        let colors = [RgbColor::new(9, 8, 7), RgbColor::new(1, 1, 1)];
        assert_eq!(
            encoder.encode(&colors).unwrap(),
            Frame::SolidColor(RgbColor::new(9, 8, 7))
        );
        assert_eq!(encoder.encode(&[]), Err(EncodeError::EmptyColors));
    }

    #[test]
    fn mirrored_split_doubles_count() {
        let encoder = ColorEncoder::new(ProtocolType::Razer, SplitMode::Mirrored);
        let frame = binary(encoder.encode(&rainbow(4)).unwrap());
        assert_eq!(frame[5], 8);
        assert_eq!(&frame[6..18], &frame[18..30]);
    }

    #[test]
    fn too_many_colors_is_rejected() {
        let encoder = ColorEncoder::new(ProtocolType::Razer, SplitMode::Mirrored);
        assert_eq!(
            encoder.encode(&rainbow(200)),
            Err(EncodeError::TooManyColors {
                count: 400,
                max: MAX_COLORS
            })
        );
    }

    #[test]
    fn unknown_protocol_has_no_encoder() {
        let encoder = ColorEncoder::new(ProtocolType::Unknown(7), SplitMode::Single);
        assert_eq!(
            encoder.encode(&rainbow(1)),
            Err(EncodeError::UnsupportedProtocol(7))
        );
    }

    #[test]
    fn frame_messages() {
        use crate::codec::Base64Codec;

        let message = Frame::Binary(mode_toggle_frame(true).to_vec()).to_message(&Base64Codec);
        assert_eq!(message.cmd(), "razer");
        assert_eq!(message.data()["pt"], "uwABsQEK");

        let message = Frame::SolidColor(RgbColor::black()).to_message(&Base64Codec);
        assert_eq!(message.cmd(), "colorwc");
    }
}
