// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte-level primitives shared by the encoder and the interpreter.
//!
//! Binary frames travel inside JSON envelopes as text in the `pt` field.
//! [`PayloadCodec`] is the seam for that byte/text transport encoding;
//! [`Base64Codec`] is the encoding the hardware uses.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ParseError;

/// Converts binary frames to and from the text carried in `pt` fields.
pub trait PayloadCodec: Send + Sync {
    /// Encodes raw frame bytes as text.
    fn encode(&self, bytes: &[u8]) -> String;

    /// Decodes a text payload back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Payload` if the text is not a valid encoding.
    fn decode(&self, text: &str) -> Result<Vec<u8>, ParseError>;
}

/// Standard-alphabet, padded base64.
///
/// # Examples
///
/// ```
/// use govee_lan::codec::{Base64Codec, PayloadCodec};
///
/// let codec = Base64Codec;
/// assert_eq!(codec.encode(&[0xBB, 0x00, 0x01]), "uwAB");
/// assert_eq!(codec.decode("uwAB").unwrap(), vec![0xBB, 0x00, 0x01]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base64Codec;

impl PayloadCodec for Base64Codec {
    fn encode(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>, ParseError> {
        STANDARD
            .decode(text)
            .map_err(|e| ParseError::Payload(e.to_string()))
    }
}

/// Running XOR of every byte.
///
/// Appending the result to a frame makes the XOR of the whole frame zero.
///
/// # Examples
///
/// ```
/// use govee_lan::codec::xor_checksum;
///
/// assert_eq!(xor_checksum(&[]), 0);
/// assert_eq!(xor_checksum(&[0xBB, 0x00, 0x0E]), 0xB5);
/// ```
#[must_use]
pub fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, byte| acc ^ byte)
}
