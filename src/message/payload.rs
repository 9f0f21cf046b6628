// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mode flag extraction from decoded `pt` payloads.

/// Byte 3 of a payload that carries the razer mode flag.
pub const MODE_SIGNATURE: u8 = 0xB2;

/// Reads the razer mode flag from a decoded `pt` payload.
///
/// Returns `None` when the payload does not carry the mode signature, in
/// which case the stored flag must be left alone.
///
/// # Examples
///
/// ```
/// use govee_lan::message::razer_flag_from_payload;
///
/// assert_eq!(razer_flag_from_payload(&[0xBB, 0x00, 0x01, 0xB2, 0x01, 0x09]), Some(true));
/// assert_eq!(razer_flag_from_payload(&[0xBB, 0x00, 0x01, 0xB2, 0x00, 0x08]), Some(false));
/// assert_eq!(razer_flag_from_payload(&[0xBB, 0x00, 0x01, 0xB1, 0x01, 0x0A]), None);
/// ```
#[must_use]
pub fn razer_flag_from_payload(bytes: &[u8]) -> Option<bool> {
    match bytes.get(3) {
        Some(&MODE_SIGNATURE) => Some(bytes.get(4) == Some(&0x01)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_payloads() {
        assert_eq!(razer_flag_from_payload(&[]), None);
        assert_eq!(razer_flag_from_payload(&[0xBB, 0x00, 0x01]), None);
        // Signature present, flag byte missing
        assert_eq!(razer_flag_from_payload(&[0xBB, 0x00, 0x01, 0xB2]), Some(false));
    }

    #[test]
    fn any_non_one_flag_clears() {
        assert_eq!(razer_flag_from_payload(&[0, 0, 0, 0xB2, 0x02]), Some(false));
        assert_eq!(razer_flag_from_payload(&[0, 0, 0, 0xB2, 0xFF]), Some(false));
    }
}
