// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Govee LAN device control.
//!
//! # Types
//!
//! - [`RgbColor`] - One `[r, g, b]` triple of a color frame
//! - [`PowerState`] - On/Off as reported by `onOff` and sent by `turn`
//! - [`ProtocolType`] - Which of the five color encodings a device speaks
//! - [`SplitMode`] - How the strip is partitioned (mirroring doubles frames)
//! - [`FrameDelay`] - Caller-requested pacing after a color frame

mod frame_delay;
mod power;
mod protocol_type;
mod rgb_color;
mod split_mode;

pub(crate) use frame_delay::parse_leading_int;
pub use frame_delay::FrameDelay;
pub use power::PowerState;
pub use protocol_type::ProtocolType;
pub use rgb_color::RgbColor;
pub use split_mode::SplitMode;
