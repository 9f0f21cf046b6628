// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are the discrete updates the inbound interpreter derives
//! from device messages. They are applied to a
//! [`DeviceState`](super::DeviceState) and returned to the caller so it can
//! react (persist the device after an identity change, for instance).
//!
//! # Examples
//!
//! ```
//! use govee_lan::state::{DeviceState, StateChange};
//! use govee_lan::types::PowerState;
//!
//! let mut state = DeviceState::test_mode();
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::power(PowerState::On)));
//!
//! // Applying same change again returns false
//! assert!(!state.apply(&StateChange::power(PowerState::On)));
//! ```

use crate::types::{PowerState, RgbColor};

/// Represents a change in device state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// The device reported its identity.
    ///
    /// If any of the three fields differs from the stored identity, all
    /// three are replaced together.
    Identity {
        /// Unique device ID.
        id: Option<String>,
        /// Product SKU, e.g. `H6061`.
        sku: Option<String>,
        /// BLE firmware version.
        firmware: Option<String>,
    },

    /// The device reported its power state.
    Power(PowerState),

    /// The device reported a new opaque mode payload (`pt`).
    ModePayload(Option<String>),

    /// The razer (extended) mode flag changed.
    RazerMode(bool),

    /// The device reported its brightness (percent).
    Brightness(u8),

    /// The device reported its current static color.
    ReportedColor(RgbColor),
}

impl StateChange {
    /// Creates an identity change.
    #[must_use]
    pub fn identity(
        id: Option<String>,
        sku: Option<String>,
        firmware: Option<String>,
    ) -> Self {
        Self::Identity { id, sku, firmware }
    }

    /// Creates a power change.
    #[must_use]
    pub const fn power(state: PowerState) -> Self {
        Self::Power(state)
    }

    /// Creates a razer mode change.
    #[must_use]
    pub const fn razer_mode(active: bool) -> Self {
        Self::RazerMode(active)
    }

    /// Returns `true` if this is an identity change.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity { .. })
    }
}
