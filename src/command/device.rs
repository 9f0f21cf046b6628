// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-level commands: metadata request, status poll and power.

use serde_json::{Value, json};

use crate::command::Command;
use crate::types::PowerState;

/// Requests the device's identity (ID, SKU, firmware).
///
/// The device answers with a `scan` message. This is sent to the scan port
/// rather than the control port.
///
/// # Examples
///
/// ```
/// use govee_lan::command::{Command, ScanCommand};
///
/// assert_eq!(
///     ScanCommand.to_json(),
///     r#"{"msg":{"cmd":"scan","data":{"account_topic":"reserve"}}}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCommand;

impl Command for ScanCommand {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn data(&self) -> Value {
        json!({ "account_topic": "reserve" })
    }
}

/// Asks the device to report its power and mode state.
///
/// The device answers with a `devStatus` message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCommand;

impl Command for StatusCommand {
    fn name(&self) -> &'static str {
        "status"
    }

    fn data(&self) -> Value {
        json!({})
    }
}

/// Switches the device on or off.
///
/// # Examples
///
/// ```
/// use govee_lan::command::{Command, TurnCommand};
/// use govee_lan::types::PowerState;
///
/// let off = TurnCommand::off();
/// assert_eq!(off.state(), PowerState::Off);
/// assert_eq!(off.data(), serde_json::json!({"value": 0}));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnCommand {
    state: PowerState,
}

impl TurnCommand {
    /// Creates a command setting the given power state.
    #[must_use]
    pub const fn new(state: PowerState) -> Self {
        Self { state }
    }

    /// Creates a command turning the device on.
    #[must_use]
    pub const fn on() -> Self {
        Self::new(PowerState::On)
    }

    /// Creates a command turning the device off.
    #[must_use]
    pub const fn off() -> Self {
        Self::new(PowerState::Off)
    }

    /// Returns the requested power state.
    #[must_use]
    pub const fn state(&self) -> PowerState {
        self.state
    }
}

impl Command for TurnCommand {
    fn name(&self) -> &'static str {
        "turn"
    }

    fn data(&self) -> Value {
        json!({ "value": self.state.as_num() })
    }
}
