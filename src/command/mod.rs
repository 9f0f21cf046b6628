// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Govee LAN command definitions.
//!
//! Every datagram the driver sends is a JSON envelope
//! `{"msg":{"cmd":<name>,"data":<object>}}`. This module provides typed
//! commands for each `cmd` and the binary frame encoder whose output rides
//! inside the `razer` command.
//!
//! # Available Commands
//!
//! | Command Type | `cmd` | Purpose |
//! |-------------|-------|---------|
//! | [`ScanCommand`] | `scan` | Ask the device for its ID, SKU and firmware |
//! | [`StatusCommand`] | `status` | Ask the device for its power and mode state |
//! | [`TurnCommand`] | `turn` | Switch the device on or off |
//! | [`ColorwcCommand`] | `colorwc` | Set one static color |
//! | [`RazerCommand`] | `razer` | Carry a binary frame (colors or mode toggle) |
//!
//! # Examples
//!
//! ```
//! use govee_lan::command::{Command, TurnCommand};
//! use govee_lan::types::PowerState;
//!
//! let cmd = TurnCommand::new(PowerState::On);
//! assert_eq!(cmd.to_json(), r#"{"msg":{"cmd":"turn","data":{"value":1}}}"#);
//! ```

mod color;
mod device;
pub mod frame;

pub use color::{ColorwcCommand, RazerCommand};
pub use device::{ScanCommand, StatusCommand, TurnCommand};
pub use frame::{ColorEncoder, Frame};

use serde::Serialize;
use serde_json::{Value, json};

/// A command that can be sent to a Govee device.
pub trait Command {
    /// Returns the `cmd` field of the envelope.
    fn name(&self) -> &'static str;

    /// Returns the `data` field of the envelope.
    fn data(&self) -> Value;

    /// Returns the full `{"msg":{"cmd","data"}}` envelope.
    fn envelope(&self) -> Value {
        json!({ "msg": { "cmd": self.name(), "data": self.data() } })
    }

    /// Returns the envelope serialized as compact JSON.
    fn to_json(&self) -> String {
        self.envelope().to_string()
    }

    /// Converts the command into a type-erased [`Message`].
    fn to_message(&self) -> Message {
        Message::new(self.name(), self.data())
    }
}

/// A rendered command, ready to be written to a socket.
///
/// Serializes as the `{"msg":{"cmd","data"}}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    msg: MessageBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct MessageBody {
    cmd: &'static str,
    data: Value,
}

impl Message {
    /// Creates a message from a command name and its data object.
    #[must_use]
    pub fn new(cmd: &'static str, data: Value) -> Self {
        Self {
            msg: MessageBody { cmd, data },
        }
    }

    /// Returns the `cmd` field.
    #[must_use]
    pub fn cmd(&self) -> &'static str {
        self.msg.cmd
    }

    /// Returns the `data` field.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.msg.data
    }

    /// Returns the envelope serialized as compact JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Serializing a `Value` tree with static keys cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
