// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound datagrams.

use crate::command::{Command, Message};
use crate::config::DriverConfig;

/// One outbound UDP datagram: a command envelope and its destination port.
///
/// The destination address is the device's; only the port varies, since
/// `scan` requests go to the scan port and everything else to the control
/// port.
///
/// # Examples
///
/// ```
/// use govee_lan::DriverConfig;
/// use govee_lan::command::ScanCommand;
/// use govee_lan::protocol::Datagram;
///
/// let datagram = Datagram::for_command(&ScanCommand, &DriverConfig::default());
/// assert_eq!(datagram.port(), 4001);
/// assert_eq!(datagram.cmd(), "scan");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Datagram {
    message: Message,
    port: u16,
}

impl Datagram {
    /// Creates a datagram for an explicit port.
    #[must_use]
    pub fn new(message: Message, port: u16) -> Self {
        Self { message, port }
    }

    /// Creates a datagram for a command, routed by the configured ports.
    #[must_use]
    pub fn for_command(command: &dyn Command, config: &DriverConfig) -> Self {
        Self::control(command.to_message(), config)
    }

    /// Routes a rendered message by the configured ports.
    #[must_use]
    pub fn control(message: Message, config: &DriverConfig) -> Self {
        let port = if message.cmd() == "scan" {
            config.scan_port
        } else {
            config.control_port
        };
        Self { message, port }
    }

    /// Returns the command envelope.
    #[must_use]
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Returns the `cmd` of the envelope.
    #[must_use]
    pub fn cmd(&self) -> &'static str {
        self.message.cmd()
    }

    /// Returns the destination port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the wire bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.message.to_json().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{StatusCommand, TurnCommand};
    use crate::types::PowerState;

    #[test]
    fn control_commands_use_control_port() {
        let config = DriverConfig::default().with_control_port(5003);
        let datagram = Datagram::for_command(&StatusCommand, &config);
        assert_eq!(datagram.port(), 5003);

        let datagram = Datagram::for_command(&TurnCommand::new(PowerState::On), &config);
        assert_eq!(datagram.port(), 5003);
    }

    #[test]
    fn wire_bytes_are_json() {
        let datagram = Datagram::for_command(&StatusCommand, &DriverConfig::default());
        assert_eq!(
            datagram.to_bytes(),
            br#"{"msg":{"cmd":"status","data":{}}}"#.to_vec()
        );
    }
}
