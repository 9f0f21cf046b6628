// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Applies inbound messages to device state.

use std::time::Duration;

use crate::codec::PayloadCodec;
use crate::config::DriverConfig;
use crate::error::ParseError;
use crate::state::{DeviceState, StateChange};

use super::{
    AlertSignal, InboundMessage, ScanData, StatusData, parse_message, razer_flag_from_payload,
};

/// What an inbound message did to the device.
#[derive(Debug)]
pub enum Interpretation {
    /// Device state was updated.
    ///
    /// `changes` lists only the updates that altered the state; it is empty
    /// for a reply that repeated what was already known.
    StateMutation {
        /// Applied changes.
        changes: Vec<StateChange>,
        /// `true` if the identity changed and the device should be saved.
        identity_changed: bool,
    },
    /// Rendering suppression was switched on or off.
    AlertSignal(AlertSignal),
    /// The listener should shut down.
    Disconnect,
    /// The message was valid but not actionable.
    Unrecognized {
        /// What was not understood.
        reason: String,
    },
    /// The message could not be parsed.
    Malformed(ParseError),
}

impl Interpretation {
    /// Returns `true` if the identity changed.
    #[must_use]
    pub fn identity_changed(&self) -> bool {
        matches!(
            self,
            Self::StateMutation {
                identity_changed: true,
                ..
            }
        )
    }
}

/// Interprets one raw inbound message against a device's state.
///
/// Never fails: malformed and unrecognized input is logged and leaves the
/// state untouched.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use govee_lan::DriverConfig;
/// use govee_lan::codec::Base64Codec;
/// use govee_lan::message::{Interpretation, interpret};
/// use govee_lan::state::DeviceState;
///
/// let mut state = DeviceState::test_mode();
/// let raw = r#"{"msg":{"cmd":"scan","data":{"device":"AA:BB","sku":"H6199","bleVersionSoft":"1.02"}}}"#;
///
/// let result = interpret(&mut state, raw, Duration::ZERO, &Base64Codec, &DriverConfig::default());
/// assert!(result.identity_changed());
/// assert!(!state.is_test_mode());
/// assert!(state.name().contains("H6199"));
/// ```
pub fn interpret(
    state: &mut DeviceState,
    raw: &str,
    now: Duration,
    codec: &dyn PayloadCodec,
    config: &DriverConfig,
) -> Interpretation {
    let message = match parse_message(raw) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(device = %state.name(), error = %e, raw, "Malformed message");
            return Interpretation::Malformed(e);
        }
    };

    match message {
        InboundMessage::Scan(scan) => apply_scan(state, scan),
        InboundMessage::Status(status) => apply_status(state, status, codec),
        InboundMessage::Disconnect => {
            tracing::info!(device = %state.name(), "Disconnect requested");
            Interpretation::Disconnect
        }
        InboundMessage::Alert(signal) => {
            match signal {
                AlertSignal::Active => {
                    state.suppress_until(now + config.alert_suppression);
                    tracing::info!(
                        device = %state.name(),
                        window = ?config.alert_suppression,
                        "Disabling rendering due to an alert"
                    );
                }
                AlertSignal::Cleared => {
                    state.clear_suppression();
                    tracing::info!(device = %state.name(), "Re-enabling rendering");
                }
            }
            Interpretation::AlertSignal(signal)
        }
        InboundMessage::Unrecognized(reason) => {
            tracing::warn!(device = %state.name(), %reason, raw, "Unrecognized message");
            Interpretation::Unrecognized { reason }
        }
    }
}

fn apply_scan(state: &mut DeviceState, scan: ScanData) -> Interpretation {
    let change = StateChange::identity(scan.device, scan.sku, scan.ble_version_soft);
    let identity_changed = state.apply(&change);

    if identity_changed {
        tracing::info!(
            device = %state.name(),
            id = state.id().unwrap_or("-"),
            firmware = state.firmware().unwrap_or("-"),
            "Device identity updated"
        );
    }

    Interpretation::StateMutation {
        changes: if identity_changed { vec![change] } else { Vec::new() },
        identity_changed,
    }
}

fn apply_status(
    state: &mut DeviceState,
    status: StatusData,
    codec: &dyn PayloadCodec,
) -> Interpretation {
    let mut changes = Vec::new();
    let mut push = |state: &mut DeviceState, change: StateChange| {
        if state.apply(&change) {
            changes.push(change);
        }
    };

    if let Some(power) = status.power() {
        let previous = state.power();
        if previous != power {
            tracing::info!(
                device = %state.name(),
                from = %previous,
                to = %power,
                "Power state changed"
            );
        }
        push(state, StateChange::power(power));
    }

    if state.mode_payload() != status.pt.as_deref() {
        push(state, StateChange::ModePayload(status.pt.clone()));

        if let Some(pt) = status.pt.as_deref() {
            match codec.decode(pt) {
                Ok(bytes) => {
                    if let Some(active) = razer_flag_from_payload(&bytes) {
                        if active && !state.razer_active() {
                            tracing::debug!(device = %state.name(), "Razer mode reported on");
                        }
                        push(state, StateChange::razer_mode(active));
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        device = %state.name(),
                        error = %e,
                        pt,
                        "Undecodable mode payload"
                    );
                }
            }
        }
    }

    if let Some(brightness) = status.brightness {
        push(state, StateChange::Brightness(brightness));
    }
    if let Some(color) = status.color {
        push(state, StateChange::ReportedColor(color));
    }

    Interpretation::StateMutation {
        changes,
        identity_changed: false,
    }
}
