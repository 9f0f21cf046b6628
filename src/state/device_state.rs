// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use std::net::IpAddr;
use std::time::Duration;

use crate::types::{PowerState, ProtocolType, RgbColor, SplitMode};

use super::StateChange;

/// Timestamps driving the render-tick scheduler.
///
/// All values are durations since an origin chosen by the caller; the
/// driver only ever compares them with the `now` it is handed. A check that
/// never ran is `None` and is due on the next tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    /// Last tick that consumed the identity-recheck slot.
    pub last_render_tick: Option<Duration>,
    /// Last status poll.
    pub last_status_poll: Option<Duration>,
    /// Last metadata (`scan`) request.
    pub last_metadata_check: Option<Duration>,
    /// Frames are withheld while `now` is before this instant.
    pub rendering_suppressed_until: Duration,
}

impl Timers {
    /// Returns `true` if rendering is suppressed at `now`.
    #[must_use]
    pub fn is_suppressed(&self, now: Duration) -> bool {
        now < self.rendering_suppressed_until
    }

    /// Returns `true` if a check last run at `last` is due again at `now`.
    #[must_use]
    pub fn is_due(last: Option<Duration>, now: Duration, interval: Duration) -> bool {
        last.is_none_or(|at| now.saturating_sub(at) > interval)
    }
}

/// Tracked state of one Govee device.
///
/// Identity fields are only written by inbound `scan` messages (through
/// [`StateChange::Identity`]), by the scan record the device was created
/// from, or by a settings load. Power and razer flags are written both by
/// inbound status messages and optimistically by the scheduler.
///
/// A state without a device ID is in test mode: it renders nothing useful
/// and keeps asking for device data until a `scan` reply binds it.
///
/// # Examples
///
/// ```
/// use govee_lan::state::DeviceState;
/// use govee_lan::types::{ProtocolType, SplitMode};
///
/// let state = DeviceState::new(
///     Some("192.168.1.20".parse().unwrap()),
///     20,
///     ProtocolType::Razer,
///     SplitMode::Single,
/// )
/// .with_identity(Some("AA:BB".into()), Some("H6199".into()), Some("1.02".into()));
///
/// assert!(!state.is_test_mode());
/// assert_eq!(state.name(), "Govee H6199 on 192.168.1.20");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    id: Option<String>,
    sku: Option<String>,
    firmware: Option<String>,
    ip: Option<IpAddr>,
    leds: u32,
    protocol: ProtocolType,
    split: SplitMode,
    name: String,
    unique_port: Option<u16>,

    power: PowerState,
    razer_active: bool,
    mode_payload: Option<String>,
    brightness: Option<u8>,
    reported_color: Option<RgbColor>,

    timers: Timers,
    last_solid_color: Option<RgbColor>,
    enabled: bool,
    test_mode: bool,
    has_changed: bool,
}

impl DeviceState {
    /// Creates the state of a device without an identity yet.
    #[must_use]
    pub fn new(ip: Option<IpAddr>, leds: u32, protocol: ProtocolType, split: SplitMode) -> Self {
        let mut state = Self {
            id: None,
            sku: None,
            firmware: None,
            ip,
            leds,
            protocol,
            split,
            name: String::new(),
            unique_port: None,
            power: PowerState::Off,
            razer_active: false,
            mode_payload: None,
            brightness: None,
            reported_color: None,
            timers: Timers::default(),
            last_solid_color: None,
            enabled: true,
            test_mode: true,
            has_changed: false,
        };
        state.name = state.generate_name();
        state
    }

    /// Creates a placeholder state with no device data, used for previews.
    #[must_use]
    pub fn test_mode() -> Self {
        Self::new(None, 0, ProtocolType::Unknown(0), SplitMode::Single)
    }

    /// Sets the initial identity. A present ID leaves test mode.
    ///
    /// The display name is regenerated from the SKU.
    #[must_use]
    pub fn with_identity(
        mut self,
        id: Option<String>,
        sku: Option<String>,
        firmware: Option<String>,
    ) -> Self {
        self.test_mode = id.is_none();
        self.id = id;
        self.sku = sku;
        self.firmware = firmware;
        self.name = self.generate_name();
        self
    }

    /// Overrides the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the port the device-specific listener binds to.
    #[must_use]
    pub fn with_unique_port(mut self, port: Option<u16>) -> Self {
        self.unique_port = port;
        self
    }

    // ========== Identity ==========

    /// Returns the device ID, if bound.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns `true` once a device ID is known.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the product SKU.
    #[must_use]
    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    /// Returns the firmware version.
    #[must_use]
    pub fn firmware(&self) -> Option<&str> {
        self.firmware.as_deref()
    }

    /// Returns the device address.
    #[must_use]
    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    /// Returns the LED count.
    #[must_use]
    pub fn leds(&self) -> u32 {
        self.leds
    }

    /// Returns the color encoding the device speaks.
    #[must_use]
    pub fn protocol(&self) -> ProtocolType {
        self.protocol
    }

    /// Returns the split mode.
    #[must_use]
    pub fn split(&self) -> SplitMode {
        self.split
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device-specific listening port.
    #[must_use]
    pub fn unique_port(&self) -> Option<u16> {
        self.unique_port
    }

    /// Returns `true` while no real device is bound.
    #[must_use]
    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    /// Builds the default display name from SKU and address.
    #[must_use]
    pub fn generate_name(&self) -> String {
        let sku = self.sku.as_deref().unwrap_or("device");
        match self.ip {
            Some(ip) => format!("Govee {sku} on {ip}"),
            None => format!("Govee {sku} on unknown address"),
        }
    }

    /// Returns `true` if an identity update arrived since the last call,
    /// and clears the flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.has_changed)
    }

    /// Returns `true` if an identity update is pending persistence.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    // ========== Power & Mode ==========

    /// Returns the last known power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Sets the power state.
    pub fn set_power(&mut self, power: PowerState) {
        self.power = power;
    }

    /// Returns `true` if razer mode is considered active.
    #[must_use]
    pub fn razer_active(&self) -> bool {
        self.razer_active
    }

    /// Sets the razer mode flag.
    pub fn set_razer_active(&mut self, active: bool) {
        self.razer_active = active;
    }

    /// Returns the last seen mode payload.
    #[must_use]
    pub fn mode_payload(&self) -> Option<&str> {
        self.mode_payload.as_deref()
    }

    /// Forgets the last seen mode payload.
    pub fn clear_mode_payload(&mut self) {
        self.mode_payload = None;
    }

    /// Returns the last reported brightness.
    #[must_use]
    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }

    /// Returns the last reported static color.
    #[must_use]
    pub fn reported_color(&self) -> Option<RgbColor> {
        self.reported_color
    }

    // ========== Rendering ==========

    /// Returns the scheduler timers.
    #[must_use]
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Returns the scheduler timers for update.
    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    /// Withholds frames until `until`.
    pub fn suppress_until(&mut self, until: Duration) {
        self.timers.rendering_suppressed_until = until;
    }

    /// Lifts any rendering suppression.
    pub fn clear_suppression(&mut self) {
        self.timers.rendering_suppressed_until = Duration::ZERO;
    }

    /// Returns the last color sent through the solid-color path.
    #[must_use]
    pub fn last_solid_color(&self) -> Option<RgbColor> {
        self.last_solid_color
    }

    /// Records the last color sent through the solid-color path.
    pub fn set_last_solid_color(&mut self, color: RgbColor) {
        self.last_solid_color = Some(color);
    }

    /// Returns `false` after an explicit shutdown.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables output.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    // ========== State Changes ==========

    /// Applies a state change and returns whether the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Identity { id, sku, firmware } => {
                if self.id == *id && self.sku == *sku && self.firmware == *firmware {
                    false
                } else {
                    self.id.clone_from(id);
                    self.sku.clone_from(sku);
                    self.firmware.clone_from(firmware);
                    self.name = self.generate_name();
                    self.test_mode = false;
                    self.has_changed = true;
                    true
                }
            }
            StateChange::Power(power) => {
                if self.power == *power {
                    false
                } else {
                    self.power = *power;
                    true
                }
            }
            StateChange::ModePayload(payload) => {
                if self.mode_payload == *payload {
                    false
                } else {
                    self.mode_payload.clone_from(payload);
                    true
                }
            }
            StateChange::RazerMode(active) => {
                if self.razer_active == *active {
                    false
                } else {
                    self.razer_active = *active;
                    true
                }
            }
            StateChange::Brightness(value) => {
                if self.brightness == Some(*value) {
                    false
                } else {
                    self.brightness = Some(*value);
                    true
                }
            }
            StateChange::ReportedColor(color) => {
                if self.reported_color == Some(*color) {
                    false
                } else {
                    self.reported_color = Some(*color);
                    true
                }
            }
        }
    }
}
