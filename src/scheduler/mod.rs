// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render-tick scheduling.
//!
//! Every frame the render host hands the driver a color buffer. The
//! [`RenderScheduler`] decides what that tick is spent on. At most one
//! housekeeping task runs per tick, in this order:
//!
//! 1. Nothing while output is disabled or an alert is showing.
//! 2. A metadata (`scan`) request once per `metadata_interval`.
//! 3. The identity recheck slot once per `identity_recheck_interval`,
//!    requesting metadata again while no device ID is bound.
//! 4. A `turn` on plus `status` poll once per `status_poll_interval` for a
//!    bound device.
//!
//! A fresh [`DeviceState`] has never run any of these checks, so its first
//! ticks are spent on them.
//!
//! Otherwise the tick renders: power and razer mode are switched on
//! optimistically if not known to be on, then the color frame follows.
//!
//! The device sometimes ignores requests, so the scheduler never waits for a
//! reply. A lost datagram is corrected by the next poll.

mod tick;

pub use tick::{Tick, TickOutcome};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::codec::{Base64Codec, PayloadCodec};
use crate::command::frame::mode_toggle_frame;
use crate::command::{
    ColorEncoder, ColorwcCommand, Command, RazerCommand, ScanCommand, StatusCommand, TurnCommand,
};
use crate::config::DriverConfig;
use crate::error::EncodeError;
use crate::protocol::Datagram;
use crate::state::{DeviceState, Timers};
use crate::types::{FrameDelay, PowerState, RgbColor};

/// Decides what each render tick sends.
///
/// The scheduler is stateless; every timer lives in the
/// [`DeviceState`] it is handed.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use govee_lan::scheduler::{RenderScheduler, TickOutcome};
/// use govee_lan::state::DeviceState;
/// use govee_lan::types::{FrameDelay, ProtocolType, RgbColor, SplitMode};
///
/// let scheduler = RenderScheduler::default();
/// let mut state = DeviceState::new(
///     Some("192.168.1.20".parse().unwrap()),
///     2,
///     ProtocolType::Razer,
///     SplitMode::Single,
/// )
/// .with_identity(Some("AA:BB".into()), Some("H6199".into()), None);
///
/// let colors = [RgbColor::new(255, 0, 0), RgbColor::new(0, 0, 255)];
/// let tick = scheduler.on_tick(&mut state, &colors, Duration::ZERO, FrameDelay::NONE);
/// assert_eq!(tick.outcome(), &TickOutcome::MetadataRequested);
/// let tick = scheduler.on_tick(&mut state, &colors, Duration::ZERO, FrameDelay::NONE);
/// assert_eq!(tick.outcome(), &TickOutcome::ModeWaiting);
/// let tick = scheduler.on_tick(&mut state, &colors, Duration::ZERO, FrameDelay::NONE);
/// assert_eq!(tick.outcome(), &TickOutcome::StatusPolled);
///
/// let tick = scheduler.on_tick(&mut state, &colors, Duration::from_secs(1), FrameDelay::from(5));
///
/// // Power on and razer mode on, then the frame
/// let cmds: Vec<_> = tick.control().iter().map(|d| d.cmd()).collect();
/// assert_eq!(cmds, ["turn", "razer"]);
/// assert!(matches!(tick.outcome(), TickOutcome::FramePending { .. }));
/// assert_eq!(tick.delay(), Some(Duration::from_millis(5)));
/// ```
#[derive(Clone)]
pub struct RenderScheduler {
    config: DriverConfig,
    codec: Arc<dyn PayloadCodec>,
}

impl fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}

impl RenderScheduler {
    /// Creates a scheduler using base64 payloads.
    #[must_use]
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            codec: Arc::new(Base64Codec),
        }
    }

    /// Replaces the payload codec.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn PayloadCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Returns the payload codec.
    #[must_use]
    pub fn codec(&self) -> &dyn PayloadCodec {
        self.codec.as_ref()
    }

    /// Runs one render tick.
    pub fn on_tick(
        &self,
        state: &mut DeviceState,
        colors: &[RgbColor],
        now: Duration,
        frame_delay: FrameDelay,
    ) -> Tick {
        if !state.is_enabled() || state.timers().is_suppressed(now) {
            return Tick::new(Vec::new(), TickOutcome::Suppressed);
        }

        let mut control = Vec::new();
        let timers = *state.timers();

        if Timers::is_due(timers.last_metadata_check, now, self.config.metadata_interval) {
            tracing::debug!(device = %state.name(), "Asking device for device data");
            control.push(self.scan_request());
            state.timers_mut().last_metadata_check = Some(now);
            return Tick::new(control, TickOutcome::MetadataRequested);
        }

        if Timers::is_due(timers.last_render_tick, now, self.config.identity_recheck_interval) {
            if !state.has_identity() {
                tracing::debug!(device = %state.name(), "No device ID yet, asking for device data");
                control.push(self.scan_request());
            }
            state.timers_mut().last_render_tick = Some(now);
            return Tick::new(control, TickOutcome::ModeWaiting);
        }

        if state.has_identity()
            && Timers::is_due(timers.last_status_poll, now, self.config.status_poll_interval)
        {
            // Some devices stay off after the host wakes from sleep; a
            // periodic turn-on brings them back.
            tracing::debug!(device = %state.name(), "Polling device status");
            control.push(self.turn(PowerState::On));
            control.push(self.datagram(&StatusCommand));
            state.timers_mut().last_status_poll = Some(now);
            return Tick::new(control, TickOutcome::StatusPolled);
        }

        if !state.power().is_on() {
            control.push(self.turn(PowerState::On));
            state.set_power(PowerState::On);
        }

        if state.protocol().uses_razer_mode() && !state.razer_active() {
            tracing::debug!(device = %state.name(), "Enabling razer mode");
            control.push(self.mode_toggle(true));
            state.set_razer_active(true);
        }

        let encoder = ColorEncoder::new(state.protocol(), state.split()).with_sku(state.sku());
        match encoder.encode(colors) {
            Ok(frame) => {
                let frame = Datagram::control(frame.to_message(self.codec()), &self.config);
                let outcome = TickOutcome::FramePending {
                    frame,
                    delay: frame_delay.pacing(),
                };
                Tick::new(control, outcome)
            }
            Err(EncodeError::UnsupportedProtocol(_)) => {
                Tick::new(control, TickOutcome::FrameDropped)
            }
            Err(e) => {
                tracing::error!(
                    device = %state.name(),
                    error = %e,
                    protocol = %state.protocol(),
                    colors = ?colors,
                    "Failed to encode color frame"
                );
                Tick::new(control, TickOutcome::FrameDropped)
            }
        }
    }

    /// Sends one static color, bypassing the frame encoders.
    ///
    /// Status is polled (and razer mode switched off) once per
    /// `solid_color_poll_interval`; the color itself is only sent when it
    /// differs from the previous one.
    pub fn single_color(
        &self,
        state: &mut DeviceState,
        color: RgbColor,
        now: Duration,
    ) -> Vec<Datagram> {
        let mut datagrams = Vec::new();

        let last_poll = state.timers().last_render_tick;
        if Timers::is_due(last_poll, now, self.config.solid_color_poll_interval) {
            if state.razer_active() {
                tracing::debug!(device = %state.name(), "Disabling razer mode");
                datagrams.push(self.mode_toggle(false));
                // Cleared locally so razer off is sent once per switch and
                // the next render tick repeats the razer on handshake.
                state.set_razer_active(false);
            }
            datagrams.push(self.datagram(&StatusCommand));
            state.timers_mut().last_render_tick = Some(now);
        }

        self.push_solid_color(state, color, &mut datagrams);
        datagrams
    }

    /// Blanks the device, turns it off and disables further output.
    pub fn turn_off(&self, state: &mut DeviceState) -> Vec<Datagram> {
        state.clear_mode_payload();
        state.set_razer_active(false);
        state.set_power(PowerState::Off);
        state.set_enabled(false);

        let mut datagrams = Vec::new();
        self.push_solid_color(state, RgbColor::black(), &mut datagrams);
        datagrams.push(self.turn(PowerState::Off));

        tracing::info!(device = %state.name(), "Turned device off");
        datagrams
    }

    /// Returns the `turn` on datagram.
    #[must_use]
    pub fn turn_on(&self) -> Datagram {
        self.turn(PowerState::On)
    }

    fn push_solid_color(&self, state: &mut DeviceState, color: RgbColor, out: &mut Vec<Datagram>) {
        if state.last_solid_color() != Some(color) {
            state.set_last_solid_color(color);
            tracing::debug!(device = %state.name(), color = %color, "Sending new solid color");
            out.push(self.datagram(&ColorwcCommand::new(color)));
        }
    }

    fn scan_request(&self) -> Datagram {
        self.datagram(&ScanCommand)
    }

    fn turn(&self, power: PowerState) -> Datagram {
        self.datagram(&TurnCommand::new(power))
    }

    fn mode_toggle(&self, enable: bool) -> Datagram {
        let command = RazerCommand::from_frame(&mode_toggle_frame(enable), self.codec());
        self.datagram(&command)
    }

    fn datagram(&self, command: &dyn Command) -> Datagram {
        Datagram::for_command(command, &self.config)
    }
}
