// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Result of one render tick.

use std::time::Duration;

use crate::protocol::Datagram;

/// What a render tick decided to do.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Output is disabled or paused by an alert.
    Suppressed,
    /// The tick was spent asking for device metadata.
    MetadataRequested,
    /// The tick was spent on the identity recheck slot.
    ModeWaiting,
    /// The tick was spent polling device status.
    StatusPolled,
    /// A color frame is ready.
    FramePending {
        /// The frame datagram, sent after the control datagrams.
        frame: Datagram,
        /// Pause the caller should apply after sending the frame.
        delay: Option<Duration>,
    },
    /// No frame this tick (encoding failed or the protocol has no encoder).
    FrameDropped,
}

/// Datagrams produced by one render tick, in send order.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use govee_lan::scheduler::{RenderScheduler, TickOutcome};
/// use govee_lan::state::DeviceState;
/// use govee_lan::types::{FrameDelay, RgbColor};
///
/// let scheduler = RenderScheduler::default();
/// let mut state = DeviceState::test_mode();
/// state.set_enabled(false);
///
/// let colors = [RgbColor::white()];
/// let tick = scheduler.on_tick(&mut state, &colors, Duration::ZERO, FrameDelay::NONE);
/// assert_eq!(tick.outcome(), &TickOutcome::Suppressed);
/// assert!(tick.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    control: Vec<Datagram>,
    outcome: TickOutcome,
}

impl Tick {
    pub(crate) fn new(control: Vec<Datagram>, outcome: TickOutcome) -> Self {
        Self { control, outcome }
    }

    /// Returns the control datagrams sent before any frame.
    #[must_use]
    pub fn control(&self) -> &[Datagram] {
        &self.control
    }

    /// Returns the outcome.
    #[must_use]
    pub fn outcome(&self) -> &TickOutcome {
        &self.outcome
    }

    /// Returns the frame datagram, if one is pending.
    #[must_use]
    pub fn frame(&self) -> Option<&Datagram> {
        match &self.outcome {
            TickOutcome::FramePending { frame, .. } => Some(frame),
            _ => None,
        }
    }

    /// Returns the pause requested after the frame.
    #[must_use]
    pub fn delay(&self) -> Option<Duration> {
        match &self.outcome {
            TickOutcome::FramePending { delay, .. } => *delay,
            _ => None,
        }
    }

    /// Returns `true` if nothing is to be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.control.is_empty() && self.frame().is_none()
    }

    /// Returns every datagram in send order.
    #[must_use]
    pub fn into_datagrams(self) -> Vec<Datagram> {
        let mut datagrams = self.control;
        if let TickOutcome::FramePending { frame, .. } = self.outcome {
            datagrams.push(frame);
        }
        datagrams
    }
}
