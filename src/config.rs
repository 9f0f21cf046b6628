// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Driver timing and port configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default interval between metadata (`scan`) requests.
pub const DEFAULT_METADATA_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Default interval between identity rechecks.
pub const DEFAULT_IDENTITY_RECHECK_INTERVAL: Duration = Duration::from_secs(20);

/// Default interval between status polls while rendering.
pub const DEFAULT_STATUS_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default interval between status polls on the solid-color path.
pub const DEFAULT_SOLID_COLOR_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default length of the rendering pause after an alert.
pub const DEFAULT_ALERT_SUPPRESSION: Duration = Duration::from_millis(600);

/// Default device control port.
pub const DEFAULT_CONTROL_PORT: u16 = 4003;

/// Default device scan port.
pub const DEFAULT_SCAN_PORT: u16 = 4001;

/// Configuration shared by the scheduler, the interpreter and the transport.
///
/// Durations serialize as whole milliseconds. Missing fields take their
/// default when deserializing.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use govee_lan::DriverConfig;
///
/// let config = DriverConfig::default()
///     .with_status_poll_interval(Duration::from_secs(5))
///     .with_control_port(14003);
///
/// assert_eq!(config.status_poll_interval, Duration::from_secs(5));
/// assert_eq!(config.metadata_interval, Duration::from_secs(3600));
/// assert_eq!(config.control_port, 14003);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriverConfig {
    /// How often the device is asked for its identity and firmware.
    #[serde(with = "millis")]
    pub metadata_interval: Duration,
    /// How often a tick is spent on checking that the identity is known.
    #[serde(with = "millis")]
    pub identity_recheck_interval: Duration,
    /// How often a bound device is polled for status while rendering.
    #[serde(with = "millis")]
    pub status_poll_interval: Duration,
    /// How often the solid-color path polls status.
    #[serde(with = "millis")]
    pub solid_color_poll_interval: Duration,
    /// How long rendering pauses after an alert signal.
    #[serde(with = "millis")]
    pub alert_suppression: Duration,
    /// Port for control commands.
    pub control_port: u16,
    /// Port for `scan` requests.
    pub scan_port: u16,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            metadata_interval: DEFAULT_METADATA_INTERVAL,
            identity_recheck_interval: DEFAULT_IDENTITY_RECHECK_INTERVAL,
            status_poll_interval: DEFAULT_STATUS_POLL_INTERVAL,
            solid_color_poll_interval: DEFAULT_SOLID_COLOR_POLL_INTERVAL,
            alert_suppression: DEFAULT_ALERT_SUPPRESSION,
            control_port: DEFAULT_CONTROL_PORT,
            scan_port: DEFAULT_SCAN_PORT,
        }
    }
}

impl DriverConfig {
    /// Sets the metadata request interval.
    #[must_use]
    pub fn with_metadata_interval(mut self, interval: Duration) -> Self {
        self.metadata_interval = interval;
        self
    }

    /// Sets the identity recheck interval.
    #[must_use]
    pub fn with_identity_recheck_interval(mut self, interval: Duration) -> Self {
        self.identity_recheck_interval = interval;
        self
    }

    /// Sets the status poll interval.
    #[must_use]
    pub fn with_status_poll_interval(mut self, interval: Duration) -> Self {
        self.status_poll_interval = interval;
        self
    }

    /// Sets the solid-color poll interval.
    #[must_use]
    pub fn with_solid_color_poll_interval(mut self, interval: Duration) -> Self {
        self.solid_color_poll_interval = interval;
        self
    }

    /// Sets the alert suppression window.
    #[must_use]
    pub fn with_alert_suppression(mut self, window: Duration) -> Self {
        self.alert_suppression = window;
        self
    }

    /// Sets the control port.
    #[must_use]
    pub fn with_control_port(mut self, port: u16) -> Self {
        self.control_port = port;
        self
    }

    /// Sets the scan port.
    #[must_use]
    pub fn with_scan_port(mut self, port: u16) -> Self {
        self.scan_port = port;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
