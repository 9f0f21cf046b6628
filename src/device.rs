// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device abstraction for Govee LAN devices.
//!
//! [`GoveeDevice`] bundles a device's [`DeviceState`] with the scheduler and
//! codec it is driven by, and adds persistence. It performs no I/O: every
//! method returns the datagrams to send, which keeps it usable from any
//! runtime. The `udp` feature's
//! [`DeviceSession`](crate::protocol::DeviceSession) wires it to a socket.

use std::time::Duration;

use serde_json::{Map, Value, json};

use crate::config::DriverConfig;
use crate::error::{SettingsError, ValueError};
use crate::message::{Interpretation, interpret};
use crate::protocol::Datagram;
use crate::scheduler::{RenderScheduler, Tick};
use crate::settings::{DeviceRecord, SETTING_KEYS, SettingsStore};
use crate::state::DeviceState;
use crate::types::{FrameDelay, RgbColor};

/// A Govee device driven over the LAN protocol.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use govee_lan::{DriverConfig, GoveeDevice};
/// use govee_lan::settings::DeviceRecord;
/// use govee_lan::types::{FrameDelay, RgbColor};
///
/// let record: DeviceRecord = serde_json::from_str(
///     r#"{"id":"AA:BB","ip":"192.168.1.20","leds":20,"type":1,"sku":"H6061"}"#,
/// ).unwrap();
/// let mut device = GoveeDevice::from_record(record, DriverConfig::default()).unwrap();
///
/// let red = [RgbColor::new(255, 0, 0)];
///
/// // Metadata request, identity recheck slot, status poll
/// for _ in 0..3 {
///     assert!(device.send_rgb(&red, Duration::ZERO, FrameDelay::NONE).frame().is_none());
/// }
/// let tick = device.send_rgb(&red, Duration::from_secs(1), FrameDelay::NONE);
/// assert!(tick.frame().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct GoveeDevice {
    state: DeviceState,
    scheduler: RenderScheduler,
}

impl GoveeDevice {
    /// Creates a device from existing state.
    #[must_use]
    pub fn new(state: DeviceState, config: DriverConfig) -> Self {
        Self {
            state,
            scheduler: RenderScheduler::new(config),
        }
    }

    /// Creates a device from a scan or cache record.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidAddress` if the record's IP is invalid.
    pub fn from_record(
        record: DeviceRecord,
        config: DriverConfig,
    ) -> Result<Self, ValueError> {
        Ok(Self::new(record.into_state()?, config))
    }

    /// Creates a device with no data, for previews. It never renders frames.
    #[must_use]
    pub fn test_device() -> Self {
        Self::new(DeviceState::test_mode(), DriverConfig::default())
    }

    /// Replaces the scheduler (for a custom payload codec).
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: RenderScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    // ========== Accessors ==========

    /// Returns the device state.
    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Returns the device state for update.
    pub fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.state.name()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        self.scheduler.config()
    }

    /// Returns the scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    // ========== Driving ==========

    /// Interprets one inbound message.
    pub fn handle_message(&mut self, raw: &str, now: Duration) -> Interpretation {
        interpret(
            &mut self.state,
            raw,
            now,
            self.scheduler.codec(),
            self.scheduler.config(),
        )
    }

    /// Runs one render tick with a color buffer.
    pub fn send_rgb(
        &mut self,
        colors: &[RgbColor],
        now: Duration,
        frame_delay: FrameDelay,
    ) -> Tick {
        self.scheduler.on_tick(&mut self.state, colors, now, frame_delay)
    }

    /// Sends one static color through the solid-color path.
    pub fn single_color(&mut self, color: RgbColor, now: Duration) -> Vec<Datagram> {
        self.scheduler.single_color(&mut self.state, color, now)
    }

    /// Blanks and turns off the device, disabling further output.
    pub fn turn_off(&mut self) -> Vec<Datagram> {
        self.scheduler.turn_off(&mut self.state)
    }

    /// Returns the `turn` on datagram.
    #[must_use]
    pub fn turn_on(&self) -> Datagram {
        self.scheduler.turn_on()
    }

    // ========== Persistence ==========

    /// Saves the device under its ID.
    ///
    /// Returns `false` without writing anything while no ID is bound.
    pub fn save(&self, store: &mut dyn SettingsStore) -> bool {
        let Some(id) = self.state.id() else {
            tracing::info!(device = %self.name(), "Device data not received yet, saving later");
            return false;
        };

        let state = &self.state;
        let values = [
            state.ip().map_or(Value::Null, |ip| json!(ip.to_string())),
            json!(state.leds()),
            json!(state.protocol().as_num()),
            json!(state.split().as_num()),
            json!(state.sku()),
            json!(state.firmware()),
            json!(state.name()),
            json!(state.unique_port()),
        ];
        for (key, value) in SETTING_KEYS.iter().zip(values) {
            store.save_setting(id, key, value);
        }

        tracing::info!(device = %self.name(), id, "Saved device");
        self.print_details();
        true
    }

    /// Loads a saved device.
    ///
    /// # Errors
    ///
    /// - `SettingsError::Missing` if no address is stored for `id`
    /// - `SettingsError::InvalidValue` if a stored value has the wrong shape
    pub fn load(
        store: &dyn SettingsStore,
        id: &str,
        config: DriverConfig,
    ) -> Result<Self, SettingsError> {
        if store.get_setting(id, "ip").is_none() {
            return Err(SettingsError::Missing {
                device_id: id.to_string(),
                key: "ip".to_string(),
            });
        }

        let mut fields = Map::new();
        fields.insert("id".to_string(), json!(id));
        for key in SETTING_KEYS {
            if let Some(value) = store.get_setting(id, key) {
                let field = if key == "firmware" { "bleVersionSoft" } else { key };
                fields.insert(field.to_string(), value);
            }
        }

        let record: DeviceRecord =
            serde_json::from_value(Value::Object(fields)).map_err(|e| SettingsError::InvalidValue {
                key: "device record".to_string(),
                message: e.to_string(),
            })?;
        let state = record.into_state().map_err(|e| SettingsError::InvalidValue {
            key: "ip".to_string(),
            message: e.to_string(),
        })?;

        let device = Self::new(state, config);
        tracing::info!(device = %device.name(), id, "Loaded device");
        device.print_details();
        Ok(device)
    }

    /// Returns the compact record the host caches between runs.
    #[must_use]
    pub fn to_cache_record(&self) -> DeviceRecord {
        let state = &self.state;
        DeviceRecord {
            id: state.id().map(str::to_string),
            ip: state.ip().map(|ip| ip.to_string()),
            name: Some(state.name().to_string()),
            leds: Some(state.leds()),
            protocol: Some(state.protocol().as_num()),
            split: Some(state.split().as_num()),
            sku: None,
            firmware: None,
            unique_port: state.unique_port(),
        }
    }

    /// Logs the device's details.
    pub fn print_details(&self) {
        let state = &self.state;
        tracing::info!(
            name = %state.name(),
            sku = state.sku().unwrap_or("-"),
            firmware = state.firmware().unwrap_or("-"),
            ip = ?state.ip(),
            leds = state.leds(),
            protocol = state.protocol().label(),
            split = state.split().label(),
            "Device details"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemoryStore;
    use crate::types::{ProtocolType, SplitMode};

    fn record() -> DeviceRecord {
        DeviceRecord {
            id: Some("AA:BB".into()),
            ip: Some("192.168.1.50".into()),
            leds: Some(15),
            protocol: Some(5),
            split: Some(2),
            sku: Some("H619A".into()),
            firmware: Some("1.00.12".into()),
            name: None,
            unique_port: Some(4101),
        }
    }

    #[test]
    fn save_then_load() {
        let device = GoveeDevice::from_record(record(), DriverConfig::default()).unwrap();
        let mut store = MemoryStore::new();
        assert!(device.save(&mut store));
        assert_eq!(store.get_setting("AA:BB", "firmware"), Some(json!("1.00.12")));
        assert_eq!(store.get_setting("AA:BB", "type"), Some(json!(5)));

        let loaded = GoveeDevice::load(&store, "AA:BB", DriverConfig::default()).unwrap();
        assert_eq!(loaded.state().id(), Some("AA:BB"));
        assert_eq!(loaded.state().protocol(), ProtocolType::DreamviewV2);
        assert_eq!(loaded.state().split(), SplitMode::Mirrored);
        assert_eq!(loaded.state().firmware(), Some("1.00.12"));
        assert_eq!(loaded.state().unique_port(), Some(4101));
        assert_eq!(loaded.name(), "Govee H619A on 192.168.1.50");
    }

    #[test]
    fn save_without_id_is_skipped() {
        let device = GoveeDevice::test_device();
        let mut store = MemoryStore::new();
        assert!(!device.save(&mut store));
        assert!(store.is_empty());
    }

    #[test]
    fn load_missing_device() {
        let store = MemoryStore::new();
        let err = GoveeDevice::load(&store, "nope", DriverConfig::default()).unwrap_err();
        assert!(matches!(err, SettingsError::Missing { .. }));
    }

    #[test]
    fn load_invalid_value() {
        let mut store = MemoryStore::new();
        store.save_setting("AA", "ip", json!("10.0.0.1"));
        store.save_setting("AA", "leds", json!([1, 2]));
        let err = GoveeDevice::load(&store, "AA", DriverConfig::default()).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
    }

    #[test]
    fn cache_record_fields() {
        let device = GoveeDevice::from_record(record(), DriverConfig::default()).unwrap();
        let json = serde_json::to_value(device.to_cache_record()).unwrap();
        assert_eq!(
            json,
            json!({
                "id": "AA:BB",
                "ip": "192.168.1.50",
                "name": "Govee H619A on 192.168.1.50",
                "leds": 15,
                "type": 5,
                "split": 2,
                "uniquePort": 4101
            })
        );
    }

    #[test]
    fn handle_message_and_persist_after_identity_change() {
        let mut device = GoveeDevice::from_record(
            DeviceRecord {
                ip: Some("10.0.0.7".into()),
                protocol: Some(2),
                ..DeviceRecord::default()
            },
            DriverConfig::default(),
        )
        .unwrap();
        let mut store = MemoryStore::new();
        assert!(!device.save(&mut store));

        let result = device.handle_message(
            r#"{"msg":{"cmd":"scan","data":{"device":"CC:DD","sku":"H6199","bleVersionSoft":"2"}}}"#,
            Duration::ZERO,
        );
        assert!(result.identity_changed());
        assert!(device.state_mut().take_changed());
        assert!(device.save(&mut store));
        assert_eq!(store.get_setting("CC:DD", "name"), Some(json!("Govee H6199 on 10.0.0.7")));
    }

    #[test]
    fn test_device_never_renders() {
        let mut device = GoveeDevice::test_device();
        for now in [Duration::ZERO, Duration::ZERO, Duration::from_secs(1)] {
            let tick = device.send_rgb(&[RgbColor::white()], now, FrameDelay::NONE);
            assert!(tick.frame().is_none());
        }
    }
}
