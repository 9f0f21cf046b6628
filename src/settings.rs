// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device records and settings persistence.
//!
//! A [`DeviceRecord`] is what an external scan (or the host's device cache)
//! hands the driver. Numbers in it often arrive as strings, so the numeric
//! fields accept both.
//!
//! A [`SettingsStore`] is the host's per-device key/value storage. Devices
//! are saved under their ID with the keys in [`SETTING_KEYS`].

use std::collections::HashMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValueError;
use crate::state::DeviceState;
use crate::types::{ProtocolType, SplitMode};

/// Keys a saved device is stored under, in save order.
pub const SETTING_KEYS: [&str; 8] = [
    "ip",
    "leds",
    "type",
    "split",
    "sku",
    "firmware",
    "name",
    "uniquePort",
];

/// Per-device key/value storage provided by the host.
pub trait SettingsStore {
    /// Returns a stored value.
    fn get_setting(&self, device_id: &str, key: &str) -> Option<Value>;

    /// Stores a value, replacing any previous one.
    fn save_setting(&mut self, device_id: &str, key: &str, value: Value);
}

/// In-memory [`SettingsStore`].
///
/// # Examples
///
/// ```
/// use govee_lan::settings::{MemoryStore, SettingsStore};
/// use serde_json::json;
///
/// let mut store = MemoryStore::new();
/// store.save_setting("AA:BB", "leds", json!(20));
/// assert_eq!(store.get_setting("AA:BB", "leds"), Some(json!(20)));
/// assert_eq!(store.get_setting("CC:DD", "leds"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    settings: HashMap<String, HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every key stored for a device.
    #[must_use]
    pub fn device_settings(&self, device_id: &str) -> Option<&HashMap<String, Value>> {
        self.settings.get(device_id)
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get_setting(&self, device_id: &str, key: &str) -> Option<Value> {
        self.settings.get(device_id)?.get(key).cloned()
    }

    fn save_setting(&mut self, device_id: &str, key: &str, value: Value) {
        self.settings
            .entry(device_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}

/// A device as described by a scan result or the host's cache.
///
/// # Examples
///
/// ```
/// use govee_lan::settings::DeviceRecord;
/// use govee_lan::types::{ProtocolType, SplitMode};
///
/// let record: DeviceRecord = serde_json::from_str(
///     r#"{"id":"AA:BB","ip":"192.168.1.20","leds":"20","type":2,"split":"2","sku":"H6199"}"#,
/// ).unwrap();
/// assert_eq!(record.leds, Some(20));
///
/// let state = record.into_state().unwrap();
/// assert_eq!(state.protocol(), ProtocolType::Razer);
/// assert_eq!(state.split(), SplitMode::Mirrored);
/// assert_eq!(state.name(), "Govee H6199 on 192.168.1.20");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    /// Unique device ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Device address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// LED count.
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub leds: Option<u32>,
    /// Protocol number.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub protocol: Option<u8>,
    /// Split mode number.
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub split: Option<u8>,
    /// Product SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Firmware version.
    #[serde(rename = "bleVersionSoft", default, skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,
    /// Port the device-specific listener binds to.
    #[serde(
        default,
        deserialize_with = "lenient::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub unique_port: Option<u16>,
}

impl DeviceRecord {
    /// Builds the device state this record describes.
    ///
    /// A missing protocol becomes `ProtocolType::Unknown(0)` and a missing
    /// split mode becomes `SplitMode::Single`. Without a name the default
    /// one is generated.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidAddress` if `ip` is present but not an
    /// IP address.
    pub fn into_state(self) -> Result<DeviceState, ValueError> {
        let ip = self
            .ip
            .as_deref()
            .map(|ip| {
                ip.parse::<IpAddr>()
                    .map_err(|_| ValueError::InvalidAddress(ip.to_string()))
            })
            .transpose()?;

        let state = DeviceState::new(
            ip,
            self.leds.unwrap_or(0),
            ProtocolType::from_num(self.protocol.unwrap_or(0)),
            self.split.map_or(SplitMode::Single, SplitMode::from_num),
        )
        .with_identity(self.id, self.sku, self.firmware)
        .with_unique_port(self.unique_port);

        Ok(match self.name {
            Some(name) => state.with_name(name),
            None => state,
        })
    }
}

/// Numbers that may arrive as JSON numbers or numeric strings.
mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::types::parse_leading_int;

    pub(super) fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<i64>,
    {
        let raw = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| D::Error::custom(format!("not an integer: {n}")))?,
            Some(Value::String(s)) => match parse_leading_int(&s) {
                Some(value) => value,
                None => return Ok(None),
            },
            Some(other) => return Err(D::Error::custom(format!("expected a number, got {other}"))),
        };

        T::try_from(raw)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("number out of range: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accepts_numbers_and_strings() {
        let record: DeviceRecord =
            serde_json::from_str(r#"{"leds":30,"type":"5","split":null,"uniquePort":"4050 "}"#)
                .unwrap();
        assert_eq!(record.leds, Some(30));
        assert_eq!(record.protocol, Some(5));
        assert_eq!(record.split, None);
        assert_eq!(record.unique_port, Some(4050));
    }

    #[test]
    fn record_unparseable_string_is_absent() {
        let record: DeviceRecord = serde_json::from_str(r#"{"leds":"many"}"#).unwrap();
        assert_eq!(record.leds, None);
    }

    #[test]
    fn record_rejects_out_of_range() {
        assert!(serde_json::from_str::<DeviceRecord>(r#"{"type":300}"#).is_err());
        assert!(serde_json::from_str::<DeviceRecord>(r#"{"leds":-1}"#).is_err());
        assert!(serde_json::from_str::<DeviceRecord>(r#"{"leds":[1]}"#).is_err());
    }

    #[test]
    fn record_into_state_defaults() {
        let state = DeviceRecord::default().into_state().unwrap();
        assert!(state.is_test_mode());
        assert_eq!(state.ip(), None);
        assert_eq!(state.protocol(), ProtocolType::Unknown(0));
        assert_eq!(state.split(), SplitMode::Single);
    }

    #[test]
    fn record_into_state_keeps_name_and_port() {
        let record = DeviceRecord {
            id: Some("AA".into()),
            ip: Some("10.0.0.2".into()),
            name: Some("Shelf".into()),
            unique_port: Some(4100),
            ..DeviceRecord::default()
        };
        let state = record.into_state().unwrap();
        assert_eq!(state.name(), "Shelf");
        assert_eq!(state.unique_port(), Some(4100));
        assert!(!state.is_test_mode());
    }

    #[test]
    fn record_rejects_bad_address() {
        let record = DeviceRecord {
            ip: Some("not-an-ip".into()),
            ..DeviceRecord::default()
        };
        assert_eq!(
            record.into_state(),
            Err(ValueError::InvalidAddress("not-an-ip".into()))
        );
    }

    #[test]
    fn record_serialization_skips_absent_fields() {
        let record = DeviceRecord {
            id: Some("AA".into()),
            leds: Some(10),
            ..DeviceRecord::default()
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({"id": "AA", "leds": 10})
        );
    }
}
