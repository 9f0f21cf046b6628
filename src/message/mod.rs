// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound message parsing and interpretation.
//!
//! Devices answer on the listener port with the same envelope they are sent,
//! `{"msg":{"cmd":..,"data":..}}`. The render host can also inject a
//! top-level `{"alertActive":"true"}` object to pause output while it shows
//! something else.
//!
//! Parsing validates the raw text into a tagged [`InboundMessage`];
//! [`interpret`] then applies it to a [`DeviceState`](crate::state::DeviceState).
//!
//! # Examples
//!
//! ```
//! use govee_lan::message::{InboundMessage, parse_message};
//!
//! let raw = r#"{"msg":{"cmd":"scan","data":{"device":"AA:BB","sku":"H6199","bleVersionSoft":"1.02"}}}"#;
//! match parse_message(raw).unwrap() {
//!     InboundMessage::Scan(scan) => {
//!         assert_eq!(scan.device.as_deref(), Some("AA:BB"));
//!         assert_eq!(scan.sku.as_deref(), Some("H6199"));
//!     }
//!     other => panic!("unexpected message: {other:?}"),
//! }
//! ```

mod interpreter;
mod payload;

pub use interpreter::{Interpretation, interpret};
pub use payload::{MODE_SIGNATURE, razer_flag_from_payload};

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::types::{PowerState, RgbColor};

/// Identity data from a `scan` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanData {
    /// Address the device reports for itself.
    #[serde(default)]
    pub ip: Option<String>,
    /// Unique device ID.
    #[serde(default)]
    pub device: Option<String>,
    /// Product SKU.
    #[serde(default)]
    pub sku: Option<String>,
    /// BLE hardware version.
    #[serde(default)]
    pub ble_version_hard: Option<String>,
    /// BLE firmware version.
    #[serde(default)]
    pub ble_version_soft: Option<String>,
    /// Wi-Fi hardware version.
    #[serde(default)]
    pub wifi_version_hard: Option<String>,
    /// Wi-Fi firmware version.
    #[serde(default)]
    pub wifi_version_soft: Option<String>,
}

/// Power and mode data from a `status` or `devStatus` reply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
    #[serde(default)]
    on_off: Option<Value>,
    /// Opaque mode payload.
    #[serde(default)]
    pub pt: Option<String>,
    /// Brightness in percent.
    #[serde(default)]
    pub brightness: Option<u8>,
    /// Current static color.
    #[serde(default)]
    pub color: Option<RgbColor>,
    /// Current color temperature.
    #[serde(default)]
    pub color_tem_in_kelvin: Option<u32>,
}

impl StatusData {
    /// Returns the reported power state.
    ///
    /// Accepts `0`/`1` and `false`/`true`; other shapes count as absent.
    #[must_use]
    pub fn power(&self) -> Option<PowerState> {
        match self.on_off.as_ref()? {
            Value::Bool(on) => Some(PowerState::from(*on)),
            Value::Number(n) => n.as_u64().map(|v| PowerState::from(v != 0)),
            _ => None,
        }
    }
}

/// Alert state injected by the render host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSignal {
    /// An alert is showing; pause rendering.
    Active,
    /// The alert ended; resume rendering.
    Cleared,
}

/// A validated inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// `scan` reply with the device identity.
    Scan(ScanData),
    /// `status` or `devStatus` reply.
    Status(StatusData),
    /// The device or host asked to tear down the listener.
    Disconnect,
    /// Top-level `alertActive` signal.
    Alert(AlertSignal),
    /// Valid JSON the driver does not act on.
    Unrecognized(String),
}

#[derive(Debug, Deserialize)]
struct RawBody {
    cmd: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Parses raw inbound text into an [`InboundMessage`].
///
/// # Errors
///
/// - `ParseError::Json` if the text is not JSON, or a known command carries
///   data of the wrong shape
/// - `ParseError::UnexpectedFormat` if the text is not a JSON object, or its
///   `msg` is not an object
/// - `ParseError::MissingField` if a `msg` object has no `cmd`
pub fn parse_message(raw: &str) -> Result<InboundMessage, ParseError> {
    let Value::Object(value) = serde_json::from_str::<Value>(raw)? else {
        return Err(ParseError::UnexpectedFormat("expected a JSON object".to_string()));
    };

    if let Some(body) = value.get("msg") {
        if !body.is_object() {
            return Err(ParseError::UnexpectedFormat(format!("msg is not an object: {body}")));
        }
        let body = RawBody::deserialize(body)?;
        let cmd = body.cmd.ok_or_else(|| ParseError::MissingField("cmd".to_string()))?;
        let data = if body.data.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            body.data
        };

        return Ok(match cmd.as_str() {
            "scan" => InboundMessage::Scan(ScanData::deserialize(data)?),
            "status" | "devStatus" => InboundMessage::Status(StatusData::deserialize(data)?),
            "disconnect" => InboundMessage::Disconnect,
            _ => InboundMessage::Unrecognized(format!("unknown command '{cmd}'")),
        });
    }

    if let Some(alert) = value.get("alertActive") {
        return Ok(match alert.as_str() {
            Some("true") => InboundMessage::Alert(AlertSignal::Active),
            Some("false") => InboundMessage::Alert(AlertSignal::Cleared),
            _ => InboundMessage::Unrecognized(format!("unknown alertActive value {alert}")),
        });
    }

    Ok(InboundMessage::Unrecognized(
        "neither msg nor alertActive present".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scan_reply() {
        let raw = r#"{"msg":{"cmd":"scan","data":{
            "ip":"192.168.1.23","device":"1F:80:C5:32:32:36:72:4E","sku":"H618A",
            "bleVersionHard":"3.01.01","bleVersionSoft":"1.03.01",
            "wifiVersionHard":"1.00.10","wifiVersionSoft":"1.02.03"}}}"#;

        let InboundMessage::Scan(scan) = parse_message(raw).unwrap() else {
            panic!("expected scan");
        };
        assert_eq!(scan.ip.as_deref(), Some("192.168.1.23"));
        assert_eq!(scan.device.as_deref(), Some("1F:80:C5:32:32:36:72:4E"));
        assert_eq!(scan.ble_version_soft.as_deref(), Some("1.03.01"));
        assert_eq!(scan.wifi_version_soft.as_deref(), Some("1.02.03"));
    }

    #[test]
    fn parse_status_reply() {
        let raw = r#"{"msg":{"cmd":"devStatus","data":{
            "onOff":1,"brightness":100,"color":{"r":255,"g":0,"b":0},
            "colorTemInKelvin":0,"pt":"uwABsgEK"}}}"#;

        let InboundMessage::Status(status) = parse_message(raw).unwrap() else {
            panic!("expected status");
        };
        assert_eq!(status.power(), Some(PowerState::On));
        assert_eq!(status.brightness, Some(100));
        assert_eq!(status.color, Some(RgbColor::new(255, 0, 0)));
        assert_eq!(status.pt.as_deref(), Some("uwABsgEK"));
    }

    #[test]
    fn status_power_shapes() {
        let status: StatusData = serde_json::from_str(r#"{"onOff":0}"#).unwrap();
        assert_eq!(status.power(), Some(PowerState::Off));

        let status: StatusData = serde_json::from_str(r#"{"onOff":true}"#).unwrap();
        assert_eq!(status.power(), Some(PowerState::On));

        let status: StatusData = serde_json::from_str(r#"{"onOff":"maybe"}"#).unwrap();
        assert_eq!(status.power(), None);

        let status: StatusData = serde_json::from_str("{}").unwrap();
        assert_eq!(status.power(), None);
    }

    #[test]
    fn parse_status_without_data() {
        let message = parse_message(r#"{"msg":{"cmd":"status"}}"#).unwrap();
        assert_eq!(message, InboundMessage::Status(StatusData::default()));
    }

    #[test]
    fn parse_disconnect() {
        let message = parse_message(r#"{"msg":{"cmd":"disconnect","data":{}}}"#).unwrap();
        assert_eq!(message, InboundMessage::Disconnect);
    }

    #[test]
    fn parse_alerts() {
        assert_eq!(
            parse_message(r#"{"alertActive":"true"}"#).unwrap(),
            InboundMessage::Alert(AlertSignal::Active)
        );
        assert_eq!(
            parse_message(r#"{"alertActive":"false"}"#).unwrap(),
            InboundMessage::Alert(AlertSignal::Cleared)
        );
        assert!(matches!(
            parse_message(r#"{"alertActive":"sometimes"}"#).unwrap(),
            InboundMessage::Unrecognized(_)
        ));
    }

    #[test]
    fn parse_unknown_shapes() {
        assert!(matches!(
            parse_message(r#"{"msg":{"cmd":"brightness","data":{}}}"#).unwrap(),
            InboundMessage::Unrecognized(_)
        ));
        assert!(matches!(
            parse_message(r#"{"hello":"world"}"#).unwrap(),
            InboundMessage::Unrecognized(_)
        ));
    }

    #[test]
    fn parse_non_object_shapes() {
        for raw in ["[1, 2, 3]", "null", "\"scan\"", r#"{"msg":42}"#, r#"{"msg":null}"#] {
            assert!(
                matches!(parse_message(raw), Err(ParseError::UnexpectedFormat(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn parse_malformed() {
        assert!(matches!(parse_message("not json"), Err(ParseError::Json(_))));
        assert!(matches!(
            parse_message(r#"{"msg":{"data":{}}}"#),
            Err(ParseError::MissingField(_))
        ));
        assert!(matches!(
            parse_message(r#"{"msg":{"cmd":"scan","data":{"sku":42}}}"#),
            Err(ParseError::Json(_))
        ));
    }
}
