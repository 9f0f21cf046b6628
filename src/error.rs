// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `govee_lan` library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation, inbound message parsing, frame encoding, transport and
//! settings persistence.
//!
//! None of the driver's per-tick or per-message entry points return these
//! errors to the caller; they are logged and the tick or message is skipped.
//! The errors surface only from constructors, the codec, the settings layer
//! and the UDP transport.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while parsing an inbound message or record.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred while encoding a color frame.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error occurred during transport communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while reading or writing persisted settings.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A hex color string could not be parsed.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// A power state string was not recognized.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// A device address could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing inbound messages, records and payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A transport-encoded payload could not be decoded.
    #[error("payload decode error: {0}")]
    Payload(String),

    /// Expected field is missing from the message.
    #[error("missing field in message: {0}")]
    MissingField(String),

    /// Unexpected message format.
    #[error("unexpected message format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to building color frames.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The solid-color encoding needs at least one color.
    #[error("solid color command requires at least one color")]
    EmptyColors,

    /// The color count does not fit the single count byte of the frame.
    #[error("{count} colors exceed the frame limit of {max}")]
    TooManyColors {
        /// Number of colors that were supplied.
        count: usize,
        /// Maximum number of colors a frame can carry.
        max: usize,
    },

    /// The device's protocol type has no encoder.
    #[error("no encoder for protocol type {0}")]
    UnsupportedProtocol(u8),
}

/// Errors related to transport communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Socket I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to persisted device settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A required setting is absent from the store.
    #[error("missing setting {key} for device {device_id}")]
    Missing {
        /// The device the setting belongs to.
        device_id: String,
        /// The setting key.
        key: String,
    },

    /// A setting holds a value of the wrong shape.
    #[error("invalid value for setting {key}: {message}")]
    InvalidValue {
        /// The setting key.
        key: String,
        /// Description of the problem.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_error_display() {
        let err = EncodeError::TooManyColors {
            count: 300,
            max: 255,
        };
        assert_eq!(err.to_string(), "300 colors exceed the frame limit of 255");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidAddress("10.0.0".to_string());
        let err: Error = value_err.into();
        assert!(matches!(err, Error::Value(ValueError::InvalidAddress(_))));
        assert_eq!(err.to_string(), "value error: invalid address: 10.0.0");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("msg".to_string());
        assert_eq!(err.to_string(), "missing field in message: msg");

        let err = ParseError::UnexpectedFormat("expected a JSON object".to_string());
        assert_eq!(err.to_string(), "unexpected message format: expected a JSON object");
    }

    #[test]
    fn settings_error_display() {
        let err = SettingsError::Missing {
            device_id: "AA:BB".to_string(),
            key: "ip".to_string(),
        };
        assert_eq!(err.to_string(), "missing setting ip for device AA:BB");
    }
}
