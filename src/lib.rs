// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `govee_lan` - A Rust library to drive Govee RGB lights over the LAN.
//!
//! Govee devices accept JSON commands over UDP. Frame-by-frame color control
//! rides inside those commands as base64 binary frames, in one of several
//! mutually incompatible layouts selected by the device's declared protocol
//! type.
//!
//! # Supported Features
//!
//! - **Frame encoding**: Dreamview, Dreamview V2, Razer, legacy Razer and
//!   solid color
//! - **State tracking**: identity, power and razer mode from `scan` and
//!   `status` replies
//! - **Render scheduling**: metadata requests, status polls and optimistic
//!   handshakes interleaved with color frames, paused during host alerts
//! - **Persistence**: save/load through a host-provided settings store
//! - **UDP transport** (feature `udp`): a tokio session with an inbound
//!   listener task
//!
//! The core is synchronous and clock-free: every entry point takes the
//! current time from the caller and returns the datagrams to send.
//!
//! # Quick Start
//!
//! ## Driving a device without I/O
//!
//! ```
//! use std::time::Duration;
//! use govee_lan::{DriverConfig, GoveeDevice};
//! use govee_lan::settings::DeviceRecord;
//! use govee_lan::scheduler::TickOutcome;
//! use govee_lan::types::{FrameDelay, RgbColor};
//!
//! let record: DeviceRecord = serde_json::from_str(
//!     r#"{"id":"AA:BB","ip":"192.168.1.20","leds":3,"type":2,"sku":"H6199"}"#,
//! ).unwrap();
//! let mut device = GoveeDevice::from_record(record, DriverConfig::default()).unwrap();
//!
//! let colors = [RgbColor::new(255, 0, 0); 3];
//!
//! // The first ticks ask for device data and poll status
//! let tick = device.send_rgb(&colors, Duration::ZERO, FrameDelay::NONE);
//! assert_eq!(tick.outcome(), &TickOutcome::MetadataRequested);
//! device.send_rgb(&colors, Duration::ZERO, FrameDelay::NONE);
//! device.send_rgb(&colors, Duration::ZERO, FrameDelay::NONE);
//!
//! let tick = device.send_rgb(&colors, Duration::from_secs(1), FrameDelay::NONE);
//! assert!(matches!(tick.outcome(), TickOutcome::FramePending { .. }));
//!
//! for datagram in tick.into_datagrams() {
//!     // send datagram.to_bytes() to 192.168.1.20:datagram.port()
//!     assert!(datagram.port() == 4003);
//! }
//!
//! // Feed replies back in
//! device.handle_message(r#"{"msg":{"cmd":"status","data":{"onOff":1}}}"#, Duration::from_secs(1));
//! ```
//!
//! ## UDP Session
//!
//! ```no_run
//! use govee_lan::{DriverConfig, GoveeDevice};
//! use govee_lan::protocol::DeviceSession;
//! use govee_lan::settings::DeviceRecord;
//! use govee_lan::types::{FrameDelay, RgbColor};
//!
//! #[tokio::main]
//! async fn main() -> govee_lan::Result<()> {
//!     let record = DeviceRecord {
//!         ip: Some("192.168.1.20".into()),
//!         protocol: Some(1),
//!         leds: Some(10),
//!         ..DeviceRecord::default()
//!     };
//!     let device = GoveeDevice::from_record(record, DriverConfig::default())?;
//!     let session = DeviceSession::bind(device).await?;
//!     let _listener = session.listen();
//!
//!     loop {
//!         let colors = vec![RgbColor::new(0, 255, 128); 10];
//!         session.render(&colors, session.now(), FrameDelay::from(16)).await?;
//!     }
//! }
//! ```

pub mod codec;
pub mod command;
pub mod config;
mod device;
pub mod error;
pub mod message;
pub mod protocol;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod types;

pub use codec::{Base64Codec, PayloadCodec};
pub use command::{ColorEncoder, Command, Frame};
pub use config::DriverConfig;
pub use device::GoveeDevice;
pub use error::{EncodeError, Error, ParseError, ProtocolError, Result, SettingsError, ValueError};
pub use message::{InboundMessage, Interpretation};
pub use protocol::Datagram;
#[cfg(feature = "udp")]
pub use protocol::{DeviceSession, Transport, UdpTransport};
pub use scheduler::{RenderScheduler, Tick, TickOutcome};
pub use settings::{DeviceRecord, MemoryStore, SettingsStore};
pub use state::{DeviceState, StateChange};
pub use types::{FrameDelay, PowerState, ProtocolType, RgbColor, SplitMode};
