// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A device wired to a UDP transport.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::device::GoveeDevice;
use crate::error::ProtocolError;
use crate::message::Interpretation;
use crate::protocol::{Datagram, Transport, UdpTransport};
use crate::scheduler::TickOutcome;
use crate::types::{FrameDelay, RgbColor};

/// Drives one [`GoveeDevice`] over a [`Transport`].
///
/// The device is shared between the render path and the inbound listener
/// task, so it lives behind a mutex. The lock is never held across a send.
///
/// Timestamps passed to the render methods must use the same origin as
/// [`DeviceSession::now`], which the listener uses for alert windows.
///
/// # Examples
///
/// ```no_run
/// use govee_lan::{DriverConfig, GoveeDevice};
/// use govee_lan::protocol::DeviceSession;
/// use govee_lan::settings::DeviceRecord;
/// use govee_lan::types::{FrameDelay, RgbColor};
///
/// # async fn example() -> govee_lan::Result<()> {
/// let record = DeviceRecord {
///     id: Some("AA:BB".into()),
///     ip: Some("192.168.1.20".into()),
///     protocol: Some(2),
///     leds: Some(20),
///     unique_port: Some(4100),
///     ..DeviceRecord::default()
/// };
/// let device = GoveeDevice::from_record(record, DriverConfig::default())?;
///
/// let session = DeviceSession::bind(device).await?;
/// let _listener = session.listen();
///
/// let colors = vec![RgbColor::new(0, 128, 255); 20];
/// session.render(&colors, session.now(), FrameDelay::NONE).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DeviceSession<T: Transport = UdpTransport> {
    device: Arc<Mutex<GoveeDevice>>,
    transport: T,
    started: Instant,
}

impl<T: Transport> DeviceSession<T> {
    /// Wraps a device and a transport.
    #[must_use]
    pub fn new(device: GoveeDevice, transport: T) -> Self {
        Self {
            device: Arc::new(Mutex::new(device)),
            transport,
            started: Instant::now(),
        }
    }

    /// Returns the shared device.
    #[must_use]
    pub fn device(&self) -> Arc<Mutex<GoveeDevice>> {
        Arc::clone(&self.device)
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the time since the session started.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }

    /// Runs one render tick and sends its datagrams.
    ///
    /// Sleeps for the frame delay after a frame was sent.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if a datagram cannot be sent. The remaining
    /// datagrams of the tick are dropped.
    pub async fn render(
        &self,
        colors: &[RgbColor],
        now: Duration,
        frame_delay: FrameDelay,
    ) -> Result<TickOutcome, ProtocolError> {
        let (tick, ip) = {
            let mut device = self.device.lock();
            let tick = device.send_rgb(colors, now, frame_delay);
            (tick, device.state().ip())
        };

        let outcome = tick.outcome().clone();
        let delay = tick.delay();
        self.send_all(ip, tick.into_datagrams()).await?;

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(outcome)
    }

    /// Sends one static color through the solid-color path.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if a datagram cannot be sent.
    pub async fn single_color(&self, color: RgbColor, now: Duration) -> Result<(), ProtocolError> {
        let (datagrams, ip) = {
            let mut device = self.device.lock();
            (device.single_color(color, now), device.state().ip())
        };
        self.send_all(ip, datagrams).await
    }

    /// Blanks and turns off the device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if a datagram cannot be sent.
    pub async fn turn_off(&self) -> Result<(), ProtocolError> {
        let (datagrams, ip) = {
            let mut device = self.device.lock();
            (device.turn_off(), device.state().ip())
        };
        self.send_all(ip, datagrams).await
    }

    /// Turns the device on.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the datagram cannot be sent.
    pub async fn turn_on(&self) -> Result<(), ProtocolError> {
        let (datagram, ip) = {
            let device = self.device.lock();
            (device.turn_on(), device.state().ip())
        };
        self.send_all(ip, vec![datagram]).await
    }

    async fn send_all(
        &self,
        ip: Option<IpAddr>,
        datagrams: Vec<Datagram>,
    ) -> Result<(), ProtocolError> {
        if datagrams.is_empty() {
            return Ok(());
        }
        let Some(ip) = ip else {
            tracing::debug!(count = datagrams.len(), "Device has no address, dropping datagrams");
            return Ok(());
        };

        for datagram in &datagrams {
            if let Err(e) = self.transport.send(datagram, ip).await {
                tracing::error!(%ip, cmd = datagram.cmd(), error = %e, "Failed to send datagram");
                return Err(e);
            }
        }
        Ok(())
    }
}

impl DeviceSession<UdpTransport> {
    /// Binds a UDP socket on the device's unique port and wraps the device.
    ///
    /// Without a unique port a free port is picked.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Io` if the port cannot be bound.
    pub async fn bind(device: GoveeDevice) -> Result<Self, ProtocolError> {
        let port = device.state().unique_port().unwrap_or(0);
        let transport = UdpTransport::bind(port).await?;
        Ok(Self::new(device, transport))
    }

    /// Returns the address the session listens on.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Io` if the address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr, ProtocolError> {
        self.transport.local_addr()
    }

    /// Spawns the inbound listener task.
    ///
    /// Every received datagram is interpreted against the shared device. The
    /// task ends on a `disconnect` message or a socket error.
    #[must_use]
    pub fn listen(&self) -> JoinHandle<()> {
        let transport = self.transport.clone();
        let device = Arc::clone(&self.device);
        let started = self.started;

        tokio::spawn(async move {
            if let Ok(addr) = transport.local_addr() {
                tracing::info!(%addr, "Started listening");
            }
            loop {
                let (raw, from) = match transport.recv().await {
                    Ok(received) => received,
                    Err(e) => {
                        tracing::error!(error = %e, "Listener socket error");
                        break;
                    }
                };
                tracing::debug!(%from, raw = %raw, "Datagram received");

                let result = device.lock().handle_message(&raw, started.elapsed());
                if matches!(result, Interpretation::Disconnect) {
                    tracing::info!("Listener stopped");
                    break;
                }
            }
        })
    }
}
