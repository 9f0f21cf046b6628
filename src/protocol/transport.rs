// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UDP transport.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::UdpSocket;

use crate::error::ProtocolError;
use crate::protocol::Datagram;

/// Largest datagram the transport reads.
const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Sends datagrams to a device.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends one datagram to `ip` on the datagram's port.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the datagram cannot be sent.
    async fn send(&self, datagram: &Datagram, ip: IpAddr) -> Result<(), ProtocolError>;
}

/// A [`Transport`] over a tokio UDP socket.
///
/// The same socket sends commands and receives replies; cloning shares it.
#[derive(Debug, Clone)]
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
}

impl UdpTransport {
    /// Binds a socket on all IPv4 interfaces. Port `0` picks a free port.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Io` if the port cannot be bound.
    pub async fn bind(port: u16) -> Result<Self, ProtocolError> {
        Self::bind_addr(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)).await
    }

    /// Binds a socket on a specific address.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Io` if the address cannot be bound.
    pub async fn bind_addr(addr: SocketAddr) -> Result<Self, ProtocolError> {
        let socket = UdpSocket::bind(addr).await?;
        tracing::debug!(addr = %socket.local_addr()?, "UDP socket bound");
        Ok(Self {
            socket: Arc::new(socket),
        })
    }

    /// Returns the bound address.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Io` if the address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr, ProtocolError> {
        Ok(self.socket.local_addr()?)
    }

    /// Receives one datagram as text, with its sender.
    ///
    /// Invalid UTF-8 is replaced, leaving it to the JSON parser to reject.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Io` if the socket fails.
    pub async fn recv(&self) -> Result<(String, SocketAddr), ProtocolError> {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let (len, from) = self.socket.recv_from(&mut buf).await?;
        Ok((String::from_utf8_lossy(&buf[..len]).into_owned(), from))
    }
}

impl Transport for UdpTransport {
    async fn send(&self, datagram: &Datagram, ip: IpAddr) -> Result<(), ProtocolError> {
        let target = SocketAddr::new(ip, datagram.port());
        tracing::debug!(%target, cmd = datagram.cmd(), "Sending datagram");
        self.socket.send_to(&datagram.to_bytes(), target).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DriverConfig;
    use crate::command::StatusCommand;

    #[tokio::test]
    async fn send_and_receive_on_loopback() {
        let receiver = UdpTransport::bind_addr("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let sender = UdpTransport::bind_addr("127.0.0.1:0".parse().unwrap()).await.unwrap();

        let port = receiver.local_addr().unwrap().port();
        let config = DriverConfig::default().with_control_port(port);
        let datagram = Datagram::for_command(&StatusCommand, &config);

        sender.send(&datagram, "127.0.0.1".parse().unwrap()).await.unwrap();
        let (text, from) = receiver.recv().await.unwrap();
        assert_eq!(text, r#"{"msg":{"cmd":"status","data":{}}}"#);
        assert_eq!(from, sender.local_addr().unwrap());
    }
}
