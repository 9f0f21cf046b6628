// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound datagrams and the UDP transport.
//!
//! The driver core produces [`Datagram`]s and never touches a socket. With
//! the `udp` feature (enabled by default) this module also provides:
//!
//! - [`Transport`]: the seam a datagram sink implements
//! - [`UdpTransport`]: a tokio UDP socket
//! - [`DeviceSession`]: a device wired to a transport, with an inbound
//!   listener task

mod datagram;
#[cfg(feature = "udp")]
mod session;
#[cfg(feature = "udp")]
mod transport;

pub use datagram::Datagram;
#[cfg(feature = "udp")]
pub use session::DeviceSession;
#[cfg(feature = "udp")]
pub use transport::{Transport, UdpTransport};
