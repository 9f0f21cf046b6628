// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests of the UDP session against a fake device on loopback.

#![cfg(feature = "udp")]

use std::net::SocketAddr;
use std::time::Duration;

use govee_lan::protocol::DeviceSession;
use govee_lan::scheduler::TickOutcome;
use govee_lan::settings::DeviceRecord;
use govee_lan::types::{FrameDelay, RgbColor};
use govee_lan::{DriverConfig, GoveeDevice};
use serde_json::Value;
use tokio::net::UdpSocket;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

/// A fake device answering on one loopback port for both scan and control.
struct FakeDevice {
    socket: UdpSocket,
}

impl FakeDevice {
    async fn start() -> Self {
        Self {
            socket: UdpSocket::bind("127.0.0.1:0").await.unwrap(),
        }
    }

    fn port(&self) -> u16 {
        self.socket.local_addr().unwrap().port()
    }

    async fn recv(&self) -> (Value, SocketAddr) {
        let mut buf = vec![0u8; 4096];
        let (len, from) = timeout(WAIT, self.socket.recv_from(&mut buf))
            .await
            .expect("no datagram received")
            .unwrap();
        (serde_json::from_slice(&buf[..len]).unwrap(), from)
    }

    async fn reply(&self, to: SocketAddr, json: &str) {
        self.socket.send_to(json.as_bytes(), to).await.unwrap();
    }
}

async fn session_for(fake: &FakeDevice, id: Option<&str>) -> DeviceSession {
    let config = DriverConfig::default()
        .with_control_port(fake.port())
        .with_scan_port(fake.port());
    let record = DeviceRecord {
        id: id.map(str::to_string),
        ip: Some("127.0.0.1".into()),
        leds: Some(2),
        protocol: Some(2),
        ..DeviceRecord::default()
    };
    DeviceSession::bind(GoveeDevice::from_record(record, config).unwrap())
        .await
        .unwrap()
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    timeout(WAIT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn startup_housekeeping_then_frames_reach_device() {
    let fake = FakeDevice::start().await;
    let session = session_for(&fake, Some("AA:BB")).await;
    let colors = [RgbColor::new(255, 0, 0), RgbColor::new(0, 0, 255)];

    let first = session
        .render(&colors, Duration::ZERO, FrameDelay::NONE)
        .await
        .unwrap();
    assert_eq!(first, TickOutcome::MetadataRequested);
    for _ in 0..2 {
        let outcome = session.render(&colors, Duration::ZERO, FrameDelay::NONE).await;
        assert!(!matches!(outcome.unwrap(), TickOutcome::FramePending { .. }));
    }
    let outcome = session
        .render(&colors, Duration::from_secs(1), FrameDelay::NONE)
        .await
        .unwrap();
    assert!(matches!(outcome, TickOutcome::FramePending { .. }));

    let mut cmds = Vec::new();
    for _ in 0..6 {
        let (message, _) = fake.recv().await;
        cmds.push(message["msg"]["cmd"].as_str().unwrap().to_string());
    }
    assert_eq!(cmds, ["scan", "turn", "status", "turn", "razer", "razer"]);
}

#[tokio::test]
async fn first_render_scans_and_reply_binds_identity() {
    let fake = FakeDevice::start().await;
    let session = session_for(&fake, None).await;
    let listener = session.listen();

    let outcome = session
        .render(&[RgbColor::white()], session.now(), FrameDelay::NONE)
        .await
        .unwrap();
    assert_eq!(outcome, TickOutcome::MetadataRequested);

    let (request, from) = fake.recv().await;
    assert_eq!(request["msg"]["cmd"], "scan");
    assert_eq!(from.port(), session.local_addr().unwrap().port());

    let reply_to: SocketAddr = format!("127.0.0.1:{}", from.port()).parse().unwrap();
    fake.reply(
        reply_to,
        r#"{"msg":{"cmd":"scan","data":{"device":"CC:DD","sku":"H6199","bleVersionSoft":"1.0"}}}"#,
    )
    .await;

    let device = session.device();
    wait_until(|| device.lock().state().id() == Some("CC:DD")).await;
    assert!(device.lock().state().has_changed());
    assert_eq!(device.lock().state().sku(), Some("H6199"));

    fake.reply(reply_to, r#"{"msg":{"cmd":"disconnect","data":{}}}"#).await;
    timeout(WAIT, listener)
        .await
        .expect("listener did not stop")
        .unwrap();
}

#[tokio::test]
async fn alert_from_host_pauses_rendering() {
    let fake = FakeDevice::start().await;
    let session = session_for(&fake, Some("AA:BB")).await;
    let _listener = session.listen();

    let addr: SocketAddr = format!("127.0.0.1:{}", session.local_addr().unwrap().port())
        .parse()
        .unwrap();
    fake.reply(addr, r#"{"alertActive":"true"}"#).await;

    let device = session.device();
    wait_until(|| {
        let suppressed_until = device.lock().state().timers().rendering_suppressed_until;
        suppressed_until > Duration::ZERO
    })
    .await;

    let outcome = session
        .render(&[RgbColor::white()], session.now(), FrameDelay::NONE)
        .await
        .unwrap();
    assert_eq!(outcome, TickOutcome::Suppressed);
}
