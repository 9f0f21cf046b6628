// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Demo program: render a rotating rainbow (or hold one solid color) on one
//! device for a while, then turn it off.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example render_loop -- <ip> <protocol> <leds> [seconds] [#rrggbb]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=debug cargo run --example render_loop -- 192.168.1.20 2 20 10
//! RUST_LOG=debug cargo run --example render_loop -- 192.168.1.20 3 1 5 '#FF8800'
//! ```

use std::env;
use std::time::Duration;

use govee_lan::protocol::DeviceSession;
use govee_lan::scheduler::TickOutcome;
use govee_lan::settings::DeviceRecord;
use govee_lan::types::{FrameDelay, RgbColor};
use govee_lan::{DriverConfig, GoveeDevice};

fn rainbow(leds: usize, offset: usize) -> Vec<RgbColor> {
    (0..leds)
        .map(|i| {
            let step = ((i + offset) * 256 / leds.max(1)) % 256;
            let phase = u8::try_from(step % 86 * 3).unwrap_or(u8::MAX);
            match step / 86 {
                0 => RgbColor::new(255 - phase, phase, 0),
                1 => RgbColor::new(0, 255 - phase, phase),
                _ => RgbColor::new(phase, 0, 255 - phase),
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <ip> <protocol> <leds> [seconds] [#rrggbb]", args[0]);
        eprintln!();
        eprintln!("Protocols: 1 Dreamview, 2 Razer, 3 Solid color, 4 Legacy Razer, 5 Dreamview V2");
        std::process::exit(1);
    }

    let leds: u32 = args[3].parse()?;
    let seconds: u64 = args.get(4).map_or(Ok(10), |s| s.parse())?;
    let solid: Option<RgbColor> = args.get(5).map(|s| s.parse()).transpose()?;
    let record = DeviceRecord {
        ip: Some(args[1].clone()),
        protocol: Some(args[2].parse()?),
        leds: Some(leds),
        ..DeviceRecord::default()
    };

    let device = GoveeDevice::from_record(record, DriverConfig::default())?;
    let session = DeviceSession::bind(device).await?;
    let _listener = session.listen();
    println!("Listening on {}", session.local_addr()?);

    let leds = usize::try_from(leds)?;
    let deadline = Duration::from_secs(seconds);
    let mut offset = 0;
    let mut frames = 0u32;

    while session.now() < deadline {
        if let Some(color) = solid {
            session.single_color(color, session.now()).await?;
            tokio::time::sleep(Duration::from_millis(33)).await;
            continue;
        }

        let outcome = session
            .render(&rainbow(leds, offset), session.now(), FrameDelay::from(33))
            .await?;
        match outcome {
            TickOutcome::FramePending { .. } => frames += 1,
            // Housekeeping ticks carry no pacing; keep the loop at frame rate
            _ => tokio::time::sleep(Duration::from_millis(33)).await,
        }
        offset = offset.wrapping_add(1);
    }

    println!("Sent {frames} frames, turning off");
    session.turn_off().await?;

    if let Some(sku) = session.device().lock().state().sku() {
        println!("Device reported SKU {sku}");
    }
    Ok(())
}
