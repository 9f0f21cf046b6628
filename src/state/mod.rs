// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! The [`DeviceState`] struct is the single mutable record both entry points
//! of the driver share: the inbound interpreter writes identity, power and
//! mode flags into it, and the render-tick scheduler reads those and updates
//! its [`Timers`]. [`StateChange`] represents individual updates derived
//! from inbound messages.
//!
//! The state is owned, not shared: every entry point takes it by exclusive
//! reference. Callers that feed it from several tasks must synchronize
//! access themselves (the UDP session wraps the device in a mutex).

mod device_state;
mod state_change;

pub use device_state::{DeviceState, Timers};
pub use state_change::StateChange;
