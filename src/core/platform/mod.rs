// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Driver-core model
//!
//! The ClearPad I2C driver lives between three kernel facilities: the I2C
//! core that matches and probes it, the device tree describing the board,
//! and the platform bus it publishes the touch device on. This module holds
//! minimal in-process models of those facilities, with exactly the contract
//! the driver relies on, plus the driver itself.
//!
//! - `devicetree`: nodes, typed properties and GPIO flags
//! - `panel`: registered display panels and active panel lookup
//! - `device`: platform devices and their registry
//! - `driver`: the ClearPad I2C driver (match, probe, remove)
//! - `i2c_core`: client declaration, driver registration, init/exit

pub mod device;
pub mod devicetree;
pub mod driver;
pub mod i2c_core;
pub mod panel;

#[cfg(test)]
mod tests;

pub use device::{DeviceHandle, PlatformBus, PlatformDevice, PLATFORM_DEVID_NONE};
pub use devicetree::{DeviceNode, GpioFlags, GpioSpec, Property};
pub use driver::{
    boxed, BoardInfo, ClearpadData, ClearpadI2cDevice, ClearpadI2cDriver, PlatformData,
    ProbeContext,
};
pub use i2c_core::{exit, init, ClientReport, I2cCore, InitMode};
pub use panel::{find_active_panel, PanelRegistry};
