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

//! Core hardware interface components
//!
//! This module contains all hardware-facing components:
//! - I2C client primitives and a simulated ClearPad controller
//! - ClearPad paged register transport
//! - Memory-mapped register windows
//! - Fingerprint module detection
//! - Driver-core model (device tree, panels, platform bus, I2C core)
//! - Board configuration

pub mod clearpad;
pub mod config;
pub mod error;
pub mod fpdetect;
pub mod i2c;
pub mod mmio;
pub mod platform;

// Re-export commonly used types
pub use clearpad::{ClearpadBus, ClearpadI2c};
pub use config::BoardConfig;
pub use error::{DriverError, Result};
pub use fpdetect::{FpDetector, FpHwType};
pub use i2c::{I2cClient, SimulatedClearpad};
pub use mmio::{MemoryMapper, RegisterWindow};
pub use platform::{I2cCore, InitMode, PlatformBus};
