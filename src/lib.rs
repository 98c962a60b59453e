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

//! Handset input hardware shim library
//!
//! This library provides the bus-level pieces of a handset input stack:
//! the Synaptics ClearPad I2C transport (paged register access and the
//! driver-core plumbing around it) and the fingerprint module detection
//! routine that classifies the installed sensor from a TLMM GPIO strap.
//!
//! # Example
//!
//! ```
//! use input_shim::core::clearpad::{ClearpadBus, ClearpadI2c};
//! use input_shim::core::i2c::SimulatedClearpad;
//!
//! let sim = SimulatedClearpad::new(0x2c);
//! let bus = ClearpadI2c::new(sim.clone());
//!
//! // Page 0x01, register 0x20
//! bus.write(0x0120, &[0xAB, 0xCD]).unwrap();
//!
//! let mut buf = [0u8; 2];
//! assert_eq!(bus.read(0x0120, &mut buf).unwrap(), 2);
//! assert_eq!(buf, [0xAB, 0xCD]);
//! ```

pub mod core;
