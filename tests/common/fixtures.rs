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

//! Test fixtures for common test scenarios

use input_shim::core::clearpad::ClearpadI2c;
use input_shim::core::config::BoardConfig;
use input_shim::core::i2c::SimulatedClearpad;

/// Board with one ClearPad controller at 0x2c and two candidate panels,
/// only the second of which is bound
#[allow(dead_code)]
pub const BOARD: &str = r#"
panels = ["panel-tianma"]

[fp_detect]
settle_ms = 0

[[clients]]
name = "clearpad_i2c"
address = 0x2c
registers = [
    { addr = 0x00E1, data = [0x01, 0x02, 0x03, 0x04] },
    { addr = 0x01F0, data = [0xAA, 0xBB, 0xCC, 0xDD] },
]

[clients.of_node]
name = "touchscreen@2c"
compatible = ["synaptics,clearpad"]

[clients.of_node.properties]
"synaptics,irq_gpio" = { gpios = [{ pin = 58, flags = "ACTIVE_LOW" }] }
panel = { phandles = ["panel-boe", "panel-tianma"] }

[[clients]]
name = "bq27xxx"
address = 0x55
"#;

/// Parsed standard board
#[allow(dead_code)]
pub fn board() -> BoardConfig {
    BoardConfig::parse(BOARD).expect("fixture board must parse")
}

/// Transport over a fresh simulated controller
#[allow(dead_code)]
pub fn create_transport() -> (ClearpadI2c<SimulatedClearpad>, SimulatedClearpad) {
    let sim = SimulatedClearpad::new(0x2c);
    (ClearpadI2c::new(sim.clone()), sim)
}
