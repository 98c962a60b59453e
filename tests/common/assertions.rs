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

//! Custom assertions for bus-level testing

use input_shim::core::clearpad::PAGE_SELECT_REGISTER;
use input_shim::core::i2c::{SimulatedClearpad, Transaction};

/// Assert the controller's register space holds `expected` at `addr`
#[allow(dead_code)]
pub fn assert_registers(sim: &SimulatedClearpad, addr: u16, expected: &[u8]) {
    for (i, &byte) in expected.iter().enumerate() {
        let at = addr.wrapping_add(i as u16);
        let actual = sim.peek(at);
        assert_eq!(
            actual, byte,
            "Register 0x{:04X} mismatch: expected 0x{:02X}, got 0x{:02X}",
            at, byte, actual
        );
    }
}

/// Assert the pages selected over the bus, in order
#[allow(dead_code)]
pub fn assert_page_selects(sim: &SimulatedClearpad, expected: &[u8]) {
    let selects: Vec<u8> = sim
        .transactions()
        .into_iter()
        .filter_map(|t| match t {
            Transaction::Send(bytes) if bytes.len() == 2 && bytes[0] == PAGE_SELECT_REGISTER => Some(bytes[1]),
            _ => None,
        })
        .collect();
    assert_eq!(selects, expected, "Page select sequence mismatch");
}
