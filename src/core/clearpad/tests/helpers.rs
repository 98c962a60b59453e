// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Helper functions for transport tests

use super::*;

/// Creates a transport over a fresh simulated controller, returning an
/// observer clone of the controller alongside it
pub fn create_test_bus() -> (ClearpadI2c<SimulatedClearpad>, SimulatedClearpad) {
    let sim = SimulatedClearpad::new(0x2c);
    let observer = sim.clone();
    (ClearpadI2c::new(sim), observer)
}

/// Block reads recorded in the observer's log, as (command, len) pairs
pub fn block_reads(sim: &SimulatedClearpad) -> Vec<(u8, usize)> {
    sim.transactions()
        .into_iter()
        .filter_map(|t| match t {
            Transaction::BlockRead { command, len } => Some((command, len)),
            _ => None,
        })
        .collect()
}

/// Number of page select writes recorded in the observer's log
pub fn page_selects(sim: &SimulatedClearpad) -> usize {
    sim.transactions()
        .iter()
        .filter(|t| matches!(t, Transaction::Send(buf) if buf.len() == 2 && buf[0] == PAGE_SELECT_REGISTER))
        .count()
}
