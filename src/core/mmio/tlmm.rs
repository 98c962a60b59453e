// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Simulated TLMM GPIO block
//!
//! Models a single TLMM GPIO register group, which is all the fingerprint
//! detection touches:
//!
//! ```text
//! +0x0  GPIO_CFG     bits 0-1 pull, 2-5 function, 6-8 drive, 9 output enable
//! +0x4  GPIO_IN_OUT  bit 0 input level (RO), bit 1 output level
//! ```
//!
//! With output enable clear, bit 0 of `GPIO_IN_OUT` follows the externally
//! strapped level of the pin. Anything else in the window reads back the
//! last value written.

use super::{check_access, MemoryMapper, RegisterWindow};
use crate::core::error::{DriverError, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// GPIO configuration register offset
pub const GPIO_CFG: u32 = 0x0;

/// GPIO input/output register offset
pub const GPIO_IN_OUT: u32 = 0x4;

/// Output enable bit of `GPIO_CFG`
pub const GPIO_CFG_OE: u32 = 1 << 9;

/// Reset value of `GPIO_CFG`: pull-down, 2 mA drive
const GPIO_CFG_RESET: u32 = 0x1;

const GPIO_IN: u32 = 1 << 0;
const GPIO_OUT: u32 = 1 << 1;

struct TlmmState {
    cfg: u32,
    out: bool,
    strap_high: bool,
    cfg_writes: Vec<u32>,
    other: BTreeMap<u32, u32>,
    live_windows: usize,
    total_maps: usize,
}

/// In-process TLMM model acting as its own mapper
///
/// Clones share state so a test can keep one to inspect what the code under
/// test did to the block.
#[derive(Clone)]
pub struct SimulatedTlmm {
    base: u64,
    size: u32,
    state: Arc<Mutex<TlmmState>>,
}

impl SimulatedTlmm {
    /// Create a block at `base` spanning `size` bytes with the pin strapped
    /// to `strap_high`
    pub fn new(base: u64, size: u32, strap_high: bool) -> Self {
        Self {
            base,
            size,
            state: Arc::new(Mutex::new(TlmmState {
                cfg: GPIO_CFG_RESET,
                out: false,
                strap_high,
                cfg_writes: Vec::new(),
                other: BTreeMap::new(),
                live_windows: 0,
                total_maps: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TlmmState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change the externally strapped pin level
    pub fn set_strap(&self, high: bool) {
        self.lock().strap_high = high;
    }

    /// Current `GPIO_CFG` value
    pub fn cfg(&self) -> u32 {
        self.lock().cfg
    }

    /// Every value written to `GPIO_CFG`, oldest first
    pub fn cfg_writes(&self) -> Vec<u32> {
        self.lock().cfg_writes.clone()
    }

    /// Windows mapped and not yet dropped
    pub fn live_windows(&self) -> usize {
        self.lock().live_windows
    }

    /// Windows mapped over the block's lifetime
    pub fn total_maps(&self) -> usize {
        self.lock().total_maps
    }
}

impl MemoryMapper for SimulatedTlmm {
    fn map(&mut self, phys: u64, size: u32) -> Result<Box<dyn RegisterWindow>> {
        let end = phys.checked_add(size as u64);
        let block_end = self.base + self.size as u64;
        if phys != self.base || end.is_none_or(|end| end > block_end) {
            return Err(DriverError::NoDevice(format!(
                "no TLMM block at 0x{:08X} (+0x{:X})",
                phys, size
            )));
        }

        let mut state = self.lock();
        state.live_windows += 1;
        state.total_maps += 1;
        drop(state);

        Ok(Box::new(TlmmWindow {
            tlmm: self.clone(),
            size,
        }))
    }
}

struct TlmmWindow {
    tlmm: SimulatedTlmm,
    size: u32,
}

impl RegisterWindow for TlmmWindow {
    fn base(&self) -> u64 {
        self.tlmm.base
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn read32_relaxed(&self, offset: u32) -> Result<u32> {
        check_access(offset, self.size)?;
        let state = self.tlmm.lock();

        let value = match offset {
            GPIO_CFG => state.cfg,
            GPIO_IN_OUT => {
                let level = if state.cfg & GPIO_CFG_OE != 0 {
                    state.out
                } else {
                    state.strap_high
                };
                let mut value = 0;
                if level {
                    value |= GPIO_IN;
                }
                if state.out {
                    value |= GPIO_OUT;
                }
                value
            }
            _ => state.other.get(&offset).copied().unwrap_or(0),
        };

        log::trace!("TLMM read +0x{:X} -> 0x{:08X}", offset, value);
        Ok(value)
    }

    fn write32_relaxed(&mut self, offset: u32, value: u32) -> Result<()> {
        check_access(offset, self.size)?;
        let mut state = self.tlmm.lock();

        match offset {
            GPIO_CFG => {
                state.cfg = value;
                state.cfg_writes.push(value);
            }
            GPIO_IN_OUT => state.out = value & GPIO_OUT != 0,
            _ => {
                state.other.insert(offset, value);
            }
        }

        log::trace!("TLMM write +0x{:X} <- 0x{:08X}", offset, value);
        Ok(())
    }

    fn name(&self) -> &str {
        "TLMM"
    }
}

impl Drop for TlmmWindow {
    fn drop(&mut self) {
        let mut state = self.tlmm.lock();
        state.live_windows = state.live_windows.saturating_sub(1);
    }
}
