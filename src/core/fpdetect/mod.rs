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

//! Fingerprint module detection
//!
//! Two fingerprint sensor vendors ship on the same board. The FPC module
//! pulls GPIO14 high; the Egistec module (or an empty connector) leaves it
//! low. Detection forces the pin to a plain input with no pull, waits for
//! the line to settle and samples it.
//!
//! ## Sequence
//!
//! ```text
//! map    TLMM GPIO14 group (0x0390E000, 0x72000 bytes)
//! write  GPIO_CFG     <- 0      input, no pull, GPIO function
//! sleep  100 ms
//! read   GPIO_IN_OUT  bit 0 = pin level
//! unmap
//! ```

use crate::core::error::Result;
use crate::core::mmio::tlmm::{GPIO_CFG, GPIO_IN_OUT};
use crate::core::mmio::MemoryMapper;
use std::fmt;
use std::time::Duration;

/// Raw hardware type reported for an Egistec module (or none)
pub const FP_HW_TYPE_EGISTEC: i32 = 0;

/// Raw hardware type reported for an FPC module
pub const FP_HW_TYPE_FPC: i32 = 1;

/// Physical base of the TLMM GPIO14 register group
pub const MSM_TLMM_GPIO14_BASE: u64 = 0x0390_E000;

/// Length of the mapped TLMM range
pub const MSM_TLMM_SIZE: u32 = 0x72000;

/// Time the strap needs to settle after reconfiguring the pin
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Installed fingerprint sensor family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FpHwType {
    /// Egistec sensor, or no sensor fitted
    Egistec,
    /// FPC sensor
    Fpc,
}

impl FpHwType {
    /// Integer value handed to the fingerprint drivers
    pub fn as_raw(self) -> i32 {
        match self {
            FpHwType::Egistec => FP_HW_TYPE_EGISTEC,
            FpHwType::Fpc => FP_HW_TYPE_FPC,
        }
    }

    /// Classify from the sampled `GPIO_IN_OUT` value
    pub fn from_pin_state(in_out: u32) -> Self {
        if in_out & 0x1 != 0 {
            FpHwType::Fpc
        } else {
            FpHwType::Egistec
        }
    }
}

impl fmt::Display for FpHwType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FpHwType::Egistec => write!(f, "egistec"),
            FpHwType::Fpc => write!(f, "fpc"),
        }
    }
}

/// Source of the settle delay
pub trait Delay {
    fn delay(&mut self, duration: Duration);
}

/// Sleeps the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested delays without sleeping
#[derive(Debug, Default, Clone)]
pub struct NoDelay {
    pub requested: Vec<Duration>,
}

impl Delay for NoDelay {
    fn delay(&mut self, duration: Duration) {
        self.requested.push(duration);
    }
}

/// Fingerprint module detector
///
/// # Example
///
/// ```
/// use input_shim::core::fpdetect::{FpDetector, FpHwType, NoDelay, MSM_TLMM_GPIO14_BASE, MSM_TLMM_SIZE};
/// use input_shim::core::mmio::SimulatedTlmm;
///
/// let tlmm = SimulatedTlmm::new(MSM_TLMM_GPIO14_BASE, MSM_TLMM_SIZE, true);
/// let mut detector = FpDetector::new(tlmm, NoDelay::default());
/// assert_eq!(detector.detect().unwrap(), FpHwType::Fpc);
/// ```
pub struct FpDetector<M, D> {
    mapper: M,
    delay: D,
    base: u64,
    size: u32,
    settle: Duration,
}

impl<M: MemoryMapper, D: Delay> FpDetector<M, D> {
    /// Create a detector for the stock GPIO14 location
    pub fn new(mapper: M, delay: D) -> Self {
        Self {
            mapper,
            delay,
            base: MSM_TLMM_GPIO14_BASE,
            size: MSM_TLMM_SIZE,
            settle: SETTLE_DELAY,
        }
    }

    /// Override the mapped register range
    pub fn with_window(mut self, base: u64, size: u32) -> Self {
        self.base = base;
        self.size = size;
        self
    }

    /// Override the settle delay
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Access the delay source
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Sample the strap pin and classify the installed module
    ///
    /// # Errors
    ///
    /// Returns an error if the register range cannot be mapped or a register
    /// access fails. The window is unmapped on every path.
    pub fn detect(&mut self) -> Result<FpHwType> {
        log::info!("Detecting fingerprint module...");

        let mut window = self.mapper.map(self.base, self.size).inspect_err(|e| {
            log::error!("Failed to map TLMM at 0x{:08X}: {}", self.base, e);
        })?;

        window.write32_relaxed(GPIO_CFG, 0)?;
        self.delay.delay(self.settle);
        let in_out = window.read32_relaxed(GPIO_IN_OUT)?;

        drop(window);

        let hw_type = FpHwType::from_pin_state(in_out);
        match hw_type {
            FpHwType::Fpc => log::info!("fp module is fpc"),
            FpHwType::Egistec => log::info!("fp module is egistec or null"),
        }

        Ok(hw_type)
    }
}
