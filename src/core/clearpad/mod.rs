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

//! ClearPad bus transport
//!
//! Synaptics ClearPad controllers expose a 16-bit register address space.
//! The high byte selects a page, the low byte a register inside it. The page
//! is latched by writing the page number to register `0xFF`, after which all
//! transfers hit that page until it is changed again.
//!
//! ## Address Layout
//!
//! ```text
//! 15             8 7              0
//! +---------------+---------------+
//! |     page      |   register    |
//! +---------------+---------------+
//! ```
//!
//! ## Bus Operations
//!
//! The core touch driver talks to the controller only through
//! [`ClearpadBus`], so the same driver runs over any transport that
//! implements it. [`ClearpadI2c`] is the I2C implementation.
//!
//! | Operation     | Wire sequence                                   |
//! |---------------|-------------------------------------------------|
//! | `set_page`    | write `[0xFF, page]`                            |
//! | `read`        | SMBus block reads of up to 32 bytes per chunk   |
//! | `write`       | one SMBus byte write per register               |
//! | `read_block`  | write `[reg]`, then one plain read              |
//! | `write_block` | write `[reg, data...]` in one transfer          |

mod transport;

#[cfg(test)]
mod tests;

pub use transport::ClearpadI2c;

use crate::core::error::Result;

/// Register that latches the active page
pub const PAGE_SELECT_REGISTER: u8 = 0xFF;

/// Input subsystem bus type for I2C attached devices
pub const BUS_I2C: u16 = 0x18;

/// Name of the platform device consumed by the core touch driver
pub const CLEARPAD_NAME: &str = "clearpad";

/// Name of the I2C driver and its device id
pub const CLEARPAD_I2C_NAME: &str = "clearpad_i2c";

/// Device tree compatible string matched by the I2C driver
pub const CLEARPAD_COMPATIBLE: &str = "synaptics,clearpad";

/// Page half of a register address
///
/// # Example
///
/// ```
/// use input_shim::core::clearpad::page_of;
///
/// assert_eq!(page_of(0x04A7), 0x04);
/// ```
#[inline(always)]
pub const fn page_of(addr: u16) -> u8 {
    ((addr >> 8) & 0xFF) as u8
}

/// Register half of a register address
///
/// # Example
///
/// ```
/// use input_shim::core::clearpad::reg_of;
///
/// assert_eq!(reg_of(0x04A7), 0xA7);
/// ```
#[inline(always)]
pub const fn reg_of(addr: u16) -> u8 {
    (addr & 0xFF) as u8
}

/// Bus operations the core touch driver uses to reach the controller
///
/// All methods take `&self`: implementations are shared between the bus
/// driver and the core driver and serialize transfers internally.
///
/// Register offsets inside a transfer wrap within the 8-bit register space
/// of the addressed page; a transfer never crosses into the next page.
pub trait ClearpadBus: Send + Sync {
    /// Input subsystem bus type (`BUS_I2C` for the I2C transport)
    fn bustype(&self) -> u16;

    /// Latch `page` as the active register page
    fn set_page(&self, page: u8) -> Result<()>;

    /// Read `buf.len()` bytes starting at `addr`
    ///
    /// # Returns
    ///
    /// Bytes read. Less than `buf.len()` when the controller ended a chunk
    /// early; the remaining bytes of `buf` are left untouched.
    ///
    /// # Errors
    ///
    /// A chunk that returns zero bytes fails the read with
    /// `ShortTransfer` (`-EIO`), as does any failed transfer.
    fn read(&self, addr: u16, buf: &mut [u8]) -> Result<usize>;

    /// Write `buf` starting at `addr`
    ///
    /// # Returns
    ///
    /// Bytes written
    fn write(&self, addr: u16, buf: &[u8]) -> Result<usize>;

    /// Read `buf.len()` bytes starting at `addr` in a single transfer
    fn read_block(&self, addr: u16, buf: &mut [u8]) -> Result<usize>;

    /// Write `buf` starting at `addr` in a single transfer
    ///
    /// # Returns
    ///
    /// Payload bytes written, not counting the register byte
    fn write_block(&self, addr: u16, buf: &[u8]) -> Result<usize>;
}
