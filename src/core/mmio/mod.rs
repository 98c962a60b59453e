// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Memory-mapped register windows
//!
//! This module defines a trait-based abstraction over physical register
//! blocks. A [`MemoryMapper`] plays the role of `ioremap`: it turns a
//! physical range into a [`RegisterWindow`] that offers relaxed 32-bit
//! accesses at offsets from the window base. Dropping the window unmaps it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            Detection routine                │
//! ├─────────────────────────────────────────────┤
//! │  window = mapper.map(phys, size)            │
//! │  window.write32_relaxed(0x0, 0)             │
//! │  window.read32_relaxed(0x4)                 │
//! │  drop(window)                // iounmap     │
//! └─────────────────────────────────────────────┘
//!           ▲                   ▲
//!           │                   │
//!    ┌──────┴──────┐    ┌───────┴───────┐
//!    │   DevMem    │    │ SimulatedTlmm │
//!    │ (/dev/mem)  │    │  (in-process) │
//!    └─────────────┘    └───────────────┘
//! ```

#[cfg(unix)]
pub mod devmem;
pub mod tlmm;

#[cfg(test)]
mod tests;

#[cfg(unix)]
pub use devmem::DevMem;
pub use tlmm::SimulatedTlmm;

use crate::core::error::{DriverError, Result};

/// A mapped block of 32-bit device registers
///
/// Offsets are relative to the window base. For example, with a window
/// mapped at `0x0390E000`, the register at `0x0390E004` is offset `0x04`.
///
/// # Errors
///
/// Implementations reject offsets that are not 4-byte aligned or whose
/// 4-byte access would leave the window.
pub trait RegisterWindow: Send {
    /// Physical base address of the window
    fn base(&self) -> u64;

    /// Window length in bytes
    fn size(&self) -> u32;

    /// Check if a 32-bit access at `offset` stays inside the window
    fn contains(&self, offset: u32) -> bool {
        offset
            .checked_add(4)
            .is_some_and(|end| end <= self.size())
    }

    /// Read a 32-bit register without ordering barriers
    fn read32_relaxed(&self, offset: u32) -> Result<u32>;

    /// Write a 32-bit register without ordering barriers
    fn write32_relaxed(&mut self, offset: u32, value: u32) -> Result<()>;

    /// Optional: window name for debugging
    fn name(&self) -> &str {
        "Unknown Window"
    }
}

/// Maps physical register ranges into windows
pub trait MemoryMapper {
    /// Map `size` bytes of physical address space starting at `phys`
    fn map(&mut self, phys: u64, size: u32) -> Result<Box<dyn RegisterWindow>>;
}

/// Validate a 32-bit access against a window of `size` bytes
pub(crate) fn check_access(offset: u32, size: u32) -> Result<()> {
    if offset & 0x03 != 0 {
        return Err(DriverError::UnalignedAccess { offset });
    }
    match offset.checked_add(4) {
        Some(end) if end <= size => Ok(()),
        _ => Err(DriverError::WindowAccess { offset, size }),
    }
}
