// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! I2C Client Trait
//!
//! This module defines the bus primitives a client driver consumes from the
//! I2C core. The ClearPad transport is written against this trait only, so it
//! runs unchanged over a simulated controller in tests and over any adapter
//! that can issue plain and SMBus transfers.
//!
//! # Transfer Model
//!
//! ```text
//! master_send            S Addr Wr [A] Data [A] Data [A] ... P
//! master_recv            S Addr Rd [A] [Data] A [Data] A ... NA P
//! smbus_read_block       S Addr Wr [A] Comm [A] Sr Addr Rd [A] [Data] A ... NA P
//! smbus_write_byte       S Addr Wr [A] Comm [A] Data [A] P
//! ```
//!
//! Transfers return the number of bytes moved. A count smaller than requested
//! is not an error at this layer; callers decide what a short transfer means.

pub mod sim;

#[cfg(test)]
mod tests;

pub use sim::{SimulatedClearpad, Transaction};

use crate::core::error::Result;

/// Largest payload of a single SMBus block transfer
pub const I2C_SMBUS_BLOCK_MAX: usize = 32;

/// Primitives exposed by an I2C client device
///
/// Implementations represent one addressed device on an adapter. All methods
/// take `&mut self`: a client is owned by exactly one driver instance, which
/// serializes access itself.
pub trait I2cClient {
    /// 7-bit slave address of the device
    fn address(&self) -> u16;

    /// Device name used for driver matching and log messages
    fn name(&self) -> &str;

    /// Issue a single write transfer
    ///
    /// # Returns
    ///
    /// Number of bytes acknowledged by the device
    fn master_send(&mut self, buf: &[u8]) -> Result<usize>;

    /// Issue a single read transfer filling `buf`
    ///
    /// # Returns
    ///
    /// Number of bytes received
    fn master_recv(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// SMBus "I2C block read": write `command`, then read up to `buf.len()`
    /// bytes (at most [`I2C_SMBUS_BLOCK_MAX`]) with a repeated start
    ///
    /// # Returns
    ///
    /// Number of bytes read
    fn smbus_read_i2c_block_data(&mut self, command: u8, buf: &mut [u8]) -> Result<usize>;

    /// SMBus "write byte data": write `value` to register `command`
    fn smbus_write_byte_data(&mut self, command: u8, value: u8) -> Result<()>;
}

impl<C: I2cClient + ?Sized> I2cClient for Box<C> {
    fn address(&self) -> u16 {
        (**self).address()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn master_send(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).master_send(buf)
    }

    fn master_recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).master_recv(buf)
    }

    fn smbus_read_i2c_block_data(&mut self, command: u8, buf: &mut [u8]) -> Result<usize> {
        (**self).smbus_read_i2c_block_data(command, buf)
    }

    fn smbus_write_byte_data(&mut self, command: u8, value: u8) -> Result<()> {
        (**self).smbus_write_byte_data(command, value)
    }
}

/// Type-erased client as held by the I2C core
pub type DynI2cClient = Box<dyn I2cClient + Send>;
