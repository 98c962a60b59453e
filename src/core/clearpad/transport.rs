// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! I2C implementation of the ClearPad bus
//!
//! The cached page and the client live behind one mutex. Every operation
//! holds it across the page select and the data transfer, so two callers can
//! never interleave a page change with each other's data.

use super::{page_of, reg_of, ClearpadBus, BUS_I2C, PAGE_SELECT_REGISTER};
use crate::core::error::{DriverError, Result};
use crate::core::i2c::{I2cClient, I2C_SMBUS_BLOCK_MAX};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Client plus the page the controller currently has latched
struct PagedClient<C> {
    client: C,

    /// Last page successfully selected
    ///
    /// Starts at 0, the controller's reset page.
    page: u8,
}

impl<C: I2cClient> PagedClient<C> {
    fn set_page(&mut self, device: &str, page: u8) -> Result<()> {
        let txbuf = [PAGE_SELECT_REGISTER, page];

        match self.client.master_send(&txbuf) {
            Ok(n) if n == txbuf.len() => {
                log::trace!("{}: page 0x{:02X} -> 0x{:02X}", device, self.page, page);
                self.page = page;
                Ok(())
            }
            Ok(n) => {
                log::error!("{}: set page failed: {}", device, n);
                Err(DriverError::ShortTransfer {
                    op: "set_page",
                    expected: txbuf.len(),
                    got: n,
                })
            }
            Err(e) => {
                log::error!("{}: set page failed: {}", device, e.errno());
                Err(e)
            }
        }
    }

    /// Select the page of `addr` unless it is already latched
    fn select(&mut self, device: &str, addr: u16) -> Result<()> {
        let page = page_of(addr);
        if page != self.page {
            self.set_page(device, page)?;
        }
        Ok(())
    }
}

/// ClearPad transport over an I2C client
///
/// # Example
///
/// ```
/// use input_shim::core::clearpad::{ClearpadBus, ClearpadI2c};
/// use input_shim::core::i2c::SimulatedClearpad;
///
/// let sim = SimulatedClearpad::new(0x2c);
/// sim.poke(0x00E1, &[0x01, 0x02, 0x03]);
///
/// let bus = ClearpadI2c::new(sim);
/// let mut buf = [0u8; 3];
/// bus.read(0x00E1, &mut buf).unwrap();
/// assert_eq!(buf, [0x01, 0x02, 0x03]);
/// ```
pub struct ClearpadI2c<C> {
    inner: Mutex<PagedClient<C>>,

    /// "name@addr" label for log messages
    device: String,
}

impl<C: I2cClient> ClearpadI2c<C> {
    /// Wrap `client`, assuming the controller is on page 0
    pub fn new(client: C) -> Self {
        let device = format!("{}@{:#04x}", client.name(), client.address());
        Self {
            inner: Mutex::new(PagedClient { client, page: 0 }),
            device,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PagedClient<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Page the transport believes is latched
    pub fn cached_page(&self) -> u8 {
        self.lock().page
    }

    /// Label used in log messages
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Release the underlying client
    pub fn into_client(self) -> C {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .client
    }
}

impl<C: I2cClient + Send> ClearpadBus for ClearpadI2c<C> {
    fn bustype(&self) -> u16 {
        BUS_I2C
    }

    fn set_page(&self, page: u8) -> Result<()> {
        self.lock().set_page(&self.device, page)
    }

    fn read(&self, addr: u16, buf: &mut [u8]) -> Result<usize> {
        let mut paged = self.lock();
        paged.select(&self.device, addr)?;

        let reg = reg_of(addr);
        let len = buf.len();
        let mut off = 0;

        while off < len {
            let rsize = (len - off).min(I2C_SMBUS_BLOCK_MAX);
            // Command byte is 8 bits wide; offsets wrap inside the page
            let command = reg.wrapping_add(off as u8);

            match paged
                .client
                .smbus_read_i2c_block_data(command, &mut buf[off..off + rsize])
            {
                Ok(n) if n >= rsize => off += rsize,
                Ok(n) if n > 0 => {
                    log::error!("{}: read: rc = {}", self.device, n);
                    off += n;
                    break;
                }
                Ok(n) => {
                    log::error!("{}: read: rc = {}", self.device, n);
                    return Err(DriverError::ShortTransfer {
                        op: "read",
                        expected: rsize,
                        got: n,
                    });
                }
                Err(e) => {
                    log::error!("{}: read: rc = {}", self.device, e.errno());
                    return Err(e);
                }
            }
        }

        log::trace!("{}: read 0x{:04X} len {} -> {}", self.device, addr, len, off);
        Ok(off)
    }

    fn write(&self, addr: u16, buf: &[u8]) -> Result<usize> {
        let mut paged = self.lock();
        paged.select(&self.device, addr)?;

        let reg = reg_of(addr);
        for (i, &value) in buf.iter().enumerate() {
            paged
                .client
                .smbus_write_byte_data(reg.wrapping_add(i as u8), value)?;
        }

        log::trace!("{}: write 0x{:04X} len {}", self.device, addr, buf.len());
        Ok(buf.len())
    }

    fn read_block(&self, addr: u16, buf: &mut [u8]) -> Result<usize> {
        let mut paged = self.lock();
        paged.select(&self.device, addr)?;

        let txbuf = [reg_of(addr)];
        match paged.client.master_send(&txbuf)? {
            1 => {}
            n => {
                return Err(DriverError::ShortTransfer {
                    op: "read_block",
                    expected: txbuf.len(),
                    got: n,
                })
            }
        }

        paged.client.master_recv(buf).inspect_err(|e| {
            log::error!("{}: read_block: rc = {}", self.device, e.errno());
        })
    }

    fn write_block(&self, addr: u16, buf: &[u8]) -> Result<usize> {
        let mut txbuf = Vec::new();
        txbuf.try_reserve_exact(buf.len() + 1).map_err(|_| {
            DriverError::OutOfMemory(format!("{} byte write_block buffer", buf.len() + 1))
        })?;
        txbuf.push(reg_of(addr));
        txbuf.extend_from_slice(buf);

        let mut paged = self.lock();
        paged.select(&self.device, addr)?;

        let sent = paged.client.master_send(&txbuf).inspect_err(|e| {
            log::error!("{}: write_block: rc = {}", self.device, e.errno());
        })?;

        // Register byte is not payload
        Ok(sent.saturating_sub(1))
    }
}
