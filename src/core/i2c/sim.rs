// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Simulated ClearPad controller
//!
//! A register-level model of a ClearPad touch controller as seen from the
//! I2C bus. The controller exposes a 16-bit register space split into 256
//! pages of 256 registers; writing register `0xFF` selects the page that
//! subsequent accesses hit.
//!
//! Clones share one register file, so a test can hand one clone to the
//! transport and keep another to inspect the bus traffic and inject faults.

use super::{I2cClient, I2C_SMBUS_BLOCK_MAX};
use crate::core::error::{DriverError, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Page select register shared by every page
const PAGE_SELECT: u8 = 0xFF;

/// Size of the full paged register space
const REGISTER_SPACE: usize = 0x1_0000;

/// One bus transaction as observed by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Plain write transfer
    Send(Vec<u8>),
    /// Plain read transfer of the given length
    Recv(usize),
    /// SMBus block read from `command`
    BlockRead { command: u8, len: usize },
    /// SMBus byte write
    WriteByte { command: u8, value: u8 },
}

/// Injected failure for a future transaction
#[derive(Debug, Clone, Copy)]
struct Fault {
    /// Index of the transaction (counted from injection) that fails
    remaining: usize,
    /// Negative errno returned by the failing transaction
    rc: i32,
}

struct SimState {
    registers: Vec<u8>,
    page: u8,
    pointer: u8,
    log: Vec<Transaction>,
    fault: Option<Fault>,
    block_read_cap: Option<usize>,
    send_cap: Option<usize>,
}

impl SimState {
    fn index(&self, reg: u8) -> usize {
        ((self.page as usize) << 8) | reg as usize
    }

    /// Record a transaction and apply any pending fault
    fn begin(&mut self, op: &'static str, transaction: Transaction) -> Result<()> {
        self.log.push(transaction);
        if let Some(fault) = self.fault.as_mut() {
            if fault.remaining == 0 {
                let rc = fault.rc;
                self.fault = None;
                log::trace!("sim: injected failure on {} (rc = {})", op, rc);
                return Err(DriverError::Transfer { op, rc });
            }
            fault.remaining -= 1;
        }
        Ok(())
    }
}

/// Simulated ClearPad controller
#[derive(Clone)]
pub struct SimulatedClearpad {
    address: u16,
    name: String,
    state: Arc<Mutex<SimState>>,
}

impl SimulatedClearpad {
    /// Device name the controller advertises on the bus
    pub const DEVICE_NAME: &'static str = "clearpad_i2c";

    /// Create a controller at `address` with an all-zero register file
    ///
    /// # Example
    ///
    /// ```
    /// use input_shim::core::i2c::{I2cClient, SimulatedClearpad};
    ///
    /// let sim = SimulatedClearpad::new(0x2c);
    /// assert_eq!(sim.address(), 0x2c);
    /// assert_eq!(sim.page(), 0);
    /// ```
    pub fn new(address: u16) -> Self {
        Self::with_name(address, Self::DEVICE_NAME)
    }

    /// Create a controller advertising a custom device name
    pub fn with_name(address: u16, name: &str) -> Self {
        Self {
            address,
            name: name.to_string(),
            state: Arc::new(Mutex::new(SimState {
                registers: vec![0u8; REGISTER_SPACE],
                page: 0,
                pointer: 0,
                log: Vec::new(),
                fault: None,
                block_read_cap: None,
                send_cap: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Currently selected page
    pub fn page(&self) -> u8 {
        self.lock().page
    }

    /// Read a register directly, bypassing the bus
    pub fn peek(&self, addr: u16) -> u8 {
        self.lock().registers[addr as usize]
    }

    /// Write registers directly, bypassing the bus
    ///
    /// Bytes past the end of the register space are dropped.
    pub fn poke(&self, addr: u16, data: &[u8]) {
        let mut state = self.lock();
        let start = addr as usize;
        let end = (start + data.len()).min(REGISTER_SPACE);
        state.registers[start..end].copy_from_slice(&data[..end - start]);
    }

    /// Transactions observed since creation or the last [`clear_log`](Self::clear_log)
    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().log.clone()
    }

    /// Forget recorded transactions
    pub fn clear_log(&self) {
        self.lock().log.clear();
    }

    /// Make the `nth` upcoming transaction (0 = the next one) fail with `rc`
    pub fn fail_nth(&self, nth: usize, rc: i32) {
        self.lock().fault = Some(Fault { remaining: nth, rc });
    }

    /// Limit how many bytes each SMBus block read returns
    pub fn cap_block_reads(&self, cap: Option<usize>) {
        self.lock().block_read_cap = cap;
    }

    /// Limit how many bytes each plain write transfer accepts
    pub fn cap_sends(&self, cap: Option<usize>) {
        self.lock().send_cap = cap;
    }
}

impl I2cClient for SimulatedClearpad {
    fn address(&self) -> u16 {
        self.address
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn master_send(&mut self, buf: &[u8]) -> Result<usize> {
        let mut state = self.lock();
        state.begin("master_send", Transaction::Send(buf.to_vec()))?;

        let accepted = state.send_cap.map_or(buf.len(), |cap| buf.len().min(cap));
        let buf = &buf[..accepted];

        match buf {
            [] => {}
            [PAGE_SELECT] => state.pointer = PAGE_SELECT,
            [PAGE_SELECT, page, ..] => {
                state.page = *page;
                log::trace!("sim: page -> 0x{:02X}", page);
            }
            [reg, data @ ..] => {
                state.pointer = *reg;
                for (i, byte) in data.iter().enumerate() {
                    let idx = state.index(reg.wrapping_add(i as u8));
                    state.registers[idx] = *byte;
                }
            }
        }

        Ok(accepted)
    }

    fn master_recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.lock();
        state.begin("master_recv", Transaction::Recv(buf.len()))?;

        let start = state.pointer;
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = state.registers[state.index(start.wrapping_add(i as u8))];
        }
        state.pointer = start.wrapping_add(buf.len() as u8);

        Ok(buf.len())
    }

    fn smbus_read_i2c_block_data(&mut self, command: u8, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.lock();
        state.begin(
            "smbus_read_i2c_block_data",
            Transaction::BlockRead {
                command,
                len: buf.len(),
            },
        )?;

        let mut len = buf.len().min(I2C_SMBUS_BLOCK_MAX);
        if let Some(cap) = state.block_read_cap {
            len = len.min(cap);
        }
        for (i, byte) in buf[..len].iter_mut().enumerate() {
            *byte = state.registers[state.index(command.wrapping_add(i as u8))];
        }

        Ok(len)
    }

    fn smbus_write_byte_data(&mut self, command: u8, value: u8) -> Result<()> {
        let mut state = self.lock();
        state.begin(
            "smbus_write_byte_data",
            Transaction::WriteByte { command, value },
        )?;

        if command == PAGE_SELECT {
            state.page = value;
        } else {
            let idx = state.index(command);
            state.registers[idx] = value;
        }

        Ok(())
    }
}
