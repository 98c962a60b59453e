// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Fault injection tests

use super::*;
use crate::core::error::DriverError;

#[test]
fn test_fail_next_transaction() {
    let mut sim = SimulatedClearpad::new(0x2c);
    sim.fail_nth(0, -121);

    let err = sim.master_send(&[0xFF, 0x01]).unwrap_err();
    assert!(matches!(err, DriverError::Transfer { rc: -121, .. }));
    // Failed page select must not change the page
    assert_eq!(sim.page(), 0);

    // Fault is one-shot
    assert!(sim.master_send(&[0xFF, 0x01]).is_ok());
    assert_eq!(sim.page(), 1);
}

#[test]
fn test_fail_later_transaction() {
    let mut sim = SimulatedClearpad::new(0x2c);
    sim.fail_nth(2, -5);

    assert!(sim.smbus_write_byte_data(0x00, 1).is_ok());
    assert!(sim.smbus_write_byte_data(0x01, 2).is_ok());
    assert!(sim.smbus_write_byte_data(0x02, 3).is_err());
    assert_eq!(sim.peek(0x0002), 0);
}

#[test]
fn test_block_read_cap() {
    let mut sim = SimulatedClearpad::new(0x2c);
    sim.cap_block_reads(Some(7));

    let mut buf = [0u8; 32];
    assert_eq!(sim.smbus_read_i2c_block_data(0x00, &mut buf).unwrap(), 7);

    sim.cap_block_reads(None);
    assert_eq!(sim.smbus_read_i2c_block_data(0x00, &mut buf).unwrap(), 32);
}

#[test]
fn test_send_cap_reports_short_write() {
    let mut sim = SimulatedClearpad::new(0x2c);
    sim.cap_sends(Some(1));

    assert_eq!(sim.master_send(&[0xFF, 0x09]).unwrap(), 1);
    assert_eq!(sim.page(), 0);
}
