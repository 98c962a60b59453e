// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Page cache tests

use super::helpers::*;
use super::*;
use crate::core::error::DriverError;

#[test]
fn test_address_split() {
    assert_eq!(page_of(0x0000), 0x00);
    assert_eq!(reg_of(0x0000), 0x00);
    assert_eq!(page_of(0x12FF), 0x12);
    assert_eq!(reg_of(0x12FF), 0xFF);
    assert_eq!(page_of(0xFFFF), 0xFF);
}

#[test]
fn test_page_zero_needs_no_select() {
    let (bus, sim) = create_test_bus();
    let mut buf = [0u8; 4];

    bus.read(0x0010, &mut buf).unwrap();

    assert_eq!(page_selects(&sim), 0);
    assert_eq!(bus.cached_page(), 0);
}

#[test]
fn test_page_selected_once_per_change() {
    let (bus, sim) = create_test_bus();
    let mut buf = [0u8; 2];

    bus.read(0x0300, &mut buf).unwrap();
    bus.read(0x0310, &mut buf).unwrap();
    bus.write(0x0320, &[1]).unwrap();
    assert_eq!(page_selects(&sim), 1);
    assert_eq!(sim.page(), 0x03);

    bus.read(0x0000, &mut buf).unwrap();
    assert_eq!(page_selects(&sim), 2);
    assert_eq!(bus.cached_page(), 0x00);
}

#[test]
fn test_page_select_wire_format() {
    let (bus, sim) = create_test_bus();

    bus.set_page(0x05).unwrap();

    assert_eq!(sim.transactions(), vec![Transaction::Send(vec![0xFF, 0x05])]);
    assert_eq!(bus.cached_page(), 0x05);
}

#[test]
fn test_failed_page_select_aborts_transfer() {
    let (bus, sim) = create_test_bus();
    sim.fail_nth(0, -121);

    let mut buf = [0u8; 4];
    let err = bus.read(0x0200, &mut buf).unwrap_err();

    assert_eq!(err.errno(), -121);
    assert_eq!(bus.cached_page(), 0);
    assert!(block_reads(&sim).is_empty());
}

#[test]
fn test_short_page_select_is_eio() {
    let (bus, sim) = create_test_bus();
    sim.cap_sends(Some(1));

    let err = bus.set_page(0x07).unwrap_err();

    assert!(matches!(
        err,
        DriverError::ShortTransfer {
            op: "set_page",
            expected: 2,
            got: 1
        }
    ));
    assert_eq!(err.errno(), -5);
    assert_eq!(bus.cached_page(), 0);
}

#[test]
fn test_page_retried_after_failure() {
    let (bus, sim) = create_test_bus();
    sim.fail_nth(0, -5);

    assert!(bus.write(0x0101, &[0xAA]).is_err());
    bus.write(0x0101, &[0xAA]).unwrap();

    assert_eq!(sim.peek(0x0101), 0xAA);
    assert_eq!(bus.cached_page(), 0x01);
}

#[test]
fn test_bustype() {
    let (bus, _) = create_test_bus();
    assert_eq!(bus.bustype(), BUS_I2C);
}
