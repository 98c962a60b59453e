// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Transfer tests
//!
//! Tests for chunked SMBus reads, per-register writes and the raw block
//! transfers, including partial and failed chunks.

use super::helpers::*;
use super::*;
use crate::core::error::DriverError;

#[test]
fn test_read_small() {
    let (bus, sim) = create_test_bus();
    sim.poke(0x0140, &[0xDE, 0xAD, 0xBE, 0xEF]);

    let mut buf = [0u8; 4];
    assert_eq!(bus.read(0x0140, &mut buf).unwrap(), 4);
    assert_eq!(buf, [0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(block_reads(&sim), vec![(0x40, 4)]);
}

#[test]
fn test_read_chunks_at_smbus_max() {
    let (bus, sim) = create_test_bus();
    let data: Vec<u8> = (0..70u8).collect();
    sim.poke(0x0010, &data);

    let mut buf = [0u8; 70];
    assert_eq!(bus.read(0x0010, &mut buf).unwrap(), 70);
    assert_eq!(&buf[..], &data[..]);
    assert_eq!(block_reads(&sim), vec![(0x10, 32), (0x30, 32), (0x50, 6)]);
}

#[test]
fn test_read_empty_buffer() {
    let (bus, sim) = create_test_bus();
    let mut buf = [0u8; 0];

    assert_eq!(bus.read(0x0000, &mut buf).unwrap(), 0);
    assert!(sim.transactions().is_empty());
}

#[test]
fn test_partial_chunk_returns_bytes_so_far() {
    let (bus, sim) = create_test_bus();
    let mut buf = [0u8; 64];

    // Controller ends the first chunk after 20 bytes
    sim.cap_block_reads(Some(20));
    let n = bus.read(0x0000, &mut buf).unwrap();

    assert_eq!(n, 20);
    assert_eq!(block_reads(&sim), vec![(0x00, 32)]);
}

#[test]
fn test_failed_chunk_fails_read() {
    let (bus, sim) = create_test_bus();
    let mut buf = [0u8; 64];

    // Second block read fails
    sim.fail_nth(1, -110);
    let err = bus.read(0x0000, &mut buf).unwrap_err();

    assert_eq!(err.errno(), -110);
}

#[test]
fn test_zero_length_chunk_is_short_transfer() {
    let (bus, sim) = create_test_bus();
    sim.cap_block_reads(Some(0));

    let mut buf = [0u8; 8];
    let err = bus.read(0x0000, &mut buf).unwrap_err();

    assert!(matches!(err, DriverError::ShortTransfer { op: "read", .. }));
}

#[test]
fn test_write_one_byte_per_register() {
    let (bus, sim) = create_test_bus();

    assert_eq!(bus.write(0x02F0, &[1, 2, 3]).unwrap(), 3);

    let writes: Vec<_> = sim
        .transactions()
        .into_iter()
        .filter(|t| matches!(t, Transaction::WriteByte { .. }))
        .collect();
    assert_eq!(
        writes,
        vec![
            Transaction::WriteByte { command: 0xF0, value: 1 },
            Transaction::WriteByte { command: 0xF1, value: 2 },
            Transaction::WriteByte { command: 0xF2, value: 3 },
        ]
    );
    assert_eq!(sim.peek(0x02F1), 2);
}

#[test]
fn test_write_stops_at_first_failure() {
    let (bus, sim) = create_test_bus();
    sim.fail_nth(1, -5);

    assert!(bus.write(0x0000, &[9, 9, 9]).is_err());
    assert_eq!(sim.peek(0x0000), 9);
    assert_eq!(sim.peek(0x0001), 0);
    assert_eq!(sim.peek(0x0002), 0);
}

#[test]
fn test_read_block() {
    let (bus, sim) = create_test_bus();
    sim.poke(0x0480, &[5, 6, 7, 8, 9]);

    let mut buf = [0u8; 5];
    assert_eq!(bus.read_block(0x0480, &mut buf).unwrap(), 5);
    assert_eq!(buf, [5, 6, 7, 8, 9]);

    let log = sim.transactions();
    assert_eq!(log[0], Transaction::Send(vec![0xFF, 0x04]));
    assert_eq!(log[1], Transaction::Send(vec![0x80]));
    assert_eq!(log[2], Transaction::Recv(5));
}

#[test]
fn test_read_block_register_send_failure() {
    let (bus, sim) = create_test_bus();
    sim.fail_nth(0, -6);

    let mut buf = [0u8; 2];
    assert_eq!(bus.read_block(0x0010, &mut buf).unwrap_err().errno(), -6);
    assert!(!sim.transactions().contains(&Transaction::Recv(2)));
}

#[test]
fn test_write_block_sends_register_and_payload() {
    let (bus, sim) = create_test_bus();

    assert_eq!(bus.write_block(0x0130, &[0xA1, 0xA2, 0xA3]).unwrap(), 3);

    assert_eq!(
        sim.transactions().last(),
        Some(&Transaction::Send(vec![0x30, 0xA1, 0xA2, 0xA3]))
    );
    assert_eq!(sim.peek(0x0132), 0xA3);
}

#[test]
fn test_write_block_short_send_counts_payload_only() {
    let (bus, sim) = create_test_bus();
    sim.cap_sends(Some(3));

    assert_eq!(bus.write_block(0x0000, &[1, 2, 3, 4]).unwrap(), 2);
}

#[test]
fn test_concurrent_access_keeps_pages_consistent() {
    use std::sync::Arc;
    use std::thread;

    let (bus, sim) = create_test_bus();
    sim.poke(0x0100, &[0x11; 8]);
    sim.poke(0x0200, &[0x22; 8]);
    let bus = Arc::new(bus);

    let handles: Vec<_> = [(0x0100u16, 0x11u8), (0x0200, 0x22)]
        .into_iter()
        .map(|(addr, expected)| {
            let bus = Arc::clone(&bus);
            thread::spawn(move || {
                for _ in 0..50 {
                    let mut buf = [0u8; 8];
                    bus.read(addr, &mut buf).unwrap();
                    assert_eq!(buf, [expected; 8]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
