// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! ClearPad transport tests
//!
//! This module organizes transport tests into logical categories:
//!
//! - `paging`: Page cache behavior and page select failures
//! - `transfers`: Chunked reads, byte writes and raw block transfers
//! - `properties`: Property tests over arbitrary addresses and lengths
//! - `helpers`: Common test utilities

use super::*;
use crate::core::i2c::{SimulatedClearpad, Transaction};

mod helpers;
mod paging;
mod transfers;
