// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Driver-core tests
//!
//! This module organizes driver-core tests into logical categories:
//! - `devicetree`: Property lookup and GPIO flag parsing
//! - `probe`: Driver match, probe and remove
//! - `registration`: I2C core driver registration and init modes
//! - `helpers`: Common fixtures

use super::*;
use crate::core::clearpad::ClearpadBus;
use crate::core::i2c::SimulatedClearpad;

mod helpers;
mod registration;
