// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! I2C module tests
//!
//! This module organizes I2C tests into logical categories:
//! - `sim`: Simulated controller register model and bus primitives
//! - `faults`: Fault injection and short transfer emulation

use super::*;

mod faults;
