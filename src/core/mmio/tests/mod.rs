// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Register window tests
//!
//! - `window`: Access validation shared by all windows
//! - `tlmm`: Simulated TLMM block behavior
//! - `devmem`: File-backed mapper

use super::*;
