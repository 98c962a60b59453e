// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Driver error types
use thiserror::Error;

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;

/// Kernel errno values used at the driver boundary
pub mod errno {
    pub const ENOENT: i32 = 2;
    pub const EIO: i32 = 5;
    pub const ENOMEM: i32 = 12;
    pub const EEXIST: i32 = 17;
    pub const ENODEV: i32 = 19;
    pub const EINVAL: i32 = 22;
    pub const EREMOTEIO: i32 = 121;
}

/// Main error type for the driver shim
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Bus transfer failed: {op} (rc = {rc})")]
    Transfer { op: &'static str, rc: i32 },

    #[error("Short transfer during {op}: {got} of {expected} bytes")]
    ShortTransfer {
        op: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("No such device: {0}")]
    NoDevice(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Register access outside window at offset 0x{offset:X} (size 0x{size:X})")]
    WindowAccess { offset: u32, size: u32 },

    #[error("Unaligned register access at offset 0x{offset:X}")]
    UnalignedAccess { offset: u32 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriverError {
    /// Negative errno equivalent of this error
    ///
    /// Callers that sit on a kernel-style boundary (integer return codes)
    /// use this to report failures the way the I2C and platform cores do.
    ///
    /// # Example
    ///
    /// ```
    /// use input_shim::core::error::DriverError;
    ///
    /// let err = DriverError::NoDevice("panel".into());
    /// assert_eq!(err.errno(), -19);
    /// ```
    pub fn errno(&self) -> i32 {
        match self {
            DriverError::Transfer { rc, .. } if *rc < 0 => *rc,
            DriverError::Transfer { .. } | DriverError::ShortTransfer { .. } => -errno::EIO,
            DriverError::NoDevice(_) => -errno::ENODEV,
            DriverError::InvalidArgument(_)
            | DriverError::WindowAccess { .. }
            | DriverError::UnalignedAccess { .. }
            | DriverError::Config(_)
            | DriverError::Parse(_) => -errno::EINVAL,
            DriverError::OutOfMemory(_) => -errno::ENOMEM,
            DriverError::AlreadyExists(_) => -errno::EEXIST,
            DriverError::NotFound(_) => -errno::ENOENT,
            DriverError::Io(e) => e.raw_os_error().map(|code| -code).unwrap_or(-errno::EIO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_keeps_negative_rc() {
        let err = DriverError::Transfer {
            op: "smbus_read",
            rc: -errno::EREMOTEIO,
        };
        assert_eq!(err.errno(), -121);
    }

    #[test]
    fn test_short_transfer_is_eio() {
        let err = DriverError::ShortTransfer {
            op: "set_page",
            expected: 2,
            got: 1,
        };
        assert_eq!(err.errno(), -errno::EIO);
    }

    #[test]
    fn test_probe_errors() {
        assert_eq!(DriverError::NoDevice("x".into()).errno(), -19);
        assert_eq!(DriverError::InvalidArgument("x".into()).errno(), -22);
        assert_eq!(DriverError::OutOfMemory("x".into()).errno(), -12);
        assert_eq!(DriverError::AlreadyExists("x".into()).errno(), -17);
    }

    #[test]
    fn test_io_error_uses_os_code() {
        let err = DriverError::from(std::io::Error::from_raw_os_error(13));
        assert_eq!(err.errno(), -13);
    }

    #[test]
    fn test_display() {
        let err = DriverError::ShortTransfer {
            op: "read_block",
            expected: 1,
            got: 0,
        };
        assert_eq!(
            err.to_string(),
            "Short transfer during read_block: 0 of 1 bytes"
        );
    }
}
