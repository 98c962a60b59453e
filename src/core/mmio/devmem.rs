// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! `/dev/mem` backed register windows
//!
//! Each access is a positional 4-byte read or write on the memory device at
//! `base + offset`, little endian, so no mapping has to be kept alive
//! between accesses. Any file with the same layout works, which is how the
//! tests exercise this mapper.

use super::{check_access, MemoryMapper, RegisterWindow};
use crate::core::error::Result;
use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

/// Mapper over a physical memory device file
#[derive(Debug, Clone)]
pub struct DevMem {
    path: PathBuf,
}

impl DevMem {
    /// Default physical memory device
    pub const DEFAULT_PATH: &'static str = "/dev/mem";

    /// Create a mapper over the memory device at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the memory device
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for DevMem {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl MemoryMapper for DevMem {
    fn map(&mut self, phys: u64, size: u32) -> Result<Box<dyn RegisterWindow>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .inspect_err(|e| {
                log::error!("Failed to open {}: {}", self.path.display(), e);
            })?;

        log::trace!(
            "Mapped 0x{:08X}..0x{:08X} via {}",
            phys,
            phys + size as u64,
            self.path.display()
        );

        Ok(Box::new(DevMemWindow {
            file,
            base: phys,
            size,
        }))
    }
}

struct DevMemWindow {
    file: File,
    base: u64,
    size: u32,
}

impl RegisterWindow for DevMemWindow {
    fn base(&self) -> u64 {
        self.base
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn read32_relaxed(&self, offset: u32) -> Result<u32> {
        check_access(offset, self.size)?;
        let mut bytes = [0u8; 4];
        self.file
            .read_exact_at(&mut bytes, self.base + offset as u64)?;
        Ok(u32::from_le_bytes(bytes))
    }

    fn write32_relaxed(&mut self, offset: u32, value: u32) -> Result<()> {
        check_access(offset, self.size)?;
        self.file
            .write_all_at(&value.to_le_bytes(), self.base + offset as u64)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "DevMem"
    }
}

impl Drop for DevMemWindow {
    fn drop(&mut self) {
        log::trace!("Unmapped 0x{:08X}", self.base);
    }
}
