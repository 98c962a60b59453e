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

//! Board configuration
//!
//! Describes a board the way its device tree and board file would: the
//! display panels whose drivers bound, the I2C clients with their nodes,
//! and where the TLMM block lives. Clients are backed by simulated
//! controllers whose register space can be seeded from the file.
//!
//! # Example
//!
//! ```
//! use input_shim::core::config::BoardConfig;
//!
//! let config = BoardConfig::parse(r#"
//!     panels = ["panel-tianma"]
//!
//!     [[clients]]
//!     name = "clearpad_i2c"
//!     address = 0x2c
//!
//!     [clients.of_node]
//!     name = "touchscreen@2c"
//!     compatible = ["synaptics,clearpad"]
//!
//!     [clients.of_node.properties]
//!     panel = { phandles = ["panel-tianma"] }
//! "#).unwrap();
//!
//! assert_eq!(config.clients[0].address, 0x2c);
//! ```

use crate::core::error::{DriverError, Result};
use crate::core::fpdetect::{MSM_TLMM_GPIO14_BASE, MSM_TLMM_SIZE, SETTLE_DELAY};
use crate::core::i2c::SimulatedClearpad;
use crate::core::platform::{boxed, BoardInfo, DeviceNode, I2cCore, PlatformData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the board file
pub const CONFIG_ENV: &str = "INPUT_SHIM_CONFIG";

/// Default physical memory device
pub const DEFAULT_MEM_PATH: &str = "/dev/mem";

/// Highest 7-bit slave address
const I2C_ADDR_MAX: u16 = 0x7F;

/// Bytes preloaded into a simulated controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSeed {
    /// Paged address of the first byte
    pub addr: u16,
    pub data: Vec<u8>,
}

/// One I2C client declared by the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub name: String,
    pub address: u16,
    #[serde(default)]
    pub of_node: Option<DeviceNode>,
    #[serde(default)]
    pub platform_data: Option<PlatformData>,
    #[serde(default)]
    pub registers: Vec<RegisterSeed>,
}

impl ClientConfig {
    /// Board info handed to the I2C core
    pub fn board_info(&self) -> BoardInfo {
        BoardInfo {
            name: self.name.clone(),
            address: self.address,
            of_node: self.of_node.clone(),
            platform_data: self.platform_data.clone(),
        }
    }

    /// Simulated controller answering at this client's address
    pub fn simulator(&self) -> SimulatedClearpad {
        let sim = SimulatedClearpad::with_name(self.address, &self.name);
        for seed in &self.registers {
            sim.poke(seed.addr, &seed.data);
        }
        sim
    }
}

/// Location of the GPIO14 TLMM block and detection timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpDetectConfig {
    /// Physical base address
    pub base: u64,
    /// Window size in bytes
    pub size: u32,
    pub settle_ms: u64,
    /// Physical memory device
    pub mem_path: PathBuf,
}

impl Default for FpDetectConfig {
    fn default() -> Self {
        Self {
            base: MSM_TLMM_GPIO14_BASE,
            size: MSM_TLMM_SIZE,
            settle_ms: SETTLE_DELAY.as_millis() as u64,
            mem_path: PathBuf::from(DEFAULT_MEM_PATH),
        }
    }
}

impl FpDetectConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Whole board description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Panel nodes whose drivers are bound
    #[serde(default)]
    pub panels: Vec<String>,
    #[serde(default)]
    pub clients: Vec<ClientConfig>,
    #[serde(default)]
    pub fp_detect: FpDetectConfig,
}

impl BoardConfig {
    /// Parse and validate a board file's contents
    ///
    /// # Errors
    ///
    /// - `Parse` on malformed TOML or mismatched types
    /// - `Config` if a client address does not fit 7 bits or is declared
    ///   twice
    pub fn parse(data: &str) -> Result<Self> {
        let config: BoardConfig = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a board file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading board config from {}", path.display());
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
    }

    /// Board file to use: the explicit path, else `INPUT_SHIM_CONFIG`
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        resolve_path_with(explicit, env::var_os(CONFIG_ENV))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for client in &self.clients {
            if client.address > I2C_ADDR_MAX {
                return Err(DriverError::Config(format!(
                    "{}: address {:#x} is not a 7-bit address",
                    client.name, client.address
                )));
            }
            if !seen.insert(client.address) {
                return Err(DriverError::Config(format!(
                    "address {:#04x} declared twice",
                    client.address
                )));
            }
        }
        Ok(())
    }

    /// Build an I2C core with the panels registered and every client
    /// declared, each backed by a simulated controller
    ///
    /// The simulators are returned in client order so callers can inspect
    /// the register space after driving the bus.
    pub fn build_core(&self) -> (I2cCore, Vec<SimulatedClearpad>) {
        let mut core = I2cCore::new();
        for panel in &self.panels {
            core.panels_mut().register(panel.as_str());
        }

        let sims = self
            .clients
            .iter()
            .map(|client| {
                let sim = client.simulator();
                core.new_client(client.board_info(), boxed(sim.clone()));
                sim
            })
            .collect();

        (core, sims)
    }
}

fn resolve_path_with(explicit: Option<&Path>, from_env: Option<OsString>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| from_env.filter(|v| !v.is_empty()).map(PathBuf::from))
}
