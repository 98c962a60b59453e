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

//! Input board bring-up tool
//!
//! Runs fingerprint module detection against `/dev/mem` or a simulated TLMM
//! block, and drives the ClearPad I2C driver against simulated controllers
//! declared in a board file.

use clap::{Parser, Subcommand, ValueEnum};
use input_shim::core::clearpad::{ClearpadBus, ClearpadI2c};
use input_shim::core::config::BoardConfig;
use input_shim::core::error::DriverError;
use input_shim::core::fpdetect::{FpDetector, FpHwType, ThreadDelay};
use input_shim::core::i2c::SimulatedClearpad;
use input_shim::core::mmio::SimulatedTlmm;
use input_shim::core::platform::{self, InitMode};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Slave address used when no board file is given
const DEFAULT_ADDRESS: u16 = 0x2c;

/// Input driver shim for MSM boards
#[derive(Parser)]
#[command(name = "input-shim")]
#[command(about = "Fingerprint detection and ClearPad I2C transport tool", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect the installed fingerprint module
    FpDetect {
        /// Physical memory device
        #[arg(long)]
        mem: Option<PathBuf>,

        /// Use a simulated TLMM block with the strap pin at this level
        #[arg(long, value_enum)]
        simulate: Option<Level>,

        /// Settle delay in milliseconds
        #[arg(long)]
        settle_ms: Option<u64>,

        /// Board file (falls back to INPUT_SHIM_CONFIG)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },

    /// Declare the board's clients and register the ClearPad driver
    Probe {
        /// Board file (falls back to INPUT_SHIM_CONFIG)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Register on a worker thread, as a built-in driver would
        #[arg(long = "async")]
        asynchronous: bool,

        /// Print the client report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read paged registers from a simulated controller
    Read {
        /// Paged register address (hex with 0x prefix, or decimal)
        #[arg(short, long, value_parser = parse_addr)]
        addr: u16,

        /// Number of bytes
        #[arg(short = 'n', long, default_value = "1")]
        len: usize,

        /// Use SMBus block reads
        #[arg(long)]
        block: bool,

        /// Board file seeding the controller
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },

    /// Write paged registers on a simulated controller and read them back
    Write {
        /// Paged register address (hex with 0x prefix, or decimal)
        #[arg(short, long, value_parser = parse_addr)]
        addr: u16,

        /// Bytes to write, in hex
        #[arg(short, long, num_args = 1.., required = true, value_parser = parse_byte)]
        data: Vec<u8>,

        /// Send the page register and payload as one message
        #[arg(long)]
        block: bool,

        /// Board file seeding the controller
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    High,
    Low,
}

fn parse_addr(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", s, e))
}

fn parse_byte(s: &str) -> Result<u8, String> {
    let hex = s.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(hex, 16).map_err(|e| format!("invalid byte '{}': {}", s, e))
}

fn load_config(explicit: Option<&Path>) -> input_shim::core::Result<Option<BoardConfig>> {
    BoardConfig::resolve_path(explicit)
        .map(BoardConfig::load)
        .transpose()
}

/// Controller of the first declared client, or a blank one
fn simulator(config: Option<&BoardConfig>) -> SimulatedClearpad {
    config
        .and_then(|config| config.clients.first())
        .map(|client| client.simulator())
        .unwrap_or_else(|| SimulatedClearpad::new(DEFAULT_ADDRESS))
}

fn hex_dump(addr: u16, data: &[u8]) {
    for (row, chunk) in data.chunks(16).enumerate() {
        let bytes: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        println!("{:04x}: {}", addr as usize + row * 16, bytes.join(" "));
    }
}

fn fp_detect(
    mem: Option<PathBuf>,
    simulate: Option<Level>,
    settle_ms: Option<u64>,
    config: Option<&Path>,
) -> Result<FpHwType, Box<dyn std::error::Error>> {
    let fp = load_config(config)?
        .map(|config| config.fp_detect)
        .unwrap_or_default();
    let settle = settle_ms.map_or_else(|| fp.settle(), Duration::from_millis);

    let hw_type = match simulate {
        Some(level) => {
            info!("Using simulated TLMM block at 0x{:08X}", fp.base);
            let tlmm = SimulatedTlmm::new(fp.base, fp.size, matches!(level, Level::High));
            FpDetector::new(tlmm, ThreadDelay)
                .with_window(fp.base, fp.size)
                .with_settle(settle)
                .detect()?
        }
        None => detect_devmem(mem.unwrap_or(fp.mem_path), fp.base, fp.size, settle)?,
    };

    Ok(hw_type)
}

#[cfg(unix)]
fn detect_devmem(
    path: PathBuf,
    base: u64,
    size: u32,
    settle: Duration,
) -> input_shim::core::Result<FpHwType> {
    use input_shim::core::mmio::DevMem;

    info!("Mapping TLMM block through {}", path.display());
    FpDetector::new(DevMem::new(path), ThreadDelay)
        .with_window(base, size)
        .with_settle(settle)
        .detect()
}

#[cfg(not(unix))]
fn detect_devmem(
    path: PathBuf,
    _base: u64,
    _size: u32,
    _settle: Duration,
) -> input_shim::core::Result<FpHwType> {
    Err(DriverError::NoDevice(format!(
        "{}: physical memory access needs a unix host",
        path.display()
    )))
}

fn probe(
    config: Option<&Path>,
    asynchronous: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?.ok_or_else(|| {
        DriverError::Config("no board file: pass --config or set INPUT_SHIM_CONFIG".to_string())
    })?;

    let (core, _sims) = config.build_core();
    let core = core.shared();

    let mode = if asynchronous {
        InitMode::BuiltinAsync
    } else {
        InitMode::Module
    };
    info!("Registering ClearPad I2C driver ({:?})", mode);

    if let Some(handle) = platform::init(&core, mode)? {
        if handle.join().is_err() {
            error!("Registration worker panicked");
        }
    }

    let report = core
        .lock()
        .map_err(|_| DriverError::Config("I2C core lock poisoned".to_string()))?
        .report();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for client in &report {
            match (&client.platform_device, &client.active_panel) {
                (Some(pdev), Some(panel)) => println!(
                    "{}: bound, {} (panel {}, irq gpio {})",
                    client.dev_name,
                    pdev,
                    panel,
                    client
                        .irq_gpio
                        .map_or_else(|| "none".to_string(), |pin| pin.to_string())
                ),
                _ => println!("{}: unbound", client.dev_name),
            }
        }
    }

    platform::exit(&core)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize logger with default level INFO
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("input-shim v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    match args.command {
        Command::FpDetect {
            mem,
            simulate,
            settle_ms,
            config,
        } => {
            let hw_type = fp_detect(mem, simulate, settle_ms, config.as_deref()).inspect_err(
                |e| error!("Fingerprint detection failed: {}", e),
            )?;
            println!("{} ({})", hw_type, hw_type.as_raw());
        }
        Command::Probe {
            config,
            asynchronous,
            json,
        } => probe(config.as_deref(), asynchronous, json)?,
        Command::Read {
            addr,
            len,
            block,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let bus = ClearpadI2c::new(simulator(config.as_ref()));
            let mut buf = vec![0u8; len];
            let got = if block {
                bus.read_block(addr, &mut buf)?
            } else {
                bus.read(addr, &mut buf)?
            };
            hex_dump(addr, &buf[..got]);
        }
        Command::Write {
            addr,
            data,
            block,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let bus = ClearpadI2c::new(simulator(config.as_ref()));
            let sent = if block {
                bus.write_block(addr, &data)?
            } else {
                bus.write(addr, &data)?
            };
            info!("Wrote {} bytes at 0x{:04x}", sent, addr);

            let mut readback = vec![0u8; data.len()];
            bus.read(addr, &mut readback)?;
            hex_dump(addr, &readback);
        }
    }

    Ok(())
}
