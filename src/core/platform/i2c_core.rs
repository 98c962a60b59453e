// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! I2C core model
//!
//! Holds the clients declared by the board, the ClearPad driver once it is
//! registered, and the platform bus and panel registry probes run against.
//! Registering the driver probes every matching unbound client; declaring
//! a client while the driver is registered probes it immediately.
//!
//! ## Driver Registration
//!
//! | Mode           | Behavior                                          |
//! |----------------|---------------------------------------------------|
//! | `Module`       | register now, return the result to the caller     |
//! | `BuiltinAsync` | register on a worker thread, log failures there   |

use super::device::PlatformBus;
use super::driver::{BoardInfo, ClearpadI2cDevice, ClearpadI2cDriver, ProbeContext};
use super::panel::PanelRegistry;
use crate::core::error::{DriverError, Result};
use crate::core::i2c::DynI2cClient;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// How the driver gets registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMode {
    /// Loadable module: register synchronously
    #[default]
    Module,
    /// Built into the image: register asynchronously, late in boot
    BuiltinAsync,
}

struct ClientEntry {
    info: BoardInfo,
    client: Option<DynI2cClient>,
    bound: Option<ClearpadI2cDevice>,
}

/// Per-client state for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientReport {
    pub dev_name: String,
    pub bound: bool,
    pub platform_device: Option<String>,
    pub active_panel: Option<String>,
    pub irq_gpio: Option<u32>,
}

/// Model of the I2C core and the buses hanging off it
#[derive(Default)]
pub struct I2cCore {
    clients: Vec<ClientEntry>,
    driver: Option<ClearpadI2cDriver>,
    panels: PanelRegistry,
    platform: PlatformBus,
}

impl I2cCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in the shared handle used for asynchronous registration
    pub fn shared(self) -> Arc<Mutex<I2cCore>> {
        Arc::new(Mutex::new(self))
    }

    pub fn panels(&self) -> &PanelRegistry {
        &self.panels
    }

    pub fn panels_mut(&mut self) -> &mut PanelRegistry {
        &mut self.panels
    }

    pub fn platform(&self) -> &PlatformBus {
        &self.platform
    }

    /// Declare a client, returning its index
    ///
    /// If the driver is registered and matches, the client is probed right
    /// away. A failed probe leaves the client declared but unbound.
    pub fn new_client(&mut self, info: BoardInfo, client: DynI2cClient) -> usize {
        log::info!("i2c: new client {}", info.dev_name());
        self.clients.push(ClientEntry {
            info,
            client: Some(client),
            bound: None,
        });
        let index = self.clients.len() - 1;
        if let Some(driver) = self.driver {
            // Already logged, the client stays declared
            self.try_probe(driver, index).ok();
        }
        index
    }

    /// Register the ClearPad driver and probe every matching client
    ///
    /// # Returns
    ///
    /// Number of clients bound by this registration
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the driver is already registered. Probe
    /// failures are logged and do not fail registration.
    pub fn add_driver(&mut self, driver: ClearpadI2cDriver) -> Result<usize> {
        if self.driver.is_some() {
            return Err(DriverError::AlreadyExists(
                ClearpadI2cDriver::NAME.to_string(),
            ));
        }
        self.driver = Some(driver);
        log::info!("i2c: driver {} registered", ClearpadI2cDriver::NAME);

        let mut bound = 0;
        for index in 0..self.clients.len() {
            if self.try_probe(driver, index).is_ok_and(|probed| probed) {
                bound += 1;
            }
        }
        Ok(bound)
    }

    /// Unregister the driver, removing every bound device
    pub fn del_driver(&mut self) -> Result<()> {
        let driver = self
            .driver
            .take()
            .ok_or_else(|| DriverError::NotFound(ClearpadI2cDriver::NAME.to_string()))?;

        for entry in &mut self.clients {
            let Some(device) = entry.bound.take() else {
                continue;
            };
            let mut ctx = ProbeContext {
                panels: &self.panels,
                platform: &mut self.platform,
            };
            match driver.remove(device, &mut ctx) {
                Ok(client) => entry.client = client,
                Err(e) => log::error!("{}: remove failed: {}", entry.info.dev_name(), e),
            }
        }

        log::info!("i2c: driver {} unregistered", ClearpadI2cDriver::NAME);
        Ok(())
    }

    /// Probe one client if it matches and is free
    ///
    /// Returns `Ok(false)` when the client was skipped.
    fn try_probe(&mut self, driver: ClearpadI2cDriver, index: usize) -> Result<bool> {
        let entry = &mut self.clients[index];
        if entry.bound.is_some() || entry.client.is_none() || !driver.matches(&entry.info) {
            return Ok(false);
        }

        let mut ctx = ProbeContext {
            panels: &self.panels,
            platform: &mut self.platform,
        };
        match driver.probe(&entry.info, &mut entry.client, &mut ctx) {
            Ok(device) => {
                entry.bound = Some(device);
                Ok(true)
            }
            Err(e) => {
                log::error!(
                    "{}: probe of {} failed with error {}",
                    ClearpadI2cDriver::NAME,
                    entry.info.dev_name(),
                    e.errno()
                );
                Err(e)
            }
        }
    }

    /// Is the driver registered
    pub fn driver_registered(&self) -> bool {
        self.driver.is_some()
    }

    /// Bound device for client `index`
    pub fn bound(&self, index: usize) -> Option<&ClearpadI2cDevice> {
        self.clients.get(index).and_then(|entry| entry.bound.as_ref())
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Snapshot of every declared client
    pub fn report(&self) -> Vec<ClientReport> {
        self.clients
            .iter()
            .map(|entry| {
                let bound = entry.bound.as_ref();
                let pdata = bound
                    .and_then(|device| self.platform.get(device.platform_device().dev_name()))
                    .and_then(|pdev| pdev.data())
                    .and_then(|data| data.pdata.as_ref());
                ClientReport {
                    dev_name: entry.info.dev_name(),
                    bound: bound.is_some(),
                    platform_device: bound
                        .map(|device| device.platform_device().dev_name().to_string()),
                    active_panel: bound.map(|device| device.active_panel().to_string()),
                    irq_gpio: pdata.and_then(|pdata| pdata.irq_gpio),
                }
            })
            .collect()
    }
}

fn lock(core: &Mutex<I2cCore>) -> MutexGuard<'_, I2cCore> {
    core.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Register the ClearPad I2C driver with `core`
///
/// In `Module` mode the registration result is returned and no handle is
/// produced. In `BuiltinAsync` mode registration runs on a worker thread
/// whose handle is returned; its failures are only logged.
pub fn init(core: &Arc<Mutex<I2cCore>>, mode: InitMode) -> Result<Option<JoinHandle<()>>> {
    match mode {
        InitMode::Module => {
            lock(core).add_driver(ClearpadI2cDriver::new())?;
            Ok(None)
        }
        InitMode::BuiltinAsync => {
            let core = Arc::clone(core);
            let handle = thread::Builder::new()
                .name("clearpad-i2c-init".to_string())
                .spawn(move || {
                    if let Err(e) = lock(&core).add_driver(ClearpadI2cDriver::new()) {
                        log::error!("Clearpad I2C registration failed rc = {}", e.errno());
                    }
                })?;
            Ok(Some(handle))
        }
    }
}

/// Unregister the ClearPad I2C driver from `core`
pub fn exit(core: &Arc<Mutex<I2cCore>>) -> Result<()> {
    lock(core).del_driver()
}
