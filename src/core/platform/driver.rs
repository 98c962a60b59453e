// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! ClearPad I2C driver
//!
//! Probe builds the paged transport for a matched I2C client and publishes
//! it to the core touch driver through a `clearpad` platform device.
//! Remove tears that device down again and hands the client back.
//!
//! ## Probe Sequence
//!
//! 1. Resolve the active display panel from the node's `panel` phandles
//! 2. Read platform data from the node, or take the board-supplied data
//! 3. Wrap the client in a [`ClearpadI2c`] transport (page cache at 0)
//! 4. Allocate the `clearpad` platform device, parent it to the client,
//!    attach [`ClearpadData`] and register it
//!
//! A failure in any step releases everything built before it.

use super::device::{DeviceHandle, PlatformBus, PlatformDevice, PLATFORM_DEVID_NONE};
use super::devicetree::{DeviceNode, GpioFlags};
use super::panel::{find_active_panel, PanelRegistry};
use crate::core::clearpad::{
    ClearpadBus, ClearpadI2c, CLEARPAD_COMPATIBLE, CLEARPAD_I2C_NAME, CLEARPAD_NAME,
};
use crate::core::error::{DriverError, Result};
use crate::core::i2c::{DynI2cClient, I2cClient};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Property holding the attention interrupt GPIO
pub const IRQ_GPIO_PROPERTY: &str = "synaptics,irq_gpio";

/// Board data consumed by the core touch driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformData {
    /// Attention line, `None` when the node does not describe one
    #[serde(default)]
    pub irq_gpio: Option<u32>,
    #[serde(default)]
    pub irq_gpio_flags: GpioFlags,
}

/// Static description of an I2C client, as a board file would declare it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInfo {
    /// Device type used for id table matching
    pub name: String,
    /// 7-bit slave address
    pub address: u16,
    #[serde(default)]
    pub of_node: Option<DeviceNode>,
    #[serde(default)]
    pub platform_data: Option<PlatformData>,
}

impl BoardInfo {
    /// Client device name, `<name>@<address>`
    pub fn dev_name(&self) -> String {
        format!("{}@{:#04x}", self.name, self.address)
    }
}

/// Payload of the `clearpad` platform device
#[derive(Clone)]
pub struct ClearpadData {
    pub pdata: Option<PlatformData>,
    pub bus: Arc<dyn ClearpadBus>,
    pub probe_retry: u32,
    pub active_panel: String,
    pub of_node: Option<DeviceNode>,
}

impl fmt::Debug for ClearpadData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClearpadData")
            .field("pdata", &self.pdata)
            .field("bustype", &self.bus.bustype())
            .field("probe_retry", &self.probe_retry)
            .field("active_panel", &self.active_panel)
            .field("of_node", &self.of_node.as_ref().map(|n| n.name.as_str()))
            .finish()
    }
}

/// Environment a probe or remove runs in
pub struct ProbeContext<'a> {
    pub panels: &'a PanelRegistry,
    pub platform: &'a mut PlatformBus,
}

/// A client bound to the driver
pub struct ClearpadI2cDevice {
    transport: Arc<ClearpadI2c<DynI2cClient>>,
    pdev: DeviceHandle,
    active_panel: String,
}

impl ClearpadI2cDevice {
    /// Bus operations of the bound client
    pub fn bus(&self) -> Arc<dyn ClearpadBus> {
        self.transport.clone()
    }

    /// Handle of the published platform device
    pub fn platform_device(&self) -> &DeviceHandle {
        &self.pdev
    }

    pub fn active_panel(&self) -> &str {
        &self.active_panel
    }
}

/// The ClearPad I2C driver
#[derive(Debug, Default, Clone, Copy)]
pub struct ClearpadI2cDriver;

impl ClearpadI2cDriver {
    /// Driver name
    pub const NAME: &'static str = CLEARPAD_I2C_NAME;

    /// I2C device ids handled by the driver
    pub const ID_TABLE: &'static [&'static str] = &[CLEARPAD_I2C_NAME];

    /// Device tree compatibles handled by the driver
    pub const OF_MATCH_TABLE: &'static [&'static str] = &[CLEARPAD_COMPATIBLE];

    pub fn new() -> Self {
        Self
    }

    /// Decide whether the driver handles `info`
    ///
    /// The node's compatible list is tried first, then the device name
    /// against the id table.
    pub fn matches(&self, info: &BoardInfo) -> bool {
        let of_match = info.of_node.as_ref().is_some_and(|node| {
            Self::OF_MATCH_TABLE
                .iter()
                .any(|compatible| node.is_compatible(compatible))
        });
        of_match || Self::ID_TABLE.contains(&info.name.as_str())
    }

    /// Bind the client in `slot`
    ///
    /// The client is taken out of `slot` for the lifetime of the binding.
    /// On failure it is put back so a later probe can retry.
    pub fn probe(
        &self,
        info: &BoardInfo,
        slot: &mut Option<DynI2cClient>,
        ctx: &mut ProbeContext<'_>,
    ) -> Result<ClearpadI2cDevice> {
        let dev_name = info.dev_name();

        let active_panel = match info.of_node.as_ref() {
            Some(node) => find_active_panel(node, ctx.panels),
            None => Err(DriverError::InvalidArgument(format!(
                "{}: no device tree node",
                dev_name
            ))),
        }
        .map_err(|e| {
            log::error!(
                "{}: Active panel not found, aborting probe ({})",
                dev_name,
                e
            );
            DriverError::NoDevice(format!("{}: active panel", dev_name))
        })?;

        let pdata = match info.of_node.as_ref() {
            Some(node) => Some(Self::parse_dt(node)),
            None => info.platform_data.clone(),
        };

        let client = slot
            .take()
            .ok_or_else(|| DriverError::NoDevice(format!("{}: client in use", dev_name)))?;
        let transport = Arc::new(ClearpadI2c::new(client));

        let data = ClearpadData {
            pdata,
            bus: transport.clone(),
            probe_retry: 0,
            active_panel: active_panel.clone(),
            of_node: info.of_node.clone(),
        };

        let mut pdev = PlatformDevice::alloc(CLEARPAD_NAME, PLATFORM_DEVID_NONE);
        pdev.set_parent(dev_name.as_str());

        let registered = pdev
            .add_data(data)
            .and_then(|()| ctx.platform.add(pdev));

        match registered {
            Ok(handle) => {
                log::info!("{}: probe: success", dev_name);
                Ok(ClearpadI2cDevice {
                    transport,
                    pdev: handle,
                    active_panel,
                })
            }
            Err(e) => {
                log::error!("{}: probe failed: {}", dev_name, e);
                *slot = Self::release(&dev_name, transport);
                Err(e)
            }
        }
    }

    /// Unbind a device, returning its client when no one else holds the bus
    pub fn remove(
        &self,
        device: ClearpadI2cDevice,
        ctx: &mut ProbeContext<'_>,
    ) -> Result<Option<DynI2cClient>> {
        let dev_name = device.transport.device().to_string();

        // Dropping the platform device drops its reference to the bus
        ctx.platform.unregister(&device.pdev)?;

        Ok(Self::release(&dev_name, device.transport))
    }

    fn parse_dt(node: &DeviceNode) -> PlatformData {
        match node.get_named_gpio_flags(IRQ_GPIO_PROPERTY, 0) {
            Ok((pin, flags)) => PlatformData {
                irq_gpio: Some(pin),
                irq_gpio_flags: flags,
            },
            Err(e) => {
                log::warn!("{}: no {}: {}", node.name, IRQ_GPIO_PROPERTY, e);
                PlatformData::default()
            }
        }
    }

    fn release(
        dev_name: &str,
        transport: Arc<ClearpadI2c<DynI2cClient>>,
    ) -> Option<DynI2cClient> {
        match Arc::try_unwrap(transport) {
            Ok(transport) => Some(transport.into_client()),
            Err(_) => {
                log::warn!("{}: bus still referenced, client not released", dev_name);
                None
            }
        }
    }
}

/// Convenience for callers holding a concrete client
pub fn boxed<C: I2cClient + Send + 'static>(client: C) -> DynI2cClient {
    Box::new(client)
}
