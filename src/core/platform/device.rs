// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Platform devices
//!
//! The I2C driver does not handle touch itself. It publishes a `clearpad`
//! platform device whose data carries the bus operations, and the core
//! touch driver binds to that device.

use super::driver::ClearpadData;
use crate::core::error::{DriverError, Result};
use std::collections::BTreeMap;

/// Device id meaning "only instance, no suffix"
pub const PLATFORM_DEVID_NONE: i32 = -1;

/// A platform device before or after registration
#[derive(Debug)]
pub struct PlatformDevice {
    name: String,
    id: i32,
    parent: Option<String>,
    data: Option<ClearpadData>,
}

impl PlatformDevice {
    /// Allocate an unregistered device
    pub fn alloc(name: impl Into<String>, id: i32) -> Self {
        Self {
            name: name.into(),
            id,
            parent: None,
            data: None,
        }
    }

    /// Set the parent device name
    pub fn set_parent(&mut self, parent: impl Into<String>) {
        self.parent = Some(parent.into());
    }

    /// Attach platform data
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if data was attached before.
    pub fn add_data(&mut self, data: ClearpadData) -> Result<()> {
        if self.data.is_some() {
            return Err(DriverError::AlreadyExists(format!(
                "{}: platform data",
                self.dev_name()
            )));
        }
        self.data = Some(data);
        Ok(())
    }

    /// Device name as it appears on the bus: `name` or `name.id`
    pub fn dev_name(&self) -> String {
        if self.id == PLATFORM_DEVID_NONE {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.id)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn data(&self) -> Option<&ClearpadData> {
        self.data.as_ref()
    }
}

/// Handle to a registered platform device
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DeviceHandle {
    dev_name: String,
}

impl DeviceHandle {
    pub fn dev_name(&self) -> &str {
        &self.dev_name
    }
}

/// Registry of platform devices
#[derive(Debug, Default)]
pub struct PlatformBus {
    devices: BTreeMap<String, PlatformDevice>,
}

impl PlatformBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pdev`
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a device with the same name and id is
    /// registered; `pdev` is dropped in that case.
    pub fn add(&mut self, pdev: PlatformDevice) -> Result<DeviceHandle> {
        let dev_name = pdev.dev_name();
        if self.devices.contains_key(&dev_name) {
            log::error!("platform device {} already registered", dev_name);
            return Err(DriverError::AlreadyExists(dev_name));
        }

        log::info!(
            "platform device {} registered (parent {})",
            dev_name,
            pdev.parent().unwrap_or("none")
        );
        self.devices.insert(dev_name.clone(), pdev);
        Ok(DeviceHandle { dev_name })
    }

    /// Unregister a device, handing it back
    pub fn unregister(&mut self, handle: &DeviceHandle) -> Result<PlatformDevice> {
        let pdev = self
            .devices
            .remove(&handle.dev_name)
            .ok_or_else(|| DriverError::NotFound(handle.dev_name.clone()))?;
        log::info!("platform device {} unregistered", handle.dev_name);
        Ok(pdev)
    }

    /// Look up a registered device by bus name
    pub fn get(&self, dev_name: &str) -> Option<&PlatformDevice> {
        self.devices.get(dev_name)
    }

    /// Registered devices in name order
    pub fn devices(&self) -> impl Iterator<Item = &PlatformDevice> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
