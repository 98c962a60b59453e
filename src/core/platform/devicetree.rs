// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Device tree nodes
//!
//! Just enough of a device tree node for the bindings the ClearPad driver
//! reads: a compatible list and named properties holding GPIO specifiers,
//! phandle lists, strings or cells. Phandles are represented by the name of
//! the node they point at.
//!
//! Nodes deserialize from the board configuration:
//!
//! ```toml
//! name = "touchscreen@2c"
//! compatible = ["synaptics,clearpad"]
//!
//! [properties]
//! "synaptics,irq_gpio" = { gpios = [{ pin = 58, flags = "ACTIVE_LOW" }] }
//! panel = { phandles = ["panel-boe", "panel-tianma"] }
//! ```

use crate::core::error::{DriverError, Result};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

bitflags! {
    /// GPIO specifier flags (dt-bindings/gpio/gpio.h)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct GpioFlags: u32 {
        const ACTIVE_LOW = 1 << 0;
        const SINGLE_ENDED = 1 << 1;
        const LINE_OPEN_DRAIN = 1 << 2;
        const TRANSITORY = 1 << 3;
        const PULL_UP = 1 << 4;
        const PULL_DOWN = 1 << 5;

        const OPEN_DRAIN = Self::SINGLE_ENDED.bits() | Self::LINE_OPEN_DRAIN.bits();
        const OPEN_SOURCE = Self::SINGLE_ENDED.bits();
    }
}

/// One `<&gpio pin flags>` specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpioSpec {
    pub pin: u32,
    #[serde(default)]
    pub flags: GpioFlags,
}

/// Typed property value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Gpios(Vec<GpioSpec>),
    Phandles(Vec<String>),
    String(String),
    U32(u32),
}

/// Device tree node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceNode {
    pub name: String,
    #[serde(default)]
    pub compatible: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
}

impl DeviceNode {
    /// Create a node with no properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: add a compatible string
    pub fn with_compatible(mut self, compatible: impl Into<String>) -> Self {
        self.compatible.push(compatible.into());
        self
    }

    /// Builder: set a property
    pub fn with_property(mut self, name: impl Into<String>, value: Property) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Check the node against a compatible string
    pub fn is_compatible(&self, compatible: &str) -> bool {
        self.compatible.iter().any(|c| c == compatible)
    }

    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Read the `index`th GPIO specifier of property `name`
    ///
    /// # Errors
    ///
    /// - `NotFound` if the property or the index does not exist
    /// - `InvalidArgument` if the property is not a GPIO list
    pub fn get_named_gpio_flags(&self, name: &str, index: usize) -> Result<(u32, GpioFlags)> {
        match self.property(name) {
            Some(Property::Gpios(specs)) => specs
                .get(index)
                .map(|spec| (spec.pin, spec.flags))
                .ok_or_else(|| {
                    DriverError::NotFound(format!("{}: {}[{}]", self.name, name, index))
                }),
            Some(_) => Err(DriverError::InvalidArgument(format!(
                "{}: {} is not a gpio list",
                self.name, name
            ))),
            None => Err(DriverError::NotFound(format!("{}: {}", self.name, name))),
        }
    }

    /// Count the phandles in property `name`
    ///
    /// # Errors
    ///
    /// - `NotFound` if the property does not exist
    /// - `InvalidArgument` if the property is not a phandle list
    pub fn count_phandles(&self, name: &str) -> Result<usize> {
        match self.property(name) {
            Some(Property::Phandles(targets)) => Ok(targets.len()),
            Some(_) => Err(DriverError::InvalidArgument(format!(
                "{}: {} is not a phandle list",
                self.name, name
            ))),
            None => Err(DriverError::NotFound(format!("{}: {}", self.name, name))),
        }
    }

    /// Resolve the `index`th phandle of property `name` to a node name
    pub fn parse_phandle(&self, name: &str, index: usize) -> Option<&str> {
        match self.property(name) {
            Some(Property::Phandles(targets)) => targets.get(index).map(String::as_str),
            _ => None,
        }
    }
}
