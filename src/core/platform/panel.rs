// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Display panel lookup
//!
//! A touchscreen node lists every panel the board may ship with. Only the
//! panel whose driver actually bound is present in the registry, and the
//! touch controller follows that one.

use super::devicetree::DeviceNode;
use crate::core::error::{DriverError, Result};
use std::collections::BTreeSet;

/// Property listing candidate panels
pub const PANEL_PROPERTY: &str = "panel";

/// Set of display panels registered by their drivers
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    panels: BTreeSet<String>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a panel node. Returns false if it was already present.
    pub fn register(&mut self, node_name: impl Into<String>) -> bool {
        self.panels.insert(node_name.into())
    }

    /// Remove a panel node. Returns false if it was not present.
    pub fn unregister(&mut self, node_name: &str) -> bool {
        self.panels.remove(node_name)
    }

    /// Look up a panel by node name
    pub fn find(&self, node_name: &str) -> Option<&str> {
        self.panels.get(node_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

/// Pick the first panel listed by `node` that is registered
///
/// # Errors
///
/// - `InvalidArgument` if the node lists no panels
/// - `NoDevice` if none of the listed panels is registered
pub fn find_active_panel(node: &DeviceNode, registry: &PanelRegistry) -> Result<String> {
    let count = node.count_phandles(PANEL_PROPERTY).unwrap_or(0);
    if count == 0 {
        return Err(DriverError::InvalidArgument(format!(
            "{}: no {} phandles",
            node.name, PANEL_PROPERTY
        )));
    }

    (0..count)
        .filter_map(|i| node.parse_phandle(PANEL_PROPERTY, i))
        .find_map(|target| registry.find(target))
        .map(str::to_string)
        .ok_or_else(|| DriverError::NoDevice(format!("{}: no registered panel", node.name)))
}
