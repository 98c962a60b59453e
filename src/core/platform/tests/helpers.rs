// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Helper functions for driver-core tests

use super::*;

/// Touchscreen node with an IRQ GPIO and two candidate panels
pub fn touch_node() -> DeviceNode {
    DeviceNode::new("touchscreen@2c")
        .with_compatible("synaptics,clearpad")
        .with_property(
            "synaptics,irq_gpio",
            Property::Gpios(vec![GpioSpec {
                pin: 58,
                flags: GpioFlags::ACTIVE_LOW,
            }]),
        )
        .with_property(
            "panel",
            Property::Phandles(vec!["panel-boe".to_string(), "panel-tianma".to_string()]),
        )
}

/// Board info for a device tree described controller at 0x2c
pub fn touch_board_info() -> BoardInfo {
    BoardInfo {
        name: "clearpad_i2c".to_string(),
        address: 0x2c,
        of_node: Some(touch_node()),
        platform_data: None,
    }
}

/// Panel registry with only the second candidate panel bound
pub fn panels() -> PanelRegistry {
    let mut panels = PanelRegistry::new();
    panels.register("panel-tianma");
    panels
}
