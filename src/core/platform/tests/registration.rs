// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Driver registration tests

use super::helpers::*;
use super::*;
use crate::core::clearpad::CLEARPAD_NAME;

fn core_with_client() -> (I2cCore, usize) {
    let mut core = I2cCore::new();
    *core.panels_mut() = panels();
    let index = core.new_client(touch_board_info(), boxed(SimulatedClearpad::new(0x2c)));
    (core, index)
}

#[test]
fn test_add_driver_probes_existing_clients() {
    let (mut core, index) = core_with_client();

    assert_eq!(core.add_driver(ClearpadI2cDriver::new()).unwrap(), 1);
    assert!(core.bound(index).is_some());
    assert!(core.platform().get(CLEARPAD_NAME).is_some());
}

#[test]
fn test_new_client_probed_when_driver_registered() {
    let mut core = I2cCore::new();
    *core.panels_mut() = panels();
    core.add_driver(ClearpadI2cDriver::new()).unwrap();

    let index = core.new_client(touch_board_info(), boxed(SimulatedClearpad::new(0x2c)));
    assert!(core.bound(index).is_some());
}

#[test]
fn test_id_table_binds_client_with_foreign_compatible() {
    let mut core = I2cCore::new();
    *core.panels_mut() = panels();
    let mut info = touch_board_info();
    if let Some(node) = info.of_node.as_mut() {
        node.compatible = vec!["vendor,other".to_string()];
    }
    let index = core.new_client(info, boxed(SimulatedClearpad::new(0x2c)));

    assert_eq!(core.add_driver(ClearpadI2cDriver::new()).unwrap(), 1);
    assert_eq!(core.bound(index).unwrap().active_panel(), "panel-tianma");
}

#[test]
fn test_unmatched_client_left_alone() {
    let mut core = I2cCore::new();
    *core.panels_mut() = panels();
    let info = BoardInfo {
        name: "bq27xxx".to_string(),
        address: 0x55,
        of_node: None,
        platform_data: None,
    };
    let index = core.new_client(info, boxed(SimulatedClearpad::new(0x55)));

    assert_eq!(core.add_driver(ClearpadI2cDriver::new()).unwrap(), 0);
    assert!(core.bound(index).is_none());
}

#[test]
fn test_new_client_failing_probe_stays_declared() {
    let mut core = I2cCore::new();
    core.add_driver(ClearpadI2cDriver::new()).unwrap();

    // No panels registered
    let index = core.new_client(touch_board_info(), boxed(SimulatedClearpad::new(0x2c)));
    assert_eq!(core.client_count(), 1);
    assert!(core.bound(index).is_none());
    assert!(core.platform().is_empty());

    // Client was handed back, so a later registration binds it
    core.del_driver().unwrap();
    *core.panels_mut() = panels();
    assert_eq!(core.add_driver(ClearpadI2cDriver::new()).unwrap(), 1);
}

#[test]
fn test_failed_probe_does_not_fail_registration() {
    let mut core = I2cCore::new();
    let index = core.new_client(touch_board_info(), boxed(SimulatedClearpad::new(0x2c)));

    // No panels registered
    assert_eq!(core.add_driver(ClearpadI2cDriver::new()).unwrap(), 0);
    assert!(core.driver_registered());
    assert!(core.bound(index).is_none());
}

#[test]
fn test_double_registration() {
    let (mut core, _) = core_with_client();
    core.add_driver(ClearpadI2cDriver::new()).unwrap();

    let err = core.add_driver(ClearpadI2cDriver::new()).unwrap_err();
    assert_eq!(err.errno(), -17);
}

#[test]
fn test_del_driver_removes_devices_and_allows_rebind() {
    let (mut core, index) = core_with_client();
    core.add_driver(ClearpadI2cDriver::new()).unwrap();

    core.del_driver().unwrap();
    assert!(core.bound(index).is_none());
    assert!(core.platform().is_empty());
    assert!(!core.driver_registered());

    // Client was handed back, so it binds again
    assert_eq!(core.add_driver(ClearpadI2cDriver::new()).unwrap(), 1);
}

#[test]
fn test_del_driver_without_registration() {
    let mut core = I2cCore::new();
    assert_eq!(core.del_driver().unwrap_err().errno(), -2);
}

#[test]
fn test_module_init_and_exit() {
    let (core, index) = core_with_client();
    let core = core.shared();

    assert!(init(&core, InitMode::Module).unwrap().is_none());
    assert!(core.lock().unwrap().bound(index).is_some());

    exit(&core).unwrap();
    assert!(core.lock().unwrap().platform().is_empty());
}

#[test]
fn test_module_init_reports_failure() {
    let (core, _) = core_with_client();
    let core = core.shared();
    init(&core, InitMode::Module).unwrap();

    assert_eq!(init(&core, InitMode::Module).unwrap_err().errno(), -17);
}

#[test]
fn test_async_init_binds_on_worker() {
    let (core, index) = core_with_client();
    let core = core.shared();

    let handle = init(&core, InitMode::BuiltinAsync).unwrap().unwrap();
    handle.join().unwrap();

    assert!(core.lock().unwrap().bound(index).is_some());
}

#[test]
fn test_async_init_swallows_failure() {
    let (core, _) = core_with_client();
    let core = core.shared();
    init(&core, InitMode::Module).unwrap();

    // Second registration fails on the worker, caller still gets Ok
    let handle = init(&core, InitMode::BuiltinAsync).unwrap().unwrap();
    handle.join().unwrap();
    assert!(core.lock().unwrap().driver_registered());
}

#[test]
fn test_report() {
    let (mut core, _) = core_with_client();
    core.add_driver(ClearpadI2cDriver::new()).unwrap();

    let report = core.report();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].dev_name, "clearpad_i2c@0x2c");
    assert!(report[0].bound);
    assert_eq!(report[0].platform_device.as_deref(), Some("clearpad"));
    assert_eq!(report[0].active_panel.as_deref(), Some("panel-tianma"));
    assert_eq!(report[0].irq_gpio, Some(58));
}
