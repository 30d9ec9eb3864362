//! Open/configure/close scenarios through the host capability interface.

use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use z140_core::regs::map::{COMMAND, DISTANCE_FWD, STANDSTILL_TIME};
use z140_core::{
    open_driver, AccessError, DriverError, ErrorClass, OpenConfig, SimulatedIpCore, StatCode,
    StatReply, Z140Device,
};

#[test]
fn standstill_scenario_rejects_unaligned_value_and_quiesces_on_close() {
    let mut core = SimulatedIpCore::new();
    let mut driver = open_driver(&mut core, &OpenConfig::default()).expect("open with defaults");

    let code = StatCode::StandstillTime.raw();
    assert_eq!(driver.get_stat(code), Ok(StatReply::ok(20)));
    assert_eq!(driver.set_stat(code, 15), Err(DriverError::InvalidParam));
    assert_eq!(driver.get_stat(code), Ok(StatReply::ok(20)));
    driver.set_stat(code, 20).expect("aligned standstill");
    driver.close().expect("close");

    assert_eq!(core.peek(STANDSTILL_TIME), 2);
    assert_eq!(core.writes().last(), Some(&(COMMAND, 0x01)));
}

#[test]
fn open_resets_counters_and_disables_pattern() {
    let mut core = SimulatedIpCore::new();
    core.set_distances(500, 7);
    core.poke(COMMAND, 0x0A);

    let driver = open_driver(&mut core, &OpenConfig::default()).expect("open");
    driver.close().expect("close");

    assert_eq!(core.peek(DISTANCE_FWD), 0);
    assert_eq!(core.peek(COMMAND), 0);
}

#[test]
fn descriptor_configuration_is_applied_at_open() {
    let config = OpenConfig::from_descriptor([
        ("DEBOUNCE_TIME", 12),
        ("MEAS_TOUT", 2000),
        ("DIRDET_TOUT", 250),
        ("DEBUG_LEVEL", 1),
    ]);
    let mut device = Z140Device::open(SimulatedIpCore::new(), &config).expect("open");

    assert_eq!(device.debug_level(), 1);
    assert_eq!(device.tunables().debounce_time, 12);
    assert_eq!(
        device.get_stat(StatCode::MeasurementTimeout.raw()),
        Ok(StatReply::ok(2000))
    );
    assert_eq!(
        device.get_stat(StatCode::DirectionDetectionTimeout.raw()),
        Ok(StatReply::ok(250))
    );
    assert_eq!(
        device.get_stat(StatCode::RollingTime.raw()),
        Ok(StatReply::ok(10))
    );
}

#[test]
fn invalid_configuration_fails_open_without_quiescing() {
    let mut core = SimulatedIpCore::new();
    let config = OpenConfig {
        meas_tout: Some(50),
        ..OpenConfig::default()
    };

    let error = open_driver(&mut core, &config).err();
    assert_eq!(error, Some(DriverError::InvalidParam));
    assert_eq!(core.writes().len(), 1);
}

#[test]
fn bus_failure_during_open_is_reported_as_access_error() {
    let mut core = SimulatedIpCore::new();
    core.fail_at(Some(COMMAND));

    let error = Z140Device::open(&mut core, &OpenConfig::default())
        .err()
        .expect("quiescing write fails");
    assert_eq!(
        error,
        DriverError::Access(AccessError::WriteFailed { offset: COMMAND })
    );
    assert_eq!(error.class(), ErrorClass::Bus);
}

#[test]
fn debug_level_is_handle_state() {
    let mut device =
        Z140Device::open(SimulatedIpCore::new(), &OpenConfig::default()).expect("open");
    device
        .set_stat(StatCode::DebugLevel.raw(), 3)
        .expect("debug level");
    assert_eq!(device.debug_level(), 3);
    assert_eq!(
        device.get_stat(StatCode::DebugLevel.raw()),
        Ok(StatReply::ok(3))
    );

    let other = Z140Device::open(SimulatedIpCore::new(), &OpenConfig::default()).expect("open");
    assert_eq!(other.debug_level(), 0);
}
