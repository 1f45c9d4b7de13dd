//! End-to-end scenarios for the laser driver adapter over the mock backend.
//!
//! These drive the adapter the way the host framework would: declare the
//! device, initialize it, push property changes through the host glue, and
//! assert both what reached the driver and what the display shows afterwards.

use laser_driver::adapter::{LaserDriver, DEVICE_NAME, OFF, ON};
use laser_driver::config::AdapterConfig;
use laser_driver::device::DeviceHost;
use laser_driver::error::DriverError;
use laser_driver::hardware::mock::{MockDriver, MockStateHandle, K8061_RANGE};
use laser_driver::property::PropertyValue;

fn host_with_mock() -> (DeviceHost, MockStateHandle) {
    let driver = MockDriver::new();
    let state = driver.state();
    let adapter = LaserDriver::new(AdapterConfig::default(), Box::new(driver));
    (DeviceHost::new(Box::new(adapter)), state)
}

#[test]
fn voltage_reaches_the_mapped_channel_and_decodes_back() {
    let (mut host, state) = host_with_mock();
    host.initialize().unwrap();

    host.set_property("Voltage Analog 3", 2.5).unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.analog_writes.len(), 1);
    let (channel, sample) = state.analog_writes[0];
    assert_eq!(channel, 2, "Voltage Analog 3 must land on channel index 2");
    let decoded = K8061_RANGE.volts_from_sample(sample);
    assert!(
        (decoded - 2.5).abs() <= K8061_RANGE.resolution(),
        "sample {sample} decodes to {decoded} V"
    );
}

#[test]
fn enable_reaches_the_first_channel_as_true() {
    let (mut host, state) = host_with_mock();
    host.initialize().unwrap();

    host.set_property("Enable Digital 1", ON).unwrap();

    assert_eq!(state.lock().unwrap().digital_writes, vec![(0, true)]);
    assert_eq!(
        host.property("Enable Digital 1"),
        Some(&PropertyValue::Text(ON.into()))
    );
}

#[test]
fn failed_enable_write_reverts_the_display() {
    let (mut host, state) = host_with_mock();
    host.initialize().unwrap();
    state.lock().unwrap().fail_digital_writes = true;

    let err = host.set_property("Enable Digital 1", ON).unwrap_err();

    assert!(matches!(err, DriverError::WriteFailed { transferred: 0 }));
    // The display shows the logical negation of what was requested.
    assert_eq!(
        host.property("Enable Digital 1"),
        Some(&PropertyValue::Text(OFF.into()))
    );
    assert!(state.lock().unwrap().digital_writes.is_empty());
}

#[test]
fn failed_voltage_write_reverts_the_display() {
    let (mut host, state) = host_with_mock();
    host.initialize().unwrap();

    host.set_property("Voltage Analog 2", 3.0).unwrap();
    state.lock().unwrap().fail_analog_writes = true;

    let err = host.set_property("Voltage Analog 2", 4.0).unwrap_err();

    assert!(matches!(err, DriverError::WriteFailed { .. }));
    assert_eq!(
        host.property("Voltage Analog 2"),
        Some(&PropertyValue::Float(3.0))
    );
}

#[test]
fn out_of_range_voltage_is_rejected_without_a_driver_call() {
    let (mut host, state) = host_with_mock();
    host.initialize().unwrap();

    let err = host.set_property("Voltage Analog 1", 7.5).unwrap_err();

    assert!(matches!(err, DriverError::InvalidPropertyValue { .. }));
    assert!(state.lock().unwrap().analog_writes.is_empty());
    assert_eq!(
        host.property("Voltage Analog 1"),
        Some(&PropertyValue::Float(0.0))
    );
}

#[test]
fn undeclared_property_is_rejected() {
    let (mut host, _state) = host_with_mock();
    host.initialize().unwrap();

    let err = host.set_property("Voltage Analog 6", 1.0).unwrap_err();
    assert!(matches!(err, DriverError::UnknownProperty(_)));
}

#[test]
fn configured_channels_beyond_the_board_fail_as_invalid_channel() {
    // The property surface says five channels, the driver reports three.
    let driver = MockDriver::new().with_channel_counts(3, 3);
    let state = driver.state();
    let adapter = LaserDriver::new(AdapterConfig::default(), Box::new(driver));
    let mut host = DeviceHost::new(Box::new(adapter));
    host.initialize().unwrap();

    let err = host.set_property("Voltage Analog 4", 1.0).unwrap_err();
    assert!(matches!(
        err,
        DriverError::InvalidChannel {
            channel: 3,
            available: 3
        }
    ));
    assert!(state.lock().unwrap().analog_writes.is_empty());

    // Channels the board does have still work.
    host.set_property("Voltage Analog 3", 1.0).unwrap();
    assert_eq!(state.lock().unwrap().analog_writes.len(), 1);
}

#[test]
fn open_failure_keeps_the_adapter_uninitialized() {
    let driver = MockDriver::new().failing_open();
    let adapter = LaserDriver::new(AdapterConfig::default(), Box::new(driver));
    let mut host = DeviceHost::new(Box::new(adapter));

    let err = host.initialize().unwrap_err();
    assert!(matches!(err, DriverError::OpenFailed { .. }));

    // Writes now fail with device-not-open, and the display reverts.
    let err = host.set_property("Enable Digital 2", ON).unwrap_err();
    assert!(matches!(err, DriverError::DeviceNotOpen));
    assert_eq!(
        host.property("Enable Digital 2"),
        Some(&PropertyValue::Text(OFF.into()))
    );

    // Shutdown of a never-initialized adapter is a successful no-op.
    host.shutdown().unwrap();
}

#[test]
fn shutdown_twice_succeeds_without_second_teardown() {
    let (mut host, _state) = host_with_mock();
    host.initialize().unwrap();

    host.shutdown().unwrap();
    host.shutdown().unwrap();

    // After shutdown the board handle is gone; writes report not-open.
    let err = host.set_property("Voltage Analog 1", 1.0).unwrap_err();
    assert!(matches!(err, DriverError::DeviceNotOpen));
}

#[test]
fn device_reports_name_and_is_never_busy() {
    let (host, _state) = host_with_mock();
    assert_eq!(host.device().name(), DEVICE_NAME);
    assert!(!host.device().busy());
}

#[test]
fn all_ten_properties_are_declared_before_initialization() {
    let (host, _state) = host_with_mock();
    let names: Vec<&str> = host.property_names().collect();
    assert_eq!(names.len(), 10);
    assert!(names.contains(&"Voltage Analog 5"));
    assert!(names.contains(&"Enable Digital 5"));
}
