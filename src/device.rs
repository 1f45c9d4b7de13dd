//! Host-facing device contract.
//!
//! The host device-management framework owns property registration, change
//! notification, and the device lifecycle; its API is a fixed external
//! contract. This module re-expresses that contract as the [`Device`] trait
//! the adapter implements, plus [`DeviceHost`], a minimal property store that
//! plays the host's role in tests and in the CLI. Host-specific glue stays
//! outside the core logic and reaches it only through this trait.

use std::collections::BTreeMap;

use log::warn;

use crate::error::{DriverError, DriverResult};
use crate::property::{PropertyChange, PropertyDefinition, PropertyValue};

/// Lifecycle and notification entry points a device exposes to the host.
///
/// The host serializes all calls; implementations need no internal locking.
pub trait Device: Send {
    /// Stable name the host registers the device under.
    fn name(&self) -> &str;

    /// Properties to declare before initialization. Must not touch hardware.
    fn declared_properties(&self) -> Vec<PropertyDefinition>;

    /// Transition Uninitialized -> Initialized; the only place hardware is
    /// opened. A failed initialize leaves the device Uninitialized.
    fn initialize(&mut self) -> DriverResult<()>;

    /// Transition back to Uninitialized. Idempotent; must succeed on an
    /// already-uninitialized device without touching hardware again.
    fn shutdown(&mut self) -> DriverResult<()>;

    /// Whether an operation is in flight. Synchronous devices are never busy.
    fn busy(&self) -> bool {
        false
    }

    /// Called after the host accepts a new property value.
    ///
    /// An error tells the host the hardware did not take the value; the host
    /// then reverts the displayed value to `change.previous`.
    fn handle_property_change(&mut self, change: &PropertyChange<'_>) -> DriverResult<()>;
}

impl std::fmt::Debug for dyn Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device").field("name", &self.name()).finish()
    }
}

struct Slot {
    definition: PropertyDefinition,
    value: PropertyValue,
}

/// Host-side glue: owns a device and the displayed values of its properties.
///
/// [`set_property`](Self::set_property) validates against the declared
/// constraint, commits the displayed value, then notifies the device. If the
/// device reports an error the displayed value is reverted to what it was
/// before the change, so the display always tracks the last state the
/// hardware actually accepted. One policy for every property group.
pub struct DeviceHost {
    device: Box<dyn Device>,
    properties: BTreeMap<String, Slot>,
}

impl DeviceHost {
    /// Register a device and collect its declared properties.
    pub fn new(device: Box<dyn Device>) -> Self {
        let mut properties = BTreeMap::new();
        for definition in device.declared_properties() {
            if properties.contains_key(&definition.name) {
                warn!("duplicate property declaration ignored: {}", definition.name);
                continue;
            }
            let value = definition.initial.clone();
            properties.insert(definition.name.clone(), Slot { definition, value });
        }
        Self { device, properties }
    }

    /// Initialize the underlying device.
    pub fn initialize(&mut self) -> DriverResult<()> {
        self.device.initialize()
    }

    /// Shut the underlying device down.
    pub fn shutdown(&mut self) -> DriverResult<()> {
        self.device.shutdown()
    }

    /// Displayed value of a property.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name).map(|slot| &slot.value)
    }

    /// Names of all declared properties, sorted.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Accept a new value for `name` and notify the device.
    pub fn set_property(
        &mut self,
        name: &str,
        requested: impl Into<PropertyValue>,
    ) -> DriverResult<()> {
        let requested = requested.into();
        let slot = self
            .properties
            .get_mut(name)
            .ok_or_else(|| DriverError::UnknownProperty(name.to_string()))?;
        slot.definition.constraint.validate(name, &requested)?;

        let previous = std::mem::replace(&mut slot.value, requested.clone());
        let change = PropertyChange {
            name,
            previous: &previous,
            requested: &requested,
        };
        if let Err(err) = self.device.handle_property_change(&change) {
            // Keep showing the last value the hardware accepted.
            if let Some(slot) = self.properties.get_mut(name) {
                slot.value = previous;
            }
            return Err(err);
        }
        Ok(())
    }

    /// Borrow the managed device.
    pub fn device(&self) -> &dyn Device {
        self.device.as_ref()
    }

    /// Mutably borrow the managed device.
    pub fn device_mut(&mut self) -> &mut dyn Device {
        self.device.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Device stub that can be told to reject every change.
    struct StubDevice {
        fail_changes: bool,
    }

    impl Device for StubDevice {
        fn name(&self) -> &str {
            "Stub"
        }

        fn declared_properties(&self) -> Vec<PropertyDefinition> {
            vec![
                PropertyDefinition::float("Level", 0.0, 0.0, 10.0),
                PropertyDefinition::choice("Switch", "Off", &["Off", "On"]),
            ]
        }

        fn initialize(&mut self) -> DriverResult<()> {
            Ok(())
        }

        fn shutdown(&mut self) -> DriverResult<()> {
            Ok(())
        }

        fn handle_property_change(&mut self, _change: &PropertyChange<'_>) -> DriverResult<()> {
            if self.fail_changes {
                Err(DriverError::WriteFailed { transferred: 0 })
            } else {
                Ok(())
            }
        }
    }

    fn host(fail_changes: bool) -> DeviceHost {
        DeviceHost::new(Box::new(StubDevice { fail_changes }))
    }

    #[test]
    fn accepted_change_updates_display() {
        let mut host = host(false);
        host.set_property("Level", 3.0).unwrap();
        assert_eq!(host.property("Level"), Some(&PropertyValue::Float(3.0)));
    }

    #[test]
    fn rejected_change_reverts_display() {
        let mut host = host(true);
        let err = host.set_property("Switch", "On").unwrap_err();
        assert!(matches!(err, DriverError::WriteFailed { .. }));
        assert_eq!(
            host.property("Switch"),
            Some(&PropertyValue::Text("Off".into()))
        );
    }

    #[test]
    fn constraint_violation_skips_the_device() {
        let mut host = host(false);
        let err = host.set_property("Level", 11.0).unwrap_err();
        assert!(matches!(err, DriverError::InvalidPropertyValue { .. }));
        assert_eq!(host.property("Level"), Some(&PropertyValue::Float(0.0)));
    }

    #[test]
    fn unknown_property_is_rejected() {
        let mut host = host(false);
        let err = host.set_property("Gain", 1.0).unwrap_err();
        assert!(matches!(err, DriverError::UnknownProperty(_)));
    }

    #[test]
    fn properties_are_listed_sorted() {
        let host = host(false);
        let names: Vec<&str> = host.property_names().collect();
        assert_eq!(names, vec!["Level", "Switch"]);
    }

    #[test]
    fn busy_defaults_to_false() {
        let host = host(false);
        assert!(!host.device().busy());
    }
}
