//! Named, bounded device properties.
//!
//! The host framework exposes device controls as named properties, each with
//! either numeric limits or a fixed set of allowed values. This module models
//! the slice of that contract the adapter needs: typed values, declaration-time
//! constraints, and the change notification a device receives after the host
//! has accepted a value.
//!
//! A [`PropertyChange`] carries the previous displayed value alongside the
//! requested one. That is what makes a uniform revert-on-failure policy
//! possible: whoever plays the host can always restore the display to the
//! last value the hardware actually accepted.

use std::fmt;

use crate::error::{DriverError, DriverResult};

/// Value of a device property as held by the host property store.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Floating point property (voltages).
    Float(f64),
    /// Enumerated or free-form text property (enable lines).
    Text(String),
}

impl PropertyValue {
    /// Numeric view of the value, if this is a float property.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(value) => Some(*value),
            PropertyValue::Text(_) => None,
        }
    }

    /// Text view of the value, if this is a text property.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Float(_) => None,
            PropertyValue::Text(text) => Some(text),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Float(value) => write!(f, "{value}"),
            PropertyValue::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

/// Validation constraint attached to a property at declaration time.
///
/// The host validates a requested value against the constraint before the
/// device is notified, so callbacks never see out-of-bounds values.
#[derive(Debug, Clone, Default)]
pub enum Constraint {
    /// All values accepted.
    #[default]
    None,

    /// Inclusive numeric range; only meaningful for float properties.
    Range {
        /// Minimum allowed value (inclusive).
        min: f64,
        /// Maximum allowed value (inclusive).
        max: f64,
    },

    /// Discrete set of allowed text values.
    Choices(Vec<String>),
}

impl Constraint {
    /// Validate `value` against the constraint.
    pub fn validate(&self, name: &str, value: &PropertyValue) -> DriverResult<()> {
        match self {
            Constraint::None => Ok(()),

            Constraint::Range { min, max } => {
                let v = value
                    .as_float()
                    .ok_or_else(|| DriverError::InvalidPropertyValue {
                        name: name.to_string(),
                        reason: format!("expected a numeric value, got '{value}'"),
                    })?;
                if v < *min || v > *max {
                    return Err(DriverError::InvalidPropertyValue {
                        name: name.to_string(),
                        reason: format!("{v} outside allowed range [{min}, {max}]"),
                    });
                }
                Ok(())
            }

            Constraint::Choices(choices) => {
                let text = value
                    .as_text()
                    .ok_or_else(|| DriverError::InvalidPropertyValue {
                        name: name.to_string(),
                        reason: format!("expected a text value, got '{value}'"),
                    })?;
                if choices.iter().any(|choice| choice == text) {
                    Ok(())
                } else {
                    Err(DriverError::InvalidPropertyValue {
                        name: name.to_string(),
                        reason: format!("'{text}' is not one of {choices:?}"),
                    })
                }
            }
        }
    }
}

/// Declaration of one host-visible property.
///
/// Declarations happen before the device is initialized and never touch
/// hardware.
#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    /// Host-visible property name.
    pub name: String,
    /// Displayed value before the first change.
    pub initial: PropertyValue,
    /// Constraint the host enforces before notifying the device.
    pub constraint: Constraint,
}

impl PropertyDefinition {
    /// Declare a float property with inclusive limits.
    pub fn float(name: impl Into<String>, initial: f64, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            initial: PropertyValue::Float(initial),
            constraint: Constraint::Range { min, max },
        }
    }

    /// Declare a text property restricted to an allowed-value set.
    pub fn choice(name: impl Into<String>, initial: &str, choices: &[&str]) -> Self {
        Self {
            name: name.into(),
            initial: PropertyValue::Text(initial.to_string()),
            constraint: Constraint::Choices(choices.iter().map(|c| c.to_string()).collect()),
        }
    }
}

/// Change notification delivered to a device after the host accepts a value.
#[derive(Debug)]
pub struct PropertyChange<'a> {
    /// Property name.
    pub name: &'a str,
    /// Displayed value before this change; the revert target on failure.
    pub previous: &'a PropertyValue,
    /// Value the host just accepted.
    pub requested: &'a PropertyValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_accepts_in_bounds() {
        let constraint = Constraint::Range { min: 0.0, max: 5.0 };
        assert!(constraint
            .validate("Voltage Analog 1", &PropertyValue::Float(2.5))
            .is_ok());
        assert!(constraint
            .validate("Voltage Analog 1", &PropertyValue::Float(0.0))
            .is_ok());
        assert!(constraint
            .validate("Voltage Analog 1", &PropertyValue::Float(5.0))
            .is_ok());
    }

    #[test]
    fn range_rejects_out_of_bounds() {
        let constraint = Constraint::Range { min: 0.0, max: 5.0 };
        let err = constraint
            .validate("Voltage Analog 1", &PropertyValue::Float(5.1))
            .unwrap_err();
        assert!(matches!(err, DriverError::InvalidPropertyValue { .. }));
    }

    #[test]
    fn range_rejects_text_value() {
        let constraint = Constraint::Range { min: 0.0, max: 5.0 };
        assert!(constraint
            .validate("Voltage Analog 1", &PropertyValue::Text("On".into()))
            .is_err());
    }

    #[test]
    fn choices_accept_listed_values_only() {
        let constraint = Constraint::Choices(vec!["Off".into(), "On".into()]);
        assert!(constraint
            .validate("Enable Digital 1", &PropertyValue::Text("On".into()))
            .is_ok());
        assert!(constraint
            .validate("Enable Digital 1", &PropertyValue::Text("on".into()))
            .is_err());
    }

    #[test]
    fn definition_helpers_build_expected_constraints() {
        let voltage = PropertyDefinition::float("Voltage Analog 1", 0.0, 0.0, 5.0);
        assert_eq!(voltage.initial, PropertyValue::Float(0.0));
        assert!(matches!(voltage.constraint, Constraint::Range { .. }));

        let enable = PropertyDefinition::choice("Enable Digital 1", "Off", &["Off", "On"]);
        assert_eq!(enable.initial, PropertyValue::Text("Off".into()));
        assert!(matches!(enable.constraint, Constraint::Choices(_)));
    }
}
