//! Measures: one metric's value for one component, plus an optional
//! variation (delta since the new code baseline).

pub mod distribution;
pub mod key_value;
mod repository;

pub use distribution::RangeDistributionBuilder;
pub use repository::{InMemoryMeasureRepository, MeasureRepository};

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    NoValue,
    Int,
    Long,
    Double,
    String,
}

impl ValueType {
    fn name(self) -> &'static str {
        match self {
            Self::NoValue => "NO_VALUE",
            Self::Int => "INT",
            Self::Long => "LONG",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasureValue {
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    NoValue,
}

impl Default for MeasureValue {
    fn default() -> Self {
        Self::NoValue
    }
}

impl MeasureValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::NoValue => ValueType::NoValue,
            Self::Int(_) => ValueType::Int,
            Self::Long(_) => ValueType::Long,
            Self::Double(_) => ValueType::Double,
            Self::String(_) => ValueType::String,
        }
    }
}

/// Immutable once built. Doubles are rounded to the metric's decimal scale
/// at creation, never later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    /// Absent in input for variation-only measures.
    #[serde(default)]
    value: MeasureValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variation: Option<f64>,
}

impl Measure {
    pub fn int(value: i32) -> Self {
        Self::of(MeasureValue::Int(value))
    }

    pub fn long(value: i64) -> Self {
        Self::of(MeasureValue::Long(value))
    }

    pub fn double(value: f64, decimal_scale: u32) -> Self {
        Self::of(MeasureValue::Double(round_to_scale(value, decimal_scale)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::of(MeasureValue::String(value.into()))
    }

    pub fn no_value() -> Self {
        Self::of(MeasureValue::NoValue)
    }

    /// A measure carrying only a variation.
    pub fn variation_only(variation: f64) -> Self {
        Self::no_value().with_variation(variation)
    }

    fn of(value: MeasureValue) -> Self {
        Self {
            value,
            variation: None,
        }
    }

    pub fn with_variation(mut self, variation: f64) -> Self {
        self.variation = Some(variation);
        self
    }

    pub fn value(&self) -> &MeasureValue {
        &self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    pub fn is_no_value(&self) -> bool {
        self.value == MeasureValue::NoValue
    }

    pub fn variation(&self) -> Option<f64> {
        self.variation
    }

    pub fn as_int(&self) -> Result<i32> {
        match self.value {
            MeasureValue::Int(v) => Ok(v),
            _ => Err(self.type_mismatch("INT")),
        }
    }

    /// INT values widen to long.
    pub fn as_long(&self) -> Result<i64> {
        match self.value {
            MeasureValue::Int(v) => Ok(i64::from(v)),
            MeasureValue::Long(v) => Ok(v),
            _ => Err(self.type_mismatch("LONG")),
        }
    }

    /// Any numeric value widens to double.
    pub fn as_double(&self) -> Result<f64> {
        match self.value {
            MeasureValue::Int(v) => Ok(f64::from(v)),
            MeasureValue::Long(v) => Ok(v as f64),
            MeasureValue::Double(v) => Ok(v),
            _ => Err(self.type_mismatch("DOUBLE")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match &self.value {
            MeasureValue::String(v) => Ok(v),
            _ => Err(self.type_mismatch("STRING")),
        }
    }

    fn type_mismatch(&self, expected: &'static str) -> Error {
        Error::ValueType {
            expected,
            actual: self.value_type().name(),
        }
    }
}

/// Half-up rounding to `scale` decimal digits.
pub fn round_to_scale(value: f64, scale: u32) -> f64 {
    let factor = 10f64.powi(scale as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_rounded_at_creation() {
        let measure = Measure::double(66.666_666, 1);
        assert_eq!(measure.as_double().unwrap(), 66.7);
        assert_eq!(Measure::double(2.25, 1).as_double().unwrap(), 2.3);
        assert_eq!(Measure::double(1.0 / 3.0, 0).as_double().unwrap(), 0.0);
    }

    #[test]
    fn test_numeric_widening() {
        assert_eq!(Measure::int(3).as_long().unwrap(), 3);
        assert_eq!(Measure::long(7).as_double().unwrap(), 7.0);
        assert!(Measure::long(7).as_int().is_err());
    }

    #[test]
    fn test_string_is_not_numeric() {
        let err = Measure::string("1=2").as_long().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Value can not be converted to LONG because current value type is STRING"
        );
    }

    #[test]
    fn test_variation_is_independent_of_value() {
        let measure = Measure::variation_only(4.0);
        assert!(measure.is_no_value());
        assert_eq!(measure.variation(), Some(4.0));

        let both = Measure::int(10).with_variation(-2.0);
        assert_eq!(both.as_int().unwrap(), 10);
        assert_eq!(both.variation(), Some(-2.0));
    }

    #[test]
    fn test_deserialize_variation_without_value() {
        let measure: Measure = serde_json::from_str(r#"{"variation": 2.0}"#).unwrap();
        assert_eq!(measure, Measure::variation_only(2.0));

        let measure: Measure = serde_json::from_str(r#"{"value": null, "variation": 1.0}"#).unwrap();
        assert_eq!(measure, Measure::variation_only(1.0));
    }
}
