//! Metric descriptors and their lookup.

pub mod core_metrics;

use crate::errors::{Error, Result};
use crate::measure::ValueType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    Int,
    /// Work duration in minutes, stored as a long
    WorkDur,
    Float,
    Percent,
    String,
    Data,
    Distrib,
}

impl MetricType {
    pub fn value_type(self) -> ValueType {
        match self {
            Self::Int => ValueType::Int,
            Self::WorkDur => ValueType::Long,
            Self::Float | Self::Percent => ValueType::Double,
            Self::String | Self::Data | Self::Distrib => ValueType::String,
        }
    }

    fn default_decimal_scale(self) -> Option<u32> {
        match self {
            Self::Float | Self::Percent => Some(Metric::DEFAULT_DECIMAL_SCALE),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    key: String,
    metric_type: MetricType,
    decimal_scale: Option<u32>,
}

impl Metric {
    pub const DEFAULT_DECIMAL_SCALE: u32 = 1;

    pub fn new(key: impl Into<String>, metric_type: MetricType) -> Self {
        Self {
            key: key.into(),
            metric_type,
            decimal_scale: metric_type.default_decimal_scale(),
        }
    }

    pub fn with_decimal_scale(mut self, decimal_scale: u32) -> Self {
        self.decimal_scale = Some(decimal_scale);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    pub fn value_type(&self) -> ValueType {
        self.metric_type.value_type()
    }

    /// Scale used when rounding double values; non-decimal metrics report 0.
    pub fn decimal_scale(&self) -> u32 {
        self.decimal_scale.unwrap_or(0)
    }
}

/// Read-only lookup of metric descriptors by key.
pub trait MetricRepository {
    /// Fails when no metric is registered under `key`.
    fn by_key(&self, key: &str) -> Result<&Metric>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMetricRepository {
    metrics: HashMap<String, Metric>,
}

impl InMemoryMetricRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository preloaded with every metric in [`core_metrics::all`].
    pub fn with_core_metrics() -> Self {
        let mut repository = Self::new();
        for metric in core_metrics::all() {
            repository.add(metric);
        }
        repository
    }

    pub fn add(&mut self, metric: Metric) -> &mut Self {
        self.metrics.insert(metric.key.clone(), metric);
        self
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl MetricRepository for InMemoryMetricRepository {
    fn by_key(&self, key: &str) -> Result<&Metric> {
        self.metrics
            .get(key)
            .ok_or_else(|| Error::UnknownMetric(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_metrics_default_to_one_digit() {
        assert_eq!(Metric::new("c", MetricType::Percent).decimal_scale(), 1);
        assert_eq!(Metric::new("f", MetricType::Float).decimal_scale(), 1);
        assert_eq!(Metric::new("i", MetricType::Int).decimal_scale(), 0);
        assert_eq!(
            Metric::new("c", MetricType::Percent)
                .with_decimal_scale(3)
                .decimal_scale(),
            3
        );
    }

    #[test]
    fn test_unknown_metric_fails() {
        let repository = InMemoryMetricRepository::new();
        let err = repository.by_key("nope").unwrap_err();
        assert!(matches!(err, Error::UnknownMetric(ref k) if k == "nope"));
    }

    #[test]
    fn test_core_metrics_are_registered() {
        let repository = InMemoryMetricRepository::with_core_metrics();
        let coverage = repository.by_key(core_metrics::COVERAGE).unwrap();
        assert_eq!(coverage.metric_type(), MetricType::Percent);
        assert_eq!(
            repository.by_key(core_metrics::SQALE_INDEX).unwrap().value_type(),
            ValueType::Long
        );
    }
}
