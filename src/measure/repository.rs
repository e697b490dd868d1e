use super::Measure;
use crate::component::Component;
use crate::errors::{Error, Result};
use crate::metric::Metric;
use std::collections::BTreeMap;

/// Storage of measures for the current analysis.
///
/// `raw_measure` returns both the measures loaded before computation and
/// those added during this run.
pub trait MeasureRepository {
    fn raw_measure(&self, component: &Component, metric: &Metric) -> Option<&Measure>;

    /// Fails if a measure already exists for this component and metric.
    fn add(&mut self, component: &Component, metric: &Metric, measure: Measure) -> Result<()>;
}

type MeasureKey = (String, String);

#[derive(Debug, Clone, Default)]
pub struct InMemoryMeasureRepository {
    raw: BTreeMap<MeasureKey, Measure>,
    computed: BTreeMap<MeasureKey, Measure>,
}

impl InMemoryMeasureRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a measure produced before computation (e.g. from a scanner report).
    pub fn add_raw(
        &mut self,
        component_key: impl Into<String>,
        metric_key: impl Into<String>,
        measure: Measure,
    ) -> &mut Self {
        self.raw
            .insert((component_key.into(), metric_key.into()), measure);
        self
    }

    pub fn get(&self, component_key: &str, metric_key: &str) -> Option<&Measure> {
        let key = (component_key.to_string(), metric_key.to_string());
        self.computed.get(&key).or_else(|| self.raw.get(&key))
    }

    /// Measures added during computation, ordered by component then metric key.
    pub fn computed(&self) -> impl Iterator<Item = (&str, &str, &Measure)> {
        self.computed
            .iter()
            .map(|((component, metric), measure)| (component.as_str(), metric.as_str(), measure))
    }

    pub fn computed_for(&self, component_key: &str) -> BTreeMap<&str, &Measure> {
        self.computed()
            .filter(|(component, _, _)| *component == component_key)
            .map(|(_, metric, measure)| (metric, measure))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.computed.is_empty()
    }

    pub fn computed_len(&self) -> usize {
        self.computed.len()
    }
}

impl MeasureRepository for InMemoryMeasureRepository {
    fn raw_measure(&self, component: &Component, metric: &Metric) -> Option<&Measure> {
        self.get(component.key(), metric.key())
    }

    fn add(&mut self, component: &Component, metric: &Metric, measure: Measure) -> Result<()> {
        let key = (component.key().to_string(), metric.key().to_string());
        if self.raw.contains_key(&key) || self.computed.contains_key(&key) {
            return Err(Error::illegal_state(format!(
                "a measure can be set only once for a specific Component ({}) and Metric ({})",
                component.key(),
                metric.key()
            )));
        }
        self.computed.insert(key, measure);
        Ok(())
    }
}
