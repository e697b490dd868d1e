//! Ratio metrics of shape `covered / elements`, in percent.
//!
//! No measure is produced when there are no elements: zero lines to cover
//! means coverage is undefined, not 0%. Rounding happens once, when the
//! measure is created.

mod counters;

pub use counters::{
    ElementsAndCoveredElementsCounter, LeafInitialization, LinesAndConditionsKeys, SingleKeys,
    ValueSource,
};

use super::{CreateMeasureContext, Formula};
use crate::errors::Result;
use crate::measure::{round_to_scale, Measure};
use std::sync::Arc;

fn percentage(counter: &ElementsAndCoveredElementsCounter) -> Option<f64> {
    let elements = counter.elements().filter(|e| *e > 0)?;
    Some(100.0 * counter.covered_elements() as f64 / elements as f64)
}

/// Coverage of current values, emitted on every component with elements.
#[derive(Debug, Clone)]
pub struct CoverageFormula {
    strategy: Arc<LeafInitialization>,
    output_metric_keys: Vec<String>,
}

impl CoverageFormula {
    pub fn new(strategy: LeafInitialization, output_metric_key: impl Into<String>) -> Self {
        Self {
            strategy: Arc::new(strategy),
            output_metric_keys: vec![output_metric_key.into()],
        }
    }

    pub fn lines_and_conditions(keys: LinesAndConditionsKeys, output_metric_key: impl Into<String>) -> Self {
        Self::new(LeafInitialization::LinesAndConditions(keys), output_metric_key)
    }

    pub fn single(keys: SingleKeys, output_metric_key: impl Into<String>) -> Self {
        Self::new(LeafInitialization::Single(keys), output_metric_key)
    }
}

impl Formula for CoverageFormula {
    type Counter = ElementsAndCoveredElementsCounter;

    fn create_new_counter(&self) -> ElementsAndCoveredElementsCounter {
        ElementsAndCoveredElementsCounter::new(Arc::clone(&self.strategy), ValueSource::Current)
    }

    fn create_measure(
        &self,
        counter: &ElementsAndCoveredElementsCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>> {
        Ok(percentage(counter).map(|value| Measure::double(value, context.metric().decimal_scale())))
    }

    fn output_metric_keys(&self) -> &[String] {
        &self.output_metric_keys
    }
}

/// Coverage of new code, computed from variations of the input metrics.
#[derive(Debug, Clone)]
pub struct CoverageVariationFormula {
    strategy: Arc<LeafInitialization>,
    output_metric_keys: Vec<String>,
}

impl CoverageVariationFormula {
    pub fn new(strategy: LeafInitialization, output_metric_key: impl Into<String>) -> Self {
        Self {
            strategy: Arc::new(strategy),
            output_metric_keys: vec![output_metric_key.into()],
        }
    }

    pub fn lines_and_conditions(keys: LinesAndConditionsKeys, output_metric_key: impl Into<String>) -> Self {
        Self::new(LeafInitialization::LinesAndConditions(keys), output_metric_key)
    }

    pub fn single(keys: SingleKeys, output_metric_key: impl Into<String>) -> Self {
        Self::new(LeafInitialization::Single(keys), output_metric_key)
    }
}

impl Formula for CoverageVariationFormula {
    type Counter = ElementsAndCoveredElementsCounter;

    fn create_new_counter(&self) -> ElementsAndCoveredElementsCounter {
        ElementsAndCoveredElementsCounter::new(Arc::clone(&self.strategy), ValueSource::Variation)
    }

    fn create_measure(
        &self,
        counter: &ElementsAndCoveredElementsCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>> {
        if !context.has_period() {
            return Ok(None);
        }
        Ok(percentage(counter).map(|value| {
            Measure::variation_only(round_to_scale(value, context.metric().decimal_scale()))
        }))
    }

    fn output_metric_keys(&self) -> &[String] {
        &self.output_metric_keys
    }
}
