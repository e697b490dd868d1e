//! Bottom-up measure aggregation.
//!
//! A [`Formula`] binds a [`Counter`] type to one or more output metrics.
//! The [`FormulaExecutor`] walks a component tree children first: every leaf
//! gets a fresh counter initialized from its raw measures, every parent gets
//! a fresh counter that aggregates its children's, and at each node the
//! formula turns the counter into at most one measure per output metric.
//!
//! Counters must aggregate independently of child order. Formulas are
//! stateless; everything a pass accumulates lives in counters.

pub mod average;
pub mod coverage;
pub mod distribution;
mod erased;
pub mod executor;
pub mod new_lines;
pub mod sum;
pub mod values;
pub mod variation_sum;

pub use average::AverageFormula;
pub use coverage::{CoverageFormula, CoverageVariationFormula};
pub use distribution::DistributionFormula;
pub use erased::{boxed, AnyFormula, BoxedFormula};
pub use executor::{FormulaExecutor, FormulaExecutorBuilder};
pub use new_lines::NewLinesAndConditionsFormula;
pub use sum::SumFormula;
pub use values::{CounterValue, DoubleValue, IntValue, LongValue};
pub use variation_sum::VariationSumFormula;

use crate::component::Component;
use crate::errors::Result;
use crate::measure::{Measure, MeasureRepository};
use crate::metric::{Metric, MetricRepository};
use crate::period::Period;
use crate::scm::NewLinesProvider;
use std::collections::BTreeSet;

/// Per-formula accumulator for one subtree.
pub trait Counter: 'static {
    /// Merge a child subtree's counter into this one.
    fn aggregate(&mut self, other: &Self);

    /// Seed from one leaf. Called at most once per counter.
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<()>;
}

pub trait Formula {
    type Counter: Counter;

    fn create_new_counter(&self) -> Self::Counter;

    /// `Ok(None)` suppresses output for this node and metric.
    fn create_measure(
        &self,
        counter: &Self::Counter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>>;

    fn output_metric_keys(&self) -> &[String];
}

/// What a counter may read while being seeded from a leaf.
pub struct CounterInitializationContext<'a> {
    leaf: &'a Component,
    metrics: &'a dyn MetricRepository,
    measures: &'a dyn MeasureRepository,
    period: Option<&'a Period>,
    new_lines: Option<&'a dyn NewLinesProvider>,
}

impl<'a> CounterInitializationContext<'a> {
    pub fn new(
        leaf: &'a Component,
        metrics: &'a dyn MetricRepository,
        measures: &'a dyn MeasureRepository,
        period: Option<&'a Period>,
        new_lines: Option<&'a dyn NewLinesProvider>,
    ) -> Self {
        Self {
            leaf,
            metrics,
            measures,
            period,
            new_lines,
        }
    }

    pub fn leaf(&self) -> &'a Component {
        self.leaf
    }

    /// Raw measure of the leaf. Fails if `metric_key` is not a known metric.
    pub fn measure(&self, metric_key: &str) -> Result<Option<&'a Measure>> {
        let metric = self.metrics.by_key(metric_key)?;
        Ok(self.measures.raw_measure(self.leaf, metric))
    }

    pub fn has_period(&self) -> bool {
        self.period.is_some()
    }

    pub fn period(&self) -> Option<&'a Period> {
        self.period
    }

    /// New code lines of the leaf, `None` when they can not be determined.
    pub fn new_lines(&self) -> Result<Option<BTreeSet<u32>>> {
        match self.new_lines {
            Some(provider) => provider.new_lines(self.leaf),
            None => Ok(None),
        }
    }
}

/// What a formula sees when turning a counter into a measure.
#[derive(Debug, Clone, Copy)]
pub struct CreateMeasureContext<'a> {
    component: &'a Component,
    metric: &'a Metric,
    period: Option<&'a Period>,
}

impl<'a> CreateMeasureContext<'a> {
    pub fn new(component: &'a Component, metric: &'a Metric, period: Option<&'a Period>) -> Self {
        Self {
            component,
            metric,
            period,
        }
    }

    pub fn component(&self) -> &'a Component {
        self.component
    }

    pub fn metric(&self) -> &'a Metric {
        self.metric
    }

    pub fn has_period(&self) -> bool {
        self.period.is_some()
    }

    pub fn period(&self) -> Option<&'a Period> {
        self.period
    }
}

/// Numeric current value, ignoring absent, NO_VALUE and non-numeric measures.
pub(crate) fn numeric_value(measure: Option<&Measure>) -> Option<f64> {
    measure
        .filter(|m| !m.is_no_value())
        .and_then(|m| m.as_double().ok())
}
