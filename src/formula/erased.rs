//! Type erasure so formulas with different counter types share one list.

use super::{Counter, CounterInitializationContext, CreateMeasureContext, Formula};
use crate::errors::{Error, Result};
use crate::measure::Measure;
use std::any::Any;

pub type BoxedFormula = Box<dyn AnyFormula>;

pub fn boxed<F: Formula + 'static>(formula: F) -> BoxedFormula {
    Box::new(formula)
}

/// Object-safe view of a [`Counter`].
pub trait AnyCounter {
    fn as_any(&self) -> &dyn Any;
    fn aggregate_any(&mut self, other: &dyn AnyCounter) -> Result<()>;
    fn initialize_any(&mut self, context: &CounterInitializationContext<'_>) -> Result<()>;
}

impl<C: Counter> AnyCounter for C {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn aggregate_any(&mut self, other: &dyn AnyCounter) -> Result<()> {
        let other = other
            .as_any()
            .downcast_ref::<C>()
            .ok_or_else(|| Error::illegal_state("Type mismatch in counter aggregation"))?;
        self.aggregate(other);
        Ok(())
    }

    fn initialize_any(&mut self, context: &CounterInitializationContext<'_>) -> Result<()> {
        self.initialize(context)
    }
}

/// Object-safe view of a [`Formula`], implemented for every formula.
pub trait AnyFormula {
    fn create_counter_any(&self) -> Box<dyn AnyCounter>;

    fn create_measure_any(
        &self,
        counter: &dyn AnyCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>>;

    fn output_keys_any(&self) -> &[String];
}

impl<F> AnyFormula for F
where
    F: Formula,
{
    fn create_counter_any(&self) -> Box<dyn AnyCounter> {
        Box::new(self.create_new_counter())
    }

    fn create_measure_any(
        &self,
        counter: &dyn AnyCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>> {
        let counter = counter
            .as_any()
            .downcast_ref::<F::Counter>()
            .ok_or_else(|| Error::illegal_state("Type mismatch in formula counter"))?;
        self.create_measure(counter, context)
    }

    fn output_keys_any(&self) -> &[String] {
        self.output_metric_keys()
    }
}
