use super::values::DoubleValue;
use super::{Counter, CounterInitializationContext, CreateMeasureContext, Formula};
use crate::component::CrawlerDepthLimit;
use crate::errors::Result;
use crate::measure::Measure;

/// Sums variations of a metric over the subtree, ignoring current values.
#[derive(Debug, Clone)]
pub struct VariationSumFormula {
    output_metric_keys: Vec<String>,
}

impl VariationSumFormula {
    pub fn new(metric_key: impl Into<String>) -> Self {
        Self {
            output_metric_keys: vec![metric_key.into()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct VariationSumCounter {
    metric_key: String,
    value: DoubleValue,
}

impl Counter for VariationSumCounter {
    fn aggregate(&mut self, other: &Self) {
        self.value.increment_value(&other.value);
    }

    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<()> {
        if let Some(variation) = context
            .measure(&self.metric_key)?
            .and_then(|measure| measure.variation())
        {
            self.value.increment(variation);
        }
        Ok(())
    }
}

impl Formula for VariationSumFormula {
    type Counter = VariationSumCounter;

    fn create_new_counter(&self) -> VariationSumCounter {
        VariationSumCounter {
            metric_key: self.output_metric_keys[0].clone(),
            value: DoubleValue::default(),
        }
    }

    fn create_measure(
        &self,
        counter: &VariationSumCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>> {
        if !context.has_period()
            || !CrawlerDepthLimit::LEAVES.is_deeper_than(context.component().component_type())
        {
            return Ok(None);
        }
        Ok(counter.value.get().map(Measure::variation_only))
    }

    fn output_metric_keys(&self) -> &[String] {
        &self.output_metric_keys
    }
}
