use super::values::{Accumulable, CounterValue};
use super::{Counter, CounterInitializationContext, CreateMeasureContext, Formula};
use crate::component::CrawlerDepthLimit;
use crate::errors::Result;
use crate::measure::Measure;

/// Value types a [`SumFormula`] can read from and write to a measure.
pub trait SumValue: Accumulable {
    fn from_measure(measure: &Measure) -> Result<Self>;
    fn to_measure(self) -> Measure;
}

impl SumValue for i32 {
    fn from_measure(measure: &Measure) -> Result<Self> {
        measure.as_int()
    }

    fn to_measure(self) -> Measure {
        Measure::int(self)
    }
}

impl SumValue for i64 {
    fn from_measure(measure: &Measure) -> Result<Self> {
        measure.as_long()
    }

    fn to_measure(self) -> Measure {
        Measure::long(self)
    }
}

/// Sums a metric over the subtree. Leaves keep their raw value; only
/// components above the leaves get a computed measure.
#[derive(Debug, Clone)]
pub struct SumFormula<T> {
    output_metric_keys: Vec<String>,
    default_input_value: Option<T>,
}

impl SumFormula<i32> {
    pub fn int(metric_key: impl Into<String>) -> Self {
        Self::new(metric_key)
    }
}

impl SumFormula<i64> {
    pub fn long(metric_key: impl Into<String>) -> Self {
        Self::new(metric_key)
    }
}

impl<T: SumValue> SumFormula<T> {
    fn new(metric_key: impl Into<String>) -> Self {
        Self {
            output_metric_keys: vec![metric_key.into()],
            default_input_value: None,
        }
    }

    /// Value counted for leaves that have no measure for the metric.
    pub fn with_default_input_value(mut self, value: T) -> Self {
        self.default_input_value = Some(value);
        self
    }

    fn metric_key(&self) -> &str {
        &self.output_metric_keys[0]
    }
}

#[derive(Debug, Clone)]
pub struct SumCounter<T: SumValue> {
    metric_key: String,
    default_input_value: Option<T>,
    value: CounterValue<T>,
}

impl<T: SumValue> SumCounter<T> {
    pub fn value(&self) -> Option<T> {
        self.value.get()
    }
}

impl<T: SumValue> Counter for SumCounter<T> {
    fn aggregate(&mut self, other: &Self) {
        self.value.increment_value(&other.value);
    }

    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<()> {
        match context.measure(&self.metric_key)?.filter(|m| !m.is_no_value()) {
            Some(measure) => {
                self.value.increment(T::from_measure(measure)?);
            }
            None => {
                if let Some(default) = self.default_input_value {
                    self.value.increment(default);
                }
            }
        }
        Ok(())
    }
}

impl<T: SumValue> Formula for SumFormula<T> {
    type Counter = SumCounter<T>;

    fn create_new_counter(&self) -> SumCounter<T> {
        SumCounter {
            metric_key: self.metric_key().to_string(),
            default_input_value: self.default_input_value,
            value: CounterValue::default(),
        }
    }

    fn create_measure(
        &self,
        counter: &SumCounter<T>,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>> {
        if !CrawlerDepthLimit::LEAVES.is_deeper_than(context.component().component_type()) {
            return Ok(None);
        }
        Ok(counter.value().map(T::to_measure))
    }

    fn output_metric_keys(&self) -> &[String] {
        &self.output_metric_keys
    }
}
