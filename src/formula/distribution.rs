use super::{Counter, CounterInitializationContext, CreateMeasureContext, Formula};
use crate::component::CrawlerDepthLimit;
use crate::errors::Result;
use crate::measure::{Measure, MeasureValue, RangeDistributionBuilder};

/// Merges range histograms such as `function_complexity_distribution`.
#[derive(Debug, Clone)]
pub struct DistributionFormula {
    output_metric_keys: Vec<String>,
}

impl DistributionFormula {
    pub fn new(metric_key: impl Into<String>) -> Self {
        Self {
            output_metric_keys: vec![metric_key.into()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct DistributionCounter {
    metric_key: String,
    distribution: RangeDistributionBuilder,
    initialized: bool,
}

impl Counter for DistributionCounter {
    fn aggregate(&mut self, other: &Self) {
        if other.initialized {
            self.distribution.merge(&other.distribution);
            self.initialized = true;
        }
    }

    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<()> {
        if let Some(measure) = context.measure(&self.metric_key)? {
            if let MeasureValue::String(data) = measure.value() {
                self.distribution.add(data)?;
                self.initialized = true;
            }
        }
        Ok(())
    }
}

impl Formula for DistributionFormula {
    type Counter = DistributionCounter;

    fn create_new_counter(&self) -> DistributionCounter {
        DistributionCounter {
            metric_key: self.output_metric_keys[0].clone(),
            distribution: RangeDistributionBuilder::new(),
            initialized: false,
        }
    }

    fn create_measure(
        &self,
        counter: &DistributionCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>> {
        if !counter.initialized
            || !CrawlerDepthLimit::LEAVES.is_deeper_than(context.component().component_type())
        {
            return Ok(None);
        }
        Ok(counter.distribution.build().map(Measure::string))
    }

    fn output_metric_keys(&self) -> &[String] {
        &self.output_metric_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentType};
    use crate::measure::InMemoryMeasureRepository;
    use crate::metric::{InMemoryMetricRepository, Metric, MetricType};

    const KEY: &str = "function_complexity_distribution";

    fn leaf_counter(key: &str, data: Option<&str>) -> DistributionCounter {
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let mut measures = InMemoryMeasureRepository::new();
        if let Some(data) = data {
            measures.add_raw(key, KEY, Measure::string(data));
        }
        let leaf = Component::builder(ComponentType::File, key).build();
        let context = CounterInitializationContext::new(&leaf, &metrics, &measures, None, None);
        let mut counter = DistributionFormula::new(KEY).create_new_counter();
        counter.initialize(&context).unwrap();
        counter
    }

    fn emit(counter: &DistributionCounter) -> Option<Measure> {
        let dir = Component::builder(ComponentType::Directory, "d").build();
        let metric = Metric::new(KEY, MetricType::Distrib);
        DistributionFormula::new(KEY)
            .create_measure(counter, &CreateMeasureContext::new(&dir, &metric, None))
            .unwrap()
    }

    #[test]
    fn test_children_histograms_are_merged() {
        let mut parent = DistributionFormula::new(KEY).create_new_counter();
        parent.aggregate(&leaf_counter("a", Some("1=1;2=0;4=3")));
        parent.aggregate(&leaf_counter("b", None));
        parent.aggregate(&leaf_counter("c", Some("1=2;2=5;4=0")));
        assert_eq!(emit(&parent), Some(Measure::string("1=3;2=5;4=3")));
    }

    #[test]
    fn test_no_data_emits_nothing_but_zeros_do() {
        let mut parent = DistributionFormula::new(KEY).create_new_counter();
        parent.aggregate(&leaf_counter("a", None));
        assert_eq!(emit(&parent), None);

        parent.aggregate(&leaf_counter("b", Some("1=0;2=0")));
        assert_eq!(emit(&parent), Some(Measure::string("1=0;2=0")));
    }
}
