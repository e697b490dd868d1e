use super::values::DoubleValue;
use super::{numeric_value, Counter, CounterInitializationContext, CreateMeasureContext, Formula};
use crate::component::CrawlerDepthLimit;
use crate::errors::Result;
use crate::measure::Measure;

/// `sum(main) / sum(by)` over the subtree, e.g. complexity per function.
///
/// A leaf contributes only when both its main (or fallback) and its `by`
/// values are present, so the two sums always cover the same leaves.
#[derive(Debug, Clone)]
pub struct AverageFormula {
    output_metric_keys: Vec<String>,
    main_metric_key: String,
    by_metric_key: String,
    fallback_metric_key: Option<String>,
}

impl AverageFormula {
    pub fn new(
        output_metric_key: impl Into<String>,
        main_metric_key: impl Into<String>,
        by_metric_key: impl Into<String>,
    ) -> Self {
        Self {
            output_metric_keys: vec![output_metric_key.into()],
            main_metric_key: main_metric_key.into(),
            by_metric_key: by_metric_key.into(),
            fallback_metric_key: None,
        }
    }

    /// Metric read on leaves where the main metric is absent.
    pub fn with_fallback(mut self, metric_key: impl Into<String>) -> Self {
        self.fallback_metric_key = Some(metric_key.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct AverageCounter {
    main_metric_key: String,
    by_metric_key: String,
    fallback_metric_key: Option<String>,
    main: DoubleValue,
    by: DoubleValue,
}

impl Counter for AverageCounter {
    fn aggregate(&mut self, other: &Self) {
        self.main.increment_value(&other.main);
        self.by.increment_value(&other.by);
    }

    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<()> {
        let mut main = numeric_value(context.measure(&self.main_metric_key)?);
        if main.is_none() {
            if let Some(fallback) = &self.fallback_metric_key {
                main = numeric_value(context.measure(fallback)?);
            }
        }
        let by = numeric_value(context.measure(&self.by_metric_key)?);
        if let (Some(main), Some(by)) = (main, by) {
            self.main.increment(main);
            self.by.increment(by);
        }
        Ok(())
    }
}

impl Formula for AverageFormula {
    type Counter = AverageCounter;

    fn create_new_counter(&self) -> AverageCounter {
        AverageCounter {
            main_metric_key: self.main_metric_key.clone(),
            by_metric_key: self.by_metric_key.clone(),
            fallback_metric_key: self.fallback_metric_key.clone(),
            main: DoubleValue::default(),
            by: DoubleValue::default(),
        }
    }

    fn create_measure(
        &self,
        counter: &AverageCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>> {
        if !CrawlerDepthLimit::LEAVES.is_deeper_than(context.component().component_type()) {
            return Ok(None);
        }
        let (Some(main), Some(by)) = (counter.main.get(), counter.by.get()) else {
            return Ok(None);
        };
        if by == 0.0 {
            return Ok(None);
        }
        Ok(Some(Measure::double(
            main / by,
            context.metric().decimal_scale(),
        )))
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

    fn formula() -> AverageFormula {
        AverageFormula::new("function_complexity", "complexity_in_functions", "functions")
            .with_fallback("complexity")
    }

    fn counter_for(measures: &InMemoryMeasureRepository) -> AverageCounter {
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let leaf = Component::builder(ComponentType::File, "f").build();
        let context = CounterInitializationContext::new(&leaf, &metrics, measures, None, None);
        let mut counter = formula().create_new_counter();
        counter.initialize(&context).unwrap();
        counter
    }

    fn emit(counter: &AverageCounter) -> Option<Measure> {
        let project = Component::builder(ComponentType::Project, "p").build();
        let metric = Metric::new("function_complexity", MetricType::Float);
        formula()
            .create_measure(counter, &CreateMeasureContext::new(&project, &metric, None))
            .unwrap()
    }

    #[test]
    fn test_average_rounded_to_scale() {
        let mut measures = InMemoryMeasureRepository::new();
        measures
            .add_raw("f", "complexity_in_functions", Measure::int(10))
            .add_raw("f", "functions", Measure::int(3));
        assert_eq!(emit(&counter_for(&measures)), Some(Measure::double(3.3, 1)));
    }

    #[test]
    fn test_fallback_used_when_main_absent() {
        let mut measures = InMemoryMeasureRepository::new();
        measures
            .add_raw("f", "complexity", Measure::int(8))
            .add_raw("f", "functions", Measure::int(4));
        assert_eq!(emit(&counter_for(&measures)), Some(Measure::double(2.0, 1)));
    }

    #[test]
    fn test_zero_by_suppressed() {
        let mut measures = InMemoryMeasureRepository::new();
        measures
            .add_raw("f", "complexity_in_functions", Measure::int(5))
            .add_raw("f", "functions", Measure::int(0));
        assert_eq!(emit(&counter_for(&measures)), None);
    }

    #[test]
    fn test_missing_by_leaves_both_unset() {
        let mut measures = InMemoryMeasureRepository::new();
        measures.add_raw("f", "complexity_in_functions", Measure::int(5));
        let counter = counter_for(&measures);
        assert!(!counter.main.is_set());
        assert_eq!(emit(&counter), None);
    }
}
