//! New lines and conditions to cover, from per-line coverage data and the
//! set of lines changed since the baseline.

use super::values::IntValue;
use super::{Counter, CounterInitializationContext, CreateMeasureContext, Formula};
use crate::errors::{Error, Result};
use crate::measure::{key_value, Measure, MeasureValue};
use crate::metric::core_metrics::CoverageMetricKeys;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Per-line data metrics read on each leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoverageInputKeys {
    pub line_hits_data: String,
    pub conditions_by_line: String,
    pub covered_conditions_by_line: String,
}

/// The four counts emitted, as variations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoverageOutputKeys {
    pub new_lines_to_cover: String,
    pub new_uncovered_lines: String,
    pub new_conditions_to_cover: String,
    pub new_uncovered_conditions: String,
}

#[derive(Debug, Clone)]
pub struct NewLinesAndConditionsFormula {
    input: Arc<NewCoverageInputKeys>,
    output: NewCoverageOutputKeys,
    output_metric_keys: Vec<String>,
}

impl NewLinesAndConditionsFormula {
    pub fn new(input: NewCoverageInputKeys, output: NewCoverageOutputKeys) -> Self {
        let output_metric_keys = vec![
            output.new_lines_to_cover.clone(),
            output.new_uncovered_lines.clone(),
            output.new_conditions_to_cover.clone(),
            output.new_uncovered_conditions.clone(),
        ];
        Self {
            input: Arc::new(input),
            output,
            output_metric_keys,
        }
    }

    /// Formula over one coverage family (unit, integration or overall).
    pub fn for_family(family: &CoverageMetricKeys) -> Self {
        Self::new(
            NewCoverageInputKeys {
                line_hits_data: family.line_hits_data.to_string(),
                conditions_by_line: family.conditions_by_line.to_string(),
                covered_conditions_by_line: family.covered_conditions_by_line.to_string(),
            },
            NewCoverageOutputKeys {
                new_lines_to_cover: family.new_lines_to_cover.to_string(),
                new_uncovered_lines: family.new_uncovered_lines.to_string(),
                new_conditions_to_cover: family.new_conditions_to_cover.to_string(),
                new_uncovered_conditions: family.new_uncovered_conditions.to_string(),
            },
        )
    }

    fn value_for(&self, counter: &NewCoverageCounter, metric_key: &str) -> Result<i32> {
        let lines = counter.new_lines.value();
        let conditions = counter.new_conditions.value();
        if metric_key == self.output.new_lines_to_cover {
            Ok(lines)
        } else if metric_key == self.output.new_uncovered_lines {
            Ok(lines - counter.new_covered_lines.value())
        } else if metric_key == self.output.new_conditions_to_cover {
            Ok(conditions)
        } else if metric_key == self.output.new_uncovered_conditions {
            Ok(conditions - counter.new_covered_conditions.value())
        } else {
            Err(Error::UnsupportedMetric(metric_key.to_string()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCoverageCounter {
    input: Arc<NewCoverageInputKeys>,
    new_lines: IntValue,
    new_covered_lines: IntValue,
    new_conditions: IntValue,
    new_covered_conditions: IntValue,
}

impl NewCoverageCounter {
    /// Whether any leaf below had new-line information.
    pub fn has_new_code(&self) -> bool {
        self.new_lines.is_set()
    }

    fn add_line(&mut self, hits: i32, conditions: i32, covered_conditions: i32) {
        self.new_lines.increment(1);
        if hits > 0 {
            self.new_covered_lines.increment(1);
        }
        self.new_conditions.increment(conditions);
        if conditions > 0 {
            self.new_covered_conditions.increment(covered_conditions);
        }
    }
}

impl Counter for NewCoverageCounter {
    fn aggregate(&mut self, other: &Self) {
        self.new_lines.increment_value(&other.new_lines);
        self.new_covered_lines.increment_value(&other.new_covered_lines);
        self.new_conditions.increment_value(&other.new_conditions);
        self.new_covered_conditions
            .increment_value(&other.new_covered_conditions);
    }

    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<()> {
        let Some(new_lines) = context.new_lines()? else {
            return Ok(());
        };
        // known new lines without coverage data still count as zero
        self.new_lines.increment(0);
        self.new_covered_lines.increment(0);
        self.new_conditions.increment(0);
        self.new_covered_conditions.increment(0);

        let Some(hits_by_line) = line_data(context.measure(&self.input.line_hits_data)?)? else {
            return Ok(());
        };
        let conditions_by_line =
            line_data(context.measure(&self.input.conditions_by_line)?)?.unwrap_or_default();
        let covered_conditions_by_line =
            line_data(context.measure(&self.input.covered_conditions_by_line)?)?
                .unwrap_or_default();

        for (line, hits) in hits_by_line {
            if !new_lines.contains(&line) {
                continue;
            }
            let conditions = conditions_by_line.get(&line).copied().unwrap_or(0);
            let covered = covered_conditions_by_line.get(&line).copied().unwrap_or(0);
            self.add_line(hits, conditions, covered);
        }
        Ok(())
    }
}

fn line_data(measure: Option<&Measure>) -> Result<Option<BTreeMap<u32, i32>>> {
    match measure.map(Measure::value) {
        Some(MeasureValue::String(data)) => key_value::parse_int_int(data).map(Some),
        _ => Ok(None),
    }
}

impl Formula for NewLinesAndConditionsFormula {
    type Counter = NewCoverageCounter;

    fn create_new_counter(&self) -> NewCoverageCounter {
        NewCoverageCounter {
            input: Arc::clone(&self.input),
            new_lines: IntValue::default(),
            new_covered_lines: IntValue::default(),
            new_conditions: IntValue::default(),
            new_covered_conditions: IntValue::default(),
        }
    }

    fn create_measure(
        &self,
        counter: &NewCoverageCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>> {
        if !context.has_period() || !counter.has_new_code() {
            return Ok(None);
        }
        let value = self.value_for(counter, context.metric().key())?;
        Ok(Some(Measure::variation_only(f64::from(value))))
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
    use crate::metric::core_metrics::UNIT_TEST_COVERAGE;
    use crate::metric::{InMemoryMetricRepository, Metric, MetricRepository, MetricType};
    use crate::period::{NewCodePeriodType, Period};
    use crate::scm::NewLinesProvider;
    use std::collections::BTreeSet;

    struct FixedNewLines(Option<BTreeSet<u32>>);

    impl NewLinesProvider for FixedNewLines {
        fn new_lines(&self, _component: &Component) -> Result<Option<BTreeSet<u32>>> {
            Ok(self.0.clone())
        }
    }

    fn counter_for(
        measures: &InMemoryMeasureRepository,
        new_lines: Option<BTreeSet<u32>>,
    ) -> NewCoverageCounter {
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let provider = FixedNewLines(new_lines);
        let leaf = Component::builder(ComponentType::File, "f").build();
        let context =
            CounterInitializationContext::new(&leaf, &metrics, measures, None, Some(&provider));
        let mut counter = NewLinesAndConditionsFormula::for_family(&UNIT_TEST_COVERAGE).create_new_counter();
        counter.initialize(&context).unwrap();
        counter
    }

    fn emitted(counter: &NewCoverageCounter) -> Vec<Option<f64>> {
        let formula = NewLinesAndConditionsFormula::for_family(&UNIT_TEST_COVERAGE);
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let file = Component::builder(ComponentType::File, "f").build();
        let period = Period::new(NewCodePeriodType::NumberOfDays, Some("30".into()), Some(0));
        formula
            .output_metric_keys()
            .iter()
            .map(|key| {
                let metric = metrics.by_key(key).unwrap();
                let context = CreateMeasureContext::new(&file, metric, Some(&period));
                formula
                    .create_measure(counter, &context)
                    .unwrap()
                    .and_then(|m| m.variation())
            })
            .collect()
    }

    #[test]
    fn test_counts_only_new_lines() {
        let mut measures = InMemoryMeasureRepository::new();
        measures
            .add_raw("f", "coverage_line_hits_data", Measure::string("1=1;2=0;3=4;4=0"))
            .add_raw("f", "conditions_by_line", Measure::string("1=2;2=2;4=4"))
            .add_raw("f", "covered_conditions_by_line", Measure::string("1=1;4=3"));
        let counter = counter_for(&measures, Some(BTreeSet::from([1, 2, 3])));
        // lines 1,2,3 are new: 3 lines, 2 covered; conditions 2+2, covered 1
        assert_eq!(emitted(&counter), vec![Some(3.0), Some(1.0), Some(4.0), Some(3.0)]);
    }

    #[test]
    fn test_new_lines_without_hits_emit_zeros() {
        let counter = counter_for(&InMemoryMeasureRepository::new(), Some(BTreeSet::from([1])));
        assert_eq!(emitted(&counter), vec![Some(0.0); 4]);
    }

    #[test]
    fn test_unknown_new_lines_emit_nothing() {
        let counter = counter_for(&InMemoryMeasureRepository::new(), None);
        assert!(!counter.has_new_code());
        assert_eq!(emitted(&counter), vec![None; 4]);
    }

    #[test]
    fn test_unsupported_metric_fails() {
        let formula = NewLinesAndConditionsFormula::for_family(&UNIT_TEST_COVERAGE);
        let counter = counter_for(&InMemoryMeasureRepository::new(), Some(BTreeSet::new()));
        let file = Component::builder(ComponentType::File, "f").build();
        let metric = Metric::new("ncloc", MetricType::Int);
        let period = Period::new(NewCodePeriodType::NumberOfDays, Some("30".into()), Some(0));
        let err = formula
            .create_measure(&counter, &CreateMeasureContext::new(&file, &metric, Some(&period)))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMetric(key) if key == "ncloc"));
    }
}
