use crate::errors::Result;
use crate::formula::values::LongValue;
use crate::formula::{Counter, CounterInitializationContext};
use crate::measure::Measure;
use std::sync::Arc;

/// Metrics read on a leaf for combined line and branch coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinesAndConditionsKeys {
    pub lines: String,
    pub conditions: String,
    pub uncovered_lines: String,
    pub uncovered_conditions: String,
}

impl LinesAndConditionsKeys {
    pub fn new(
        lines: impl Into<String>,
        conditions: impl Into<String>,
        uncovered_lines: impl Into<String>,
        uncovered_conditions: impl Into<String>,
    ) -> Self {
        Self {
            lines: lines.into(),
            conditions: conditions.into(),
            uncovered_lines: uncovered_lines.into(),
            uncovered_conditions: uncovered_conditions.into(),
        }
    }
}

/// Metrics read on a leaf for a single-axis ratio such as line coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleKeys {
    pub covered: String,
    pub uncovered: String,
}

impl SingleKeys {
    pub fn new(covered: impl Into<String>, uncovered: impl Into<String>) -> Self {
        Self {
            covered: covered.into(),
            uncovered: uncovered.into(),
        }
    }
}

/// How a leaf seeds `(elements, covered_elements)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafInitialization {
    /// `elements = lines + conditions`,
    /// `covered = elements - uncovered_lines - uncovered_conditions`
    LinesAndConditions(LinesAndConditionsKeys),
    /// `elements = covered`, `covered = elements - uncovered`
    Single(SingleKeys),
}

/// Which part of the leaf measures is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Current,
    Variation,
}

/// Shared `(elements, covered_elements)` accumulator of the coverage family.
///
/// Unit test files never contribute.
#[derive(Debug, Clone)]
pub struct ElementsAndCoveredElementsCounter {
    strategy: Arc<LeafInitialization>,
    source: ValueSource,
    elements: LongValue,
    covered_elements: LongValue,
}

impl ElementsAndCoveredElementsCounter {
    pub fn new(strategy: Arc<LeafInitialization>, source: ValueSource) -> Self {
        Self {
            strategy,
            source,
            elements: LongValue::default(),
            covered_elements: LongValue::default(),
        }
    }

    pub fn elements(&self) -> Option<i64> {
        self.elements.get()
    }

    pub fn covered_elements(&self) -> i64 {
        self.covered_elements.value()
    }

    fn add(&mut self, elements: i64, covered_elements: i64) {
        self.elements.increment(elements);
        self.covered_elements.increment(covered_elements);
    }

    fn initialize_current(&mut self, context: &CounterInitializationContext<'_>) -> Result<()> {
        match self.strategy.as_ref() {
            LeafInitialization::LinesAndConditions(keys) => {
                let lines = long_value(context.measure(&keys.lines)?)?;
                let conditions = long_value(context.measure(&keys.conditions)?)?;
                let uncovered_lines = long_value(context.measure(&keys.uncovered_lines)?)?;
                let uncovered_conditions =
                    long_value(context.measure(&keys.uncovered_conditions)?)?;
                let elements = lines.saturating_add(conditions);
                let covered = elements
                    .saturating_sub(uncovered_lines)
                    .saturating_sub(uncovered_conditions);
                self.add(elements, covered);
            }
            LeafInitialization::Single(keys) => {
                let elements = long_value(context.measure(&keys.covered)?)?;
                let uncovered = long_value(context.measure(&keys.uncovered)?)?;
                self.add(elements, elements.saturating_sub(uncovered));
            }
        }
        Ok(())
    }

    /// Variations are only read when the leading metric carries one.
    fn initialize_variation(&mut self, context: &CounterInitializationContext<'_>) -> Result<()> {
        match self.strategy.as_ref() {
            LeafInitialization::LinesAndConditions(keys) => {
                let Some(lines) = context.measure(&keys.lines)?.and_then(Measure::variation) else {
                    return Ok(());
                };
                let lines = variation_count(lines);
                let conditions = variation_value(context.measure(&keys.conditions)?);
                let uncovered_lines = variation_value(context.measure(&keys.uncovered_lines)?);
                let uncovered_conditions =
                    variation_value(context.measure(&keys.uncovered_conditions)?);
                let elements = lines.saturating_add(conditions);
                let covered = elements
                    .saturating_sub(uncovered_lines)
                    .saturating_sub(uncovered_conditions);
                self.add(elements, covered);
            }
            LeafInitialization::Single(keys) => {
                let Some(elements) = context
                    .measure(&keys.covered)?
                    .and_then(Measure::variation)
                else {
                    return Ok(());
                };
                let elements = variation_count(elements);
                let uncovered = variation_value(context.measure(&keys.uncovered)?);
                self.add(elements, elements.saturating_sub(uncovered));
            }
        }
        Ok(())
    }
}

impl Counter for ElementsAndCoveredElementsCounter {
    fn aggregate(&mut self, other: &Self) {
        self.elements.increment_value(&other.elements);
        self.covered_elements.increment_value(&other.covered_elements);
    }

    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<()> {
        if context.leaf().is_unit_test() {
            return Ok(());
        }
        match self.source {
            ValueSource::Current => self.initialize_current(context),
            ValueSource::Variation => self.initialize_variation(context),
        }
    }
}

/// Absent and NO_VALUE measures count as zero.
fn long_value(measure: Option<&Measure>) -> Result<i64> {
    match measure {
        Some(measure) if !measure.is_no_value() => measure.as_long(),
        _ => Ok(0),
    }
}

fn variation_value(measure: Option<&Measure>) -> i64 {
    measure.and_then(Measure::variation).map_or(0, variation_count)
}

/// Variations of line and condition counts are whole numbers stored as
/// doubles; any fraction is truncated toward zero, not rounded.
fn variation_count(variation: f64) -> i64 {
    variation as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentType, FileAttributes};
    use crate::measure::InMemoryMeasureRepository;
    use crate::metric::InMemoryMetricRepository;

    fn lines_and_conditions() -> Arc<LeafInitialization> {
        Arc::new(LeafInitialization::LinesAndConditions(LinesAndConditionsKeys::new(
            "lines_to_cover",
            "conditions_to_cover",
            "uncovered_lines",
            "uncovered_conditions",
        )))
    }

    fn measures() -> InMemoryMeasureRepository {
        let mut measures = InMemoryMeasureRepository::new();
        measures
            .add_raw("f", "lines_to_cover", Measure::int(4).with_variation(2.0))
            .add_raw("f", "uncovered_lines", Measure::int(2).with_variation(1.0))
            .add_raw("f", "conditions_to_cover", Measure::int(2))
            .add_raw("f", "uncovered_conditions", Measure::int(1));
        measures
    }

    fn initialize(leaf: &Component, source: ValueSource) -> ElementsAndCoveredElementsCounter {
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let measures = measures();
        let context = CounterInitializationContext::new(leaf, &metrics, &measures, None, None);
        let mut counter = ElementsAndCoveredElementsCounter::new(lines_and_conditions(), source);
        counter.initialize(&context).unwrap();
        counter
    }

    #[test]
    fn test_lines_and_conditions_current_values() {
        let leaf = Component::builder(ComponentType::File, "f").build();
        let counter = initialize(&leaf, ValueSource::Current);
        assert_eq!(counter.elements(), Some(6));
        assert_eq!(counter.covered_elements(), 3);
    }

    #[test]
    fn test_lines_and_conditions_variations() {
        let leaf = Component::builder(ComponentType::File, "f").build();
        let counter = initialize(&leaf, ValueSource::Variation);
        assert_eq!(counter.elements(), Some(2));
        assert_eq!(counter.covered_elements(), 1);
    }

    #[test]
    fn test_unit_test_file_is_skipped() {
        let leaf = Component::builder(ComponentType::File, "f")
            .file_attributes(FileAttributes::new(true, None, 10))
            .build();
        let counter = initialize(&leaf, ValueSource::Current);
        assert_eq!(counter.elements(), None);
        assert_eq!(counter.covered_elements(), 0);
    }

    #[test]
    fn test_aggregate_is_component_wise() {
        let leaf = Component::builder(ComponentType::File, "f").build();
        let mut total = ElementsAndCoveredElementsCounter::new(lines_and_conditions(), ValueSource::Current);
        total.aggregate(&initialize(&leaf, ValueSource::Current));
        total.aggregate(&initialize(&leaf, ValueSource::Current));
        assert_eq!(total.elements(), Some(12));
        assert_eq!(total.covered_elements(), 6);
    }

    #[test]
    fn test_fractional_variations_truncate() {
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let mut measures = InMemoryMeasureRepository::new();
        measures
            .add_raw("f", "lines_to_cover", Measure::variation_only(3.9))
            .add_raw("f", "uncovered_lines", Measure::variation_only(1.5));
        let leaf = Component::builder(ComponentType::File, "f").build();
        let context = CounterInitializationContext::new(&leaf, &metrics, &measures, None, None);
        let mut counter =
            ElementsAndCoveredElementsCounter::new(lines_and_conditions(), ValueSource::Variation);
        counter.initialize(&context).unwrap();
        assert_eq!(counter.elements(), Some(3));
        assert_eq!(counter.covered_elements(), 2);
    }

    #[test]
    fn test_extreme_leaf_values_saturate() {
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let mut measures = InMemoryMeasureRepository::new();
        measures
            .add_raw("f", "lines_to_cover", Measure::long(i64::MAX))
            .add_raw("f", "conditions_to_cover", Measure::long(1))
            .add_raw("f", "uncovered_lines", Measure::long(i64::MIN));
        let leaf = Component::builder(ComponentType::File, "f").build();
        let context = CounterInitializationContext::new(&leaf, &metrics, &measures, None, None);
        let mut counter =
            ElementsAndCoveredElementsCounter::new(lines_and_conditions(), ValueSource::Current);
        counter.initialize(&context).unwrap();
        assert_eq!(counter.elements(), Some(i64::MAX));
        assert_eq!(counter.covered_elements(), i64::MAX);
    }
}
