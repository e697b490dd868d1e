//! Post-order traversal driving a list of formulas over a component tree.

use super::erased::{AnyCounter, AnyFormula, BoxedFormula};
use super::{boxed, CounterInitializationContext, CreateMeasureContext, Formula};
use crate::component::Component;
use crate::errors::Result;
use crate::measure::MeasureRepository;
use crate::metric::MetricRepository;
use crate::period::{Period, PeriodHolder};
use crate::scm::NewLinesProvider;
use tracing::debug;

/// Builder for a [`FormulaExecutor`].
///
/// ```rust,ignore
/// let executor = FormulaExecutor::builder(&metrics)
///     .with_variation_support(&period_holder)?
///     .formula(SumFormula::int("ncloc"))
///     .formula(CoverageFormula::single(keys, "line_coverage"))
///     .build();
/// executor.execute(&root, &mut measures)?;
/// ```
pub struct FormulaExecutorBuilder<'a> {
    metrics: &'a dyn MetricRepository,
    period: Option<&'a Period>,
    new_lines: Option<&'a dyn NewLinesProvider>,
    formulas: Vec<BoxedFormula>,
}

impl<'a> FormulaExecutorBuilder<'a> {
    pub fn new(metrics: &'a dyn MetricRepository) -> Self {
        Self {
            metrics,
            period: None,
            new_lines: None,
            formulas: Vec::new(),
        }
    }

    /// Expose the resolved period to counters and formulas. Fails if the
    /// holder was never initialized.
    pub fn with_variation_support(mut self, period_holder: &'a PeriodHolder) -> Result<Self> {
        self.period = period_holder.get()?;
        Ok(self)
    }

    pub fn with_new_lines(mut self, provider: &'a dyn NewLinesProvider) -> Self {
        self.new_lines = Some(provider);
        self
    }

    pub fn formula<F: Formula + 'static>(mut self, formula: F) -> Self {
        self.formulas.push(boxed(formula));
        self
    }

    pub fn formulas(mut self, formulas: impl IntoIterator<Item = BoxedFormula>) -> Self {
        self.formulas.extend(formulas);
        self
    }

    /// Apply `f` only when `condition` holds.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    pub fn build(self) -> FormulaExecutor<'a> {
        FormulaExecutor {
            metrics: self.metrics,
            period: self.period,
            new_lines: self.new_lines,
            formulas: self.formulas,
        }
    }
}

/// Runs formulas children first. At each leaf, formulas are initialized
/// and emitted one after the other in list order, so a formula can read
/// the leaf measures produced by the formulas listed before it.
pub struct FormulaExecutor<'a> {
    metrics: &'a dyn MetricRepository,
    period: Option<&'a Period>,
    new_lines: Option<&'a dyn NewLinesProvider>,
    formulas: Vec<BoxedFormula>,
}

type Counters = Vec<Box<dyn AnyCounter>>;

impl<'a> FormulaExecutor<'a> {
    pub fn builder(metrics: &'a dyn MetricRepository) -> FormulaExecutorBuilder<'a> {
        FormulaExecutorBuilder::new(metrics)
    }

    pub fn formula_count(&self) -> usize {
        self.formulas.len()
    }

    /// Visit `root` and add every produced measure to `measures`.
    /// Returns the number of measures added.
    pub fn execute(&self, root: &Component, measures: &mut dyn MeasureRepository) -> Result<usize> {
        let mut added = 0;
        self.visit(root, measures, &mut added)?;
        debug!(
            root = root.key(),
            formulas = self.formulas.len(),
            measures = added,
            "Formula pass complete"
        );
        Ok(added)
    }

    fn visit(
        &self,
        component: &Component,
        measures: &mut dyn MeasureRepository,
        added: &mut usize,
    ) -> Result<Counters> {
        if component.is_leaf() {
            return self.visit_leaf(component, measures, added);
        }

        let mut counters: Counters = self
            .formulas
            .iter()
            .map(|formula| formula.create_counter_any())
            .collect();
        for child in component.children() {
            let child_counters = self.visit(child, measures, added)?;
            for (counter, child_counter) in counters.iter_mut().zip(&child_counters) {
                counter.aggregate_any(child_counter.as_ref())?;
            }
        }
        for (formula, counter) in self.formulas.iter().zip(&counters) {
            *added += self.emit(component, formula.as_ref(), counter.as_ref(), measures)?;
        }
        Ok(counters)
    }

    fn visit_leaf(
        &self,
        leaf: &Component,
        measures: &mut dyn MeasureRepository,
        added: &mut usize,
    ) -> Result<Counters> {
        let mut counters = Counters::with_capacity(self.formulas.len());
        for formula in &self.formulas {
            let mut counter = formula.create_counter_any();
            let context = CounterInitializationContext::new(
                leaf,
                self.metrics,
                &*measures,
                self.period,
                self.new_lines,
            );
            counter.initialize_any(&context)?;
            *added += self.emit(leaf, formula.as_ref(), counter.as_ref(), measures)?;
            counters.push(counter);
        }
        Ok(counters)
    }

    fn emit(
        &self,
        component: &Component,
        formula: &dyn AnyFormula,
        counter: &dyn AnyCounter,
        measures: &mut dyn MeasureRepository,
    ) -> Result<usize> {
        let mut added = 0;
        for metric_key in formula.output_keys_any() {
            let metric = self.metrics.by_key(metric_key)?;
            let context = CreateMeasureContext::new(component, metric, self.period);
            if let Some(measure) = formula.create_measure_any(counter, &context)? {
                measures.add(component, metric, measure)?;
                added += 1;
            }
        }
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;
    use crate::formula::coverage::SingleKeys;
    use crate::formula::{CoverageFormula, CoverageVariationFormula, SumFormula, VariationSumFormula};
    use crate::measure::{InMemoryMeasureRepository, Measure};
    use crate::metric::InMemoryMetricRepository;
    use crate::period::{NewCodePeriodType, Period};

    fn tree() -> Component {
        Component::builder(ComponentType::Project, "p")
            .child(
                Component::builder(ComponentType::Directory, "d")
                    .child(Component::builder(ComponentType::File, "a").build())
                    .child(Component::builder(ComponentType::File, "b").build())
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_sum_emitted_above_leaves_only() {
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let mut measures = InMemoryMeasureRepository::new();
        measures
            .add_raw("a", "ncloc", Measure::int(10))
            .add_raw("b", "ncloc", Measure::int(5));

        let added = FormulaExecutor::builder(&metrics)
            .formula(SumFormula::int("ncloc"))
            .build()
            .execute(&tree(), &mut measures)
            .unwrap();

        assert_eq!(added, 2);
        assert_eq!(measures.get("d", "ncloc"), Some(&Measure::int(15)));
        assert_eq!(measures.get("p", "ncloc"), Some(&Measure::int(15)));
    }

    #[test]
    fn test_view_tree_new_line_coverage_from_variations() {
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let mut measures = InMemoryMeasureRepository::new();
        let mut holder = PeriodHolder::new();
        holder
            .set_period(Some(Period::new(NewCodePeriodType::PreviousVersion, None, Some(0))))
            .unwrap();

        // a view tree: project views are leaves carrying variations
        let view = Component::builder(ComponentType::View, "v")
            .child(Component::builder(ComponentType::ProjectView, "pv").build())
            .build();
        measures
            .add_raw("pv", "new_lines_to_cover", Measure::variation_only(4.0))
            .add_raw("pv", "new_uncovered_lines", Measure::variation_only(1.0));

        FormulaExecutor::builder(&metrics)
            .with_variation_support(&holder)
            .unwrap()
            .formula(VariationSumFormula::new("new_lines_to_cover"))
            .formula(VariationSumFormula::new("new_uncovered_lines"))
            .formula(CoverageVariationFormula::single(
                SingleKeys::new("new_lines_to_cover", "new_uncovered_lines"),
                "new_line_coverage",
            ))
            .build()
            .execute(&view, &mut measures)
            .unwrap();

        let coverage = measures.get("v", "new_line_coverage").unwrap();
        assert_eq!(coverage.variation(), Some(75.0));
        assert_eq!(measures.get("v", "new_lines_to_cover").unwrap().variation(), Some(4.0));
    }

    #[test]
    fn test_variation_support_requires_initialized_holder() {
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let holder = PeriodHolder::new();
        assert!(FormulaExecutor::builder(&metrics)
            .with_variation_support(&holder)
            .is_err());
    }

    #[test]
    fn test_empty_tree_emits_nothing() {
        let metrics = InMemoryMetricRepository::with_core_metrics();
        let mut measures = InMemoryMeasureRepository::new();
        let executor = FormulaExecutor::builder(&metrics)
            .formula(CoverageFormula::single(
                SingleKeys::new("lines_to_cover", "uncovered_lines"),
                "line_coverage",
            ))
            .build();
        assert_eq!(executor.formula_count(), 1);
        let added = executor.execute(&tree(), &mut measures).unwrap();
        assert_eq!(added, 0);
    }
}
