use crate::errors::Result;
use crate::formula::coverage::{LinesAndConditionsKeys, SingleKeys};
use crate::formula::{
    boxed, BoxedFormula, CoverageVariationFormula, FormulaExecutor, NewLinesAndConditionsFormula,
    VariationSumFormula,
};
use crate::metric::core_metrics::{CoverageMetricKeys, COVERAGE_FAMILIES};
use crate::period::{NewCodePeriodType, NewCodeReferenceBranchComponentUuids};
use crate::pipeline::stage::{AnalysisContext, ComputationStep};
use crate::scm::NewLinesRepository;
use tracing::debug;

/// Coverage of new code.
///
/// With SCM data, leaves count their new lines and conditions from the
/// per-line coverage data. Without it (view trees), leaves already carry
/// the four counts as variations and they are only summed.
pub struct NewCoverageMeasuresStep;

fn new_counts_from_lines(family: &CoverageMetricKeys) -> Vec<BoxedFormula> {
    vec![boxed(NewLinesAndConditionsFormula::for_family(family))]
}

fn new_counts_from_variations(family: &CoverageMetricKeys) -> Vec<BoxedFormula> {
    vec![
        boxed(VariationSumFormula::new(family.new_lines_to_cover)),
        boxed(VariationSumFormula::new(family.new_uncovered_lines)),
        boxed(VariationSumFormula::new(family.new_conditions_to_cover)),
        boxed(VariationSumFormula::new(family.new_uncovered_conditions)),
    ]
}

fn new_coverage_formulas(family: &CoverageMetricKeys) -> Vec<BoxedFormula> {
    vec![
        boxed(CoverageVariationFormula::lines_and_conditions(
            LinesAndConditionsKeys::new(
                family.new_lines_to_cover,
                family.new_conditions_to_cover,
                family.new_uncovered_lines,
                family.new_uncovered_conditions,
            ),
            family.new_coverage,
        )),
        boxed(CoverageVariationFormula::single(
            SingleKeys::new(family.new_conditions_to_cover, family.new_uncovered_conditions),
            family.new_branch_coverage,
        )),
        boxed(CoverageVariationFormula::single(
            SingleKeys::new(family.new_lines_to_cover, family.new_uncovered_lines),
            family.new_line_coverage,
        )),
    ]
}

impl ComputationStep for NewCoverageMeasuresStep {
    fn execute(&self, context: &mut AnalysisContext<'_>) -> Result<()> {
        let holder = &context.period_holder;
        let on_reference_branch = holder
            .get()?
            .is_some_and(|p| p.mode() == NewCodePeriodType::ReferenceBranch);
        let reference_uuids = match context.reference_branches {
            Some(store) if on_reference_branch => {
                Some(NewCodeReferenceBranchComponentUuids::new(store, holder))
            }
            _ => None,
        };
        let new_lines = context
            .scm
            .map(|scm| NewLinesRepository::new(scm, holder, reference_uuids));

        let counts: fn(&CoverageMetricKeys) -> Vec<BoxedFormula> = if new_lines.is_some() {
            new_counts_from_lines
        } else {
            debug!("No SCM data, summing new code coverage variations");
            new_counts_from_variations
        };

        let mut builder = FormulaExecutor::builder(context.metrics)
            .with_variation_support(holder)?
            .formulas(COVERAGE_FAMILIES.iter().flat_map(counts))
            .formulas(COVERAGE_FAMILIES.iter().flat_map(new_coverage_formulas));
        if let Some(provider) = &new_lines {
            builder = builder.with_new_lines(provider);
        }
        builder.build().execute(context.root, &mut *context.measures)?;
        Ok(())
    }

    fn description(&self) -> &str {
        "Compute new coverage measures"
    }
}
