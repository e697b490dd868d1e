use crate::errors::Result;
use crate::formula::coverage::{LinesAndConditionsKeys, SingleKeys};
use crate::formula::{boxed, BoxedFormula, CoverageFormula, FormulaExecutor, SumFormula};
use crate::metric::core_metrics::{CoverageMetricKeys, COVERAGE_FAMILIES};
use crate::pipeline::stage::{AnalysisContext, ComputationStep};

/// Line, branch and combined coverage for unit tests, integration tests
/// and overall, plus the sums they are computed from.
pub struct CoverageMeasuresStep;

pub(crate) fn coverage_formulas(family: &CoverageMetricKeys) -> Vec<BoxedFormula> {
    vec![
        boxed(SumFormula::int(family.lines_to_cover)),
        boxed(SumFormula::int(family.uncovered_lines)),
        boxed(SumFormula::int(family.conditions_to_cover)),
        boxed(SumFormula::int(family.uncovered_conditions)),
        boxed(CoverageFormula::lines_and_conditions(
            LinesAndConditionsKeys::new(
                family.lines_to_cover,
                family.conditions_to_cover,
                family.uncovered_lines,
                family.uncovered_conditions,
            ),
            family.coverage,
        )),
        boxed(CoverageFormula::single(
            SingleKeys::new(family.lines_to_cover, family.uncovered_lines),
            family.line_coverage,
        )),
        boxed(CoverageFormula::single(
            SingleKeys::new(family.conditions_to_cover, family.uncovered_conditions),
            family.branch_coverage,
        )),
    ]
}

impl ComputationStep for CoverageMeasuresStep {
    fn execute(&self, context: &mut AnalysisContext<'_>) -> Result<()> {
        let executor = FormulaExecutor::builder(context.metrics)
            .formulas(COVERAGE_FAMILIES.iter().flat_map(coverage_formulas))
            .build();
        executor.execute(context.root, &mut *context.measures)?;
        Ok(())
    }

    fn description(&self) -> &str {
        "Compute coverage measures"
    }
}
