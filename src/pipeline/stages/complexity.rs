use crate::errors::Result;
use crate::formula::{AverageFormula, DistributionFormula, FormulaExecutor, SumFormula};
use crate::metric::core_metrics::{
    COGNITIVE_COMPLEXITY, COMPLEXITY, COMPLEXITY_IN_FUNCTIONS, FILES, FILE_COMPLEXITY,
    FILE_COMPLEXITY_DISTRIBUTION, FUNCTIONS, FUNCTION_COMPLEXITY,
    FUNCTION_COMPLEXITY_DISTRIBUTION,
};
use crate::pipeline::stage::{AnalysisContext, ComputationStep};

/// Complexity sums, distributions and averages per function and per file.
///
/// Averages are computed from leaf values, so they do not depend on the
/// sums of the size step.
pub struct ComplexityMeasuresStep;

impl ComputationStep for ComplexityMeasuresStep {
    fn execute(&self, context: &mut AnalysisContext<'_>) -> Result<()> {
        FormulaExecutor::builder(context.metrics)
            .formula(SumFormula::int(COMPLEXITY))
            .formula(SumFormula::int(COMPLEXITY_IN_FUNCTIONS))
            .formula(SumFormula::int(COGNITIVE_COMPLEXITY))
            .formula(DistributionFormula::new(FUNCTION_COMPLEXITY_DISTRIBUTION))
            .formula(DistributionFormula::new(FILE_COMPLEXITY_DISTRIBUTION))
            .formula(
                AverageFormula::new(FUNCTION_COMPLEXITY, COMPLEXITY_IN_FUNCTIONS, FUNCTIONS)
                    .with_fallback(COMPLEXITY),
            )
            .formula(AverageFormula::new(FILE_COMPLEXITY, COMPLEXITY, FILES))
            .build()
            .execute(context.root, &mut *context.measures)?;
        Ok(())
    }

    fn description(&self) -> &str {
        "Compute complexity measures"
    }
}
