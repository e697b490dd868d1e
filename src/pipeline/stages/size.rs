use crate::errors::Result;
use crate::formula::{FormulaExecutor, SumFormula};
use crate::metric::core_metrics::{CLASSES, FILES, FUNCTIONS, LINES, NCLOC, SQALE_INDEX, STATEMENTS};
use crate::pipeline::stage::{AnalysisContext, ComputationStep};

const INT_SUMS: [&str; 6] = [LINES, NCLOC, FUNCTIONS, CLASSES, STATEMENTS, FILES];

/// Size totals and the technical debt index.
pub struct SizeMeasuresStep;

impl ComputationStep for SizeMeasuresStep {
    fn execute(&self, context: &mut AnalysisContext<'_>) -> Result<()> {
        INT_SUMS
            .iter()
            .fold(FormulaExecutor::builder(context.metrics), |builder, key| {
                builder.formula(SumFormula::int(*key))
            })
            .formula(SumFormula::long(SQALE_INDEX))
            .build()
            .execute(context.root, &mut *context.measures)?;
        Ok(())
    }

    fn description(&self) -> &str {
        "Compute size measures"
    }
}
