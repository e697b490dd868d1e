use crate::errors::Result;
use crate::period::{NewCodePeriodType, PeriodResolver};
use crate::pipeline::stage::{AnalysisContext, ComputationStep};
use tracing::debug;

/// Resolves the new code period once and stores it in the context's
/// period holder.
///
/// A first analysis has nothing to compare with, except against a
/// reference branch, which does not depend on this project's history.
pub struct LoadPeriodStep;

impl ComputationStep for LoadPeriodStep {
    fn execute(&self, context: &mut AnalysisContext<'_>) -> Result<()> {
        let definition = context.new_code_period;
        let period = if context.metadata.first_analysis
            && definition.period_type != NewCodePeriodType::ReferenceBranch
        {
            debug!("First analysis of the project, no new code period");
            None
        } else {
            let resolver = PeriodResolver::new(context.history);
            Some(resolver.resolve(
                context.root.uuid(),
                context.metadata.project_version.as_deref(),
                context.metadata.analysis_date,
                definition,
            )?)
        };
        context.period_holder.set_period(period)
    }

    fn description(&self) -> &str {
        "Load new code period"
    }
}
