//! Computation steps run once per analysis over the component tree.
//!
//! [`analysis_steps`] assembles the built-in steps. The period is always
//! loaded first; every other step is enabled by configuration.

pub mod builder;
pub mod stage;
pub mod stages;

pub use builder::{ComputationStepExecutor, StepTiming};
pub use stage::{AnalysisContext, AnalysisMetadata, ComputationStep};

use crate::config::StepsConfig;
use stages::{
    ComplexityMeasuresStep, CoverageMeasuresStep, LoadPeriodStep, NewCoverageMeasuresStep,
    SizeMeasuresStep,
};

pub fn analysis_steps(steps: &StepsConfig) -> ComputationStepExecutor {
    ComputationStepExecutor::new()
        .step(LoadPeriodStep)
        .when(steps.size, |e| e.step(SizeMeasuresStep))
        .when(steps.complexity, |e| e.step(ComplexityMeasuresStep))
        .when(steps.coverage, |e| e.step(CoverageMeasuresStep))
        .when(steps.new_coverage, |e| e.step(NewCoverageMeasuresStep))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_steps_are_skipped() {
        let steps = StepsConfig {
            coverage: false,
            new_coverage: false,
            ..StepsConfig::default()
        };
        assert_eq!(analysis_steps(&steps).step_count(), 3);
        assert_eq!(analysis_steps(&StepsConfig::default()).step_count(), 5);
    }
}
