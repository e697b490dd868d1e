//! Ordered execution of computation steps.

use super::stage::{AnalysisContext, ComputationStep};
use crate::errors::Result;
use std::time::{Duration, Instant};
use tracing::{debug, info_span, warn};

/// Runs steps in the order they were added.
///
/// ```rust,ignore
/// let timings = ComputationStepExecutor::new()
///     .step(LoadPeriodStep)
///     .when(config.steps.coverage, |e| e.step(CoverageMeasuresStep))
///     .execute(&mut context)?;
/// ```
#[derive(Default)]
pub struct ComputationStepExecutor {
    steps: Vec<Box<dyn ComputationStep>>,
}

impl ComputationStepExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step<S: ComputationStep + 'static>(mut self, step: S) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add steps conditionally.
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

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Execute every step, stopping at the first failure. Errors are
    /// returned unchanged so callers can still tell configuration problems
    /// from broken data.
    pub fn execute(&self, context: &mut AnalysisContext<'_>) -> Result<Vec<StepTiming>> {
        let mut timings = Vec::with_capacity(self.steps.len());
        for (i, step) in self.steps.iter().enumerate() {
            let span = info_span!("step", index = i + 1, name = step.description());
            let _enter = span.enter();
            let start = Instant::now();

            step.execute(context).inspect_err(|e| {
                warn!(step = step.description(), error = %e, "Computation step failed");
            })?;

            let timing = StepTiming {
                name: step.description().to_string(),
                duration: start.elapsed(),
            };
            debug!("{}", timing.format());
            timings.push(timing);
        }
        Ok(timings)
    }
}

/// Timing information for a computation step.
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

impl StepTiming {
    pub fn format(&self) -> String {
        format!("{} | time={}ms", self.name, self.duration.as_millis())
    }
}
