//! Computation steps and the per-analysis state they share.

use crate::component::Component;
use crate::errors::Result;
use crate::measure::MeasureRepository;
use crate::metric::MetricRepository;
use crate::period::{AnalysisHistory, NewCodePeriod, PeriodHolder, ReferenceBranchStore};
use crate::scm::ScmInfoRepository;
use serde::{Deserialize, Serialize};

/// Facts about the analysis being computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Epoch millis
    pub analysis_date: i64,
    #[serde(default)]
    pub project_version: Option<String>,
    /// No earlier analysis of the project exists.
    #[serde(default)]
    pub first_analysis: bool,
}

/// Everything one analysis run reads and writes.
///
/// The period holder lives here rather than in global state; it is set by
/// the period loading step and read by every later step.
pub struct AnalysisContext<'a> {
    pub metadata: &'a AnalysisMetadata,
    pub root: &'a Component,
    pub metrics: &'a dyn MetricRepository,
    pub measures: &'a mut dyn MeasureRepository,
    pub history: &'a dyn AnalysisHistory,
    pub scm: Option<&'a dyn ScmInfoRepository>,
    pub reference_branches: Option<&'a dyn ReferenceBranchStore>,
    pub new_code_period: &'a NewCodePeriod,
    pub period_holder: PeriodHolder,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        metadata: &'a AnalysisMetadata,
        root: &'a Component,
        metrics: &'a dyn MetricRepository,
        measures: &'a mut dyn MeasureRepository,
        history: &'a dyn AnalysisHistory,
        new_code_period: &'a NewCodePeriod,
    ) -> Self {
        Self {
            metadata,
            root,
            metrics,
            measures,
            history,
            scm: None,
            reference_branches: None,
            new_code_period,
            period_holder: PeriodHolder::new(),
        }
    }

    pub fn with_scm(mut self, scm: &'a dyn ScmInfoRepository) -> Self {
        self.scm = Some(scm);
        self
    }

    pub fn with_reference_branches(mut self, store: &'a dyn ReferenceBranchStore) -> Self {
        self.reference_branches = Some(store);
        self
    }
}

/// One phase of an analysis.
pub trait ComputationStep {
    fn execute(&self, context: &mut AnalysisContext<'_>) -> Result<()>;

    /// Human-readable name for logs and timings.
    fn description(&self) -> &str;
}
