// Shared fixtures for formulary integration tests
#![allow(dead_code)]

use formulary::component::{Component, ComponentType, FileAttributes};
use formulary::measure::InMemoryMeasureRepository;
use formulary::metric::InMemoryMetricRepository;
use formulary::period::{InMemoryAnalysisHistory, NewCodePeriod, Period};
use formulary::pipeline::{AnalysisContext, AnalysisMetadata, ComputationStep};

pub const PROJECT_UUID: &str = "project-uuid";

// 2008-11-30T00:00:00Z
pub const ANALYSIS_DATE: i64 = 1_228_003_200_000;

// Analyses of the reference history, oldest first
pub const NOV_11: i64 = 1_226_379_600_000;
pub const NOV_12: i64 = 1_226_494_680_000;
pub const NOV_20: i64 = 1_227_157_200_000;
pub const NOV_22: i64 = 1_227_358_680_000;
pub const NOV_29: i64 = 1_227_934_800_000;

pub fn file(key: &str) -> Component {
    Component::builder(ComponentType::File, key)
        .file_attributes(FileAttributes::new(false, Some("java".into()), 100))
        .build()
}

pub fn test_file(key: &str) -> Component {
    Component::builder(ComponentType::File, key)
        .file_attributes(FileAttributes::new(true, Some("java".into()), 100))
        .build()
}

pub fn project(children: impl IntoIterator<Item = Component>) -> Component {
    Component::builder(ComponentType::Project, "project")
        .uuid(PROJECT_UUID)
        .children(children)
        .build()
}

pub fn metadata(first_analysis: bool, version: Option<&str>) -> AnalysisMetadata {
    AnalysisMetadata {
        analysis_date: ANALYSIS_DATE,
        project_version: version.map(str::to_string),
        first_analysis,
    }
}

/// Run `step` over `root` with an already resolved (or absent) period.
pub fn run_step_with_period(
    step: &dyn ComputationStep,
    root: &Component,
    measures: &mut InMemoryMeasureRepository,
    period: Option<Period>,
) -> formulary::Result<()> {
    let metadata = metadata(false, None);
    let metrics = InMemoryMetricRepository::with_core_metrics();
    let history = InMemoryAnalysisHistory::new();
    let definition = NewCodePeriod::default();
    let mut context = AnalysisContext::new(
        &metadata,
        root,
        &metrics,
        measures,
        &history,
        &definition,
    );
    context.period_holder.set_period(period)?;
    step.execute(&mut context)
}
