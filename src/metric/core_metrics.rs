//! Keys and descriptors of the metrics the built-in steps read and write.

use super::{Metric, MetricType};

pub const LINES: &str = "lines";
pub const NCLOC: &str = "ncloc";
pub const FUNCTIONS: &str = "functions";
pub const CLASSES: &str = "classes";
pub const STATEMENTS: &str = "statements";
pub const FILES: &str = "files";

pub const COMPLEXITY: &str = "complexity";
pub const COMPLEXITY_IN_FUNCTIONS: &str = "complexity_in_functions";
pub const COGNITIVE_COMPLEXITY: &str = "cognitive_complexity";
pub const FUNCTION_COMPLEXITY: &str = "function_complexity";
pub const FILE_COMPLEXITY: &str = "file_complexity";
pub const FUNCTION_COMPLEXITY_DISTRIBUTION: &str = "function_complexity_distribution";
pub const FILE_COMPLEXITY_DISTRIBUTION: &str = "file_complexity_distribution";

pub const SQALE_INDEX: &str = "sqale_index";

pub const COVERAGE: &str = "coverage";
pub const LINE_COVERAGE: &str = "line_coverage";
pub const BRANCH_COVERAGE: &str = "branch_coverage";
pub const NEW_COVERAGE: &str = "new_coverage";

/// Every key making up one coverage family (unit tests, integration tests
/// or overall), current and new code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageMetricKeys {
    pub lines_to_cover: &'static str,
    pub uncovered_lines: &'static str,
    pub conditions_to_cover: &'static str,
    pub uncovered_conditions: &'static str,
    pub coverage: &'static str,
    pub line_coverage: &'static str,
    pub branch_coverage: &'static str,
    pub line_hits_data: &'static str,
    pub conditions_by_line: &'static str,
    pub covered_conditions_by_line: &'static str,
    pub new_lines_to_cover: &'static str,
    pub new_uncovered_lines: &'static str,
    pub new_conditions_to_cover: &'static str,
    pub new_uncovered_conditions: &'static str,
    pub new_coverage: &'static str,
    pub new_line_coverage: &'static str,
    pub new_branch_coverage: &'static str,
}

pub const UNIT_TEST_COVERAGE: CoverageMetricKeys = CoverageMetricKeys {
    lines_to_cover: "lines_to_cover",
    uncovered_lines: "uncovered_lines",
    conditions_to_cover: "conditions_to_cover",
    uncovered_conditions: "uncovered_conditions",
    coverage: COVERAGE,
    line_coverage: LINE_COVERAGE,
    branch_coverage: BRANCH_COVERAGE,
    line_hits_data: "coverage_line_hits_data",
    conditions_by_line: "conditions_by_line",
    covered_conditions_by_line: "covered_conditions_by_line",
    new_lines_to_cover: "new_lines_to_cover",
    new_uncovered_lines: "new_uncovered_lines",
    new_conditions_to_cover: "new_conditions_to_cover",
    new_uncovered_conditions: "new_uncovered_conditions",
    new_coverage: NEW_COVERAGE,
    new_line_coverage: "new_line_coverage",
    new_branch_coverage: "new_branch_coverage",
};

pub const INTEGRATION_TEST_COVERAGE: CoverageMetricKeys = CoverageMetricKeys {
    lines_to_cover: "it_lines_to_cover",
    uncovered_lines: "it_uncovered_lines",
    conditions_to_cover: "it_conditions_to_cover",
    uncovered_conditions: "it_uncovered_conditions",
    coverage: "it_coverage",
    line_coverage: "it_line_coverage",
    branch_coverage: "it_branch_coverage",
    line_hits_data: "it_coverage_line_hits_data",
    conditions_by_line: "it_conditions_by_line",
    covered_conditions_by_line: "it_covered_conditions_by_line",
    new_lines_to_cover: "new_it_lines_to_cover",
    new_uncovered_lines: "new_it_uncovered_lines",
    new_conditions_to_cover: "new_it_conditions_to_cover",
    new_uncovered_conditions: "new_it_uncovered_conditions",
    new_coverage: "new_it_coverage",
    new_line_coverage: "new_it_line_coverage",
    new_branch_coverage: "new_it_branch_coverage",
};

pub const OVERALL_COVERAGE: CoverageMetricKeys = CoverageMetricKeys {
    lines_to_cover: "overall_lines_to_cover",
    uncovered_lines: "overall_uncovered_lines",
    conditions_to_cover: "overall_conditions_to_cover",
    uncovered_conditions: "overall_uncovered_conditions",
    coverage: "overall_coverage",
    line_coverage: "overall_line_coverage",
    branch_coverage: "overall_branch_coverage",
    line_hits_data: "overall_coverage_line_hits_data",
    conditions_by_line: "overall_conditions_by_line",
    covered_conditions_by_line: "overall_covered_conditions_by_line",
    new_lines_to_cover: "new_overall_lines_to_cover",
    new_uncovered_lines: "new_overall_uncovered_lines",
    new_conditions_to_cover: "new_overall_conditions_to_cover",
    new_uncovered_conditions: "new_overall_uncovered_conditions",
    new_coverage: "new_overall_coverage",
    new_line_coverage: "new_overall_line_coverage",
    new_branch_coverage: "new_overall_branch_coverage",
};

pub const COVERAGE_FAMILIES: [CoverageMetricKeys; 3] = [
    UNIT_TEST_COVERAGE,
    INTEGRATION_TEST_COVERAGE,
    OVERALL_COVERAGE,
];

impl CoverageMetricKeys {
    fn metrics(&self) -> Vec<Metric> {
        let mut metrics: Vec<Metric> = [
            self.lines_to_cover,
            self.uncovered_lines,
            self.conditions_to_cover,
            self.uncovered_conditions,
            self.new_lines_to_cover,
            self.new_uncovered_lines,
            self.new_conditions_to_cover,
            self.new_uncovered_conditions,
        ]
        .into_iter()
        .map(|key| Metric::new(key, MetricType::Int))
        .collect();

        metrics.extend(
            [
                self.coverage,
                self.line_coverage,
                self.branch_coverage,
                self.new_coverage,
                self.new_line_coverage,
                self.new_branch_coverage,
            ]
            .into_iter()
            .map(|key| Metric::new(key, MetricType::Percent)),
        );

        metrics.extend(
            [
                self.line_hits_data,
                self.conditions_by_line,
                self.covered_conditions_by_line,
            ]
            .into_iter()
            .map(|key| Metric::new(key, MetricType::Data)),
        );
        metrics
    }
}

pub fn all() -> Vec<Metric> {
    let mut metrics: Vec<Metric> = [
        LINES,
        NCLOC,
        FUNCTIONS,
        CLASSES,
        STATEMENTS,
        FILES,
        COMPLEXITY,
        COMPLEXITY_IN_FUNCTIONS,
        COGNITIVE_COMPLEXITY,
    ]
    .into_iter()
    .map(|key| Metric::new(key, MetricType::Int))
    .collect();

    metrics.push(Metric::new(FUNCTION_COMPLEXITY, MetricType::Float));
    metrics.push(Metric::new(FILE_COMPLEXITY, MetricType::Float));
    metrics.push(Metric::new(
        FUNCTION_COMPLEXITY_DISTRIBUTION,
        MetricType::Distrib,
    ));
    metrics.push(Metric::new(FILE_COMPLEXITY_DISTRIBUTION, MetricType::Distrib));
    metrics.push(Metric::new(SQALE_INDEX, MetricType::WorkDur));

    for family in &COVERAGE_FAMILIES {
        metrics.extend(family.metrics());
    }
    metrics
}
