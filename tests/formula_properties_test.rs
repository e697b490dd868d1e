//! Aggregation does not depend on child order, and empty denominators never
//! produce a ratio.

mod common;

use common::*;
use formulary::component::{Component, ComponentType};
use formulary::measure::{InMemoryMeasureRepository, Measure};
use formulary::pipeline::stages::{ComplexityMeasuresStep, CoverageMeasuresStep, SizeMeasuresStep};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct FileData {
    lines: i32,
    uncovered_lines: i32,
    conditions: i32,
    uncovered_conditions: i32,
    ncloc: i32,
    complexity: i32,
    functions: i32,
}

fn file_data() -> impl Strategy<Value = FileData> {
    (0..200i32, 0..50i32, 0..500i32, 0..40i32, 0..20i32).prop_flat_map(
        |(lines, conditions, ncloc, complexity, functions)| {
            (0..=lines, 0..=conditions).prop_map(move |(uncovered_lines, uncovered_conditions)| {
                FileData {
                    lines,
                    uncovered_lines,
                    conditions,
                    uncovered_conditions,
                    ncloc,
                    complexity,
                    functions,
                }
            })
        },
    )
}

fn files_and_shuffled() -> impl Strategy<Value = (Vec<FileData>, Vec<FileData>)> {
    prop::collection::vec(file_data(), 1..12)
        .prop_flat_map(|files| (Just(files.clone()), Just(files).prop_shuffle()))
}

fn compute(files: &[FileData]) -> Vec<(String, Measure)> {
    // same keys in both runs, only the values move between files
    let keys: Vec<String> = files
        .iter()
        .enumerate()
        .map(|(i, _)| format!("f{i}"))
        .collect();
    let root = project(keys.iter().map(|k| file(k)));
    let mut measures = InMemoryMeasureRepository::new();
    for (key, data) in keys.iter().zip(files) {
        measures
            .add_raw(key.as_str(), "lines_to_cover", Measure::int(data.lines))
            .add_raw(key.as_str(), "uncovered_lines", Measure::int(data.uncovered_lines))
            .add_raw(key.as_str(), "conditions_to_cover", Measure::int(data.conditions))
            .add_raw(
                key.as_str(),
                "uncovered_conditions",
                Measure::int(data.uncovered_conditions),
            )
            .add_raw(key.as_str(), "ncloc", Measure::int(data.ncloc))
            .add_raw(key.as_str(), "complexity", Measure::int(data.complexity))
            .add_raw(key.as_str(), "functions", Measure::int(data.functions));
    }
    run_step_with_period(&SizeMeasuresStep, &root, &mut measures, None).unwrap();
    run_step_with_period(&CoverageMeasuresStep, &root, &mut measures, None).unwrap();
    run_step_with_period(&ComplexityMeasuresStep, &root, &mut measures, None).unwrap();

    measures
        .computed_for("project")
        .into_iter()
        .map(|(metric, measure)| (metric.to_string(), measure.clone()))
        .collect()
}

fn int_near_bounds() -> impl Strategy<Value = i32> {
    prop_oneof![
        i32::MIN..i32::MIN + 16,
        -1_000..1_000i32,
        i32::MAX - 16..=i32::MAX,
    ]
}

fn long_near_bounds() -> impl Strategy<Value = i64> {
    prop_oneof![
        i64::MIN..i64::MIN + 16,
        -1_000..1_000i64,
        i64::MAX - 16..=i64::MAX,
    ]
}

fn sizes_and_shuffled() -> impl Strategy<Value = (Vec<(i32, i64)>, Vec<(i32, i64)>)> {
    prop::collection::vec((int_near_bounds(), long_near_bounds()), 1..10)
        .prop_flat_map(|sizes| (Just(sizes.clone()), Just(sizes).prop_shuffle()))
}

/// Project-level ncloc and sqale_index, with files split over two directories.
fn project_sizes(sizes: &[(i32, i64)]) -> (Option<Measure>, Option<Measure>) {
    let keys: Vec<String> = (0..sizes.len()).map(|i| format!("f{i}")).collect();
    let (left, right) = keys.split_at(keys.len() / 2);
    let directory = |key: &str, files: &[String]| {
        Component::builder(ComponentType::Directory, key)
            .children(files.iter().map(|k| file(k)))
            .build()
    };
    let root = project([directory("d0", left), directory("d1", right)]);
    let mut measures = InMemoryMeasureRepository::new();
    for (key, (ncloc, debt)) in keys.iter().zip(sizes) {
        measures
            .add_raw(key.as_str(), "ncloc", Measure::int(*ncloc))
            .add_raw(key.as_str(), "sqale_index", Measure::long(*debt));
    }
    run_step_with_period(&SizeMeasuresStep, &root, &mut measures, None).unwrap();
    (
        measures.get("project", "ncloc").cloned(),
        measures.get("project", "sqale_index").cloned(),
    )
}

proptest! {
    #[test]
    fn sums_near_bounds_ignore_child_order((sizes, shuffled) in sizes_and_shuffled()) {
        let (ncloc, debt) = project_sizes(&sizes);
        prop_assert_eq!(project_sizes(&shuffled), (ncloc.clone(), debt.clone()));

        let exact_ncloc: i64 = sizes.iter().map(|(n, _)| i64::from(*n)).sum();
        let exact_debt: i128 = sizes.iter().map(|(_, d)| i128::from(*d)).sum();
        let expected_ncloc = exact_ncloc.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        let expected_debt = exact_debt.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        prop_assert_eq!(ncloc, Some(Measure::int(expected_ncloc)));
        prop_assert_eq!(debt, Some(Measure::long(expected_debt)));
    }


    #[test]
    fn project_measures_ignore_child_order((files, shuffled) in files_and_shuffled()) {
        prop_assert_eq!(compute(&files), compute(&shuffled));
    }

    #[test]
    fn no_coverage_without_elements(uncovered in 0..100i32, count in 1..6usize) {
        let children: Vec<Component> = (0..count).map(|i| file(&format!("f{i}"))).collect();
        let root = project(children);
        let mut measures = InMemoryMeasureRepository::new();
        for i in 0..count {
            measures
                .add_raw(format!("f{i}"), "lines_to_cover", Measure::int(0))
                .add_raw(format!("f{i}"), "uncovered_lines", Measure::int(uncovered));
        }
        run_step_with_period(&CoverageMeasuresStep, &root, &mut measures, None).unwrap();
        prop_assert!(measures.get("project", "line_coverage").is_none());
        prop_assert!(measures.get("project", "coverage").is_none());
        prop_assert!(measures.get("f0", "line_coverage").is_none());
    }
}
