//! Measure aggregation over component trees and new code period resolution.
//!
//! An analysis loads its new code [`period::Period`] once, then runs
//! [`formula::FormulaExecutor`] passes that fold leaf measures up the
//! component tree: sums, averages, distributions and coverage ratios, plus
//! their variations on new code.

pub mod cli;
pub mod commands;
pub mod component;
pub mod config;
pub mod errors;
pub mod formula;
pub mod io;
pub mod measure;
pub mod metric;
pub mod period;
pub mod pipeline;
pub mod scm;

pub use crate::component::{Component, ComponentType, CrawlerDepthLimit};
pub use crate::config::FormularyConfig;
pub use crate::errors::{Error, Result};
pub use crate::formula::{Counter, Formula, FormulaExecutor};
pub use crate::measure::{Measure, MeasureRepository};
pub use crate::metric::{Metric, MetricRepository};
pub use crate::period::{NewCodePeriod, NewCodePeriodType, Period, PeriodHolder, PeriodResolver};
