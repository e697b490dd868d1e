//! Built-in computation steps, in the order an analysis runs them.

pub mod complexity;
pub mod coverage;
pub mod load_period;
pub mod new_coverage;
pub mod size;

pub use complexity::ComplexityMeasuresStep;
pub use coverage::CoverageMeasuresStep;
pub use load_period::LoadPeriodStep;
pub use new_coverage::NewCoverageMeasuresStep;
pub use size::SizeMeasuresStep;
