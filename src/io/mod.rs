pub mod input;
pub mod output;

pub use input::AnalysisInput;
pub use output::{
    create_writer, AnalysisReport, ComputedMeasure, JsonWriter, OutputFormat, OutputWriter,
    TextWriter,
};
